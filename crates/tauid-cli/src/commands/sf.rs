use std::error::Error;

use clap::Args;
use serde::Serialize;
use tauid_core::{ArtifactRecord, Estimate, JsonStore, WorkingPoint};
use tauid_sf::{Scheme, SfOptions, TauIdSf, Variation};

use super::{emit, genmatch, Row};

#[derive(Args, Debug)]
pub struct SfArgs {
    /// Campaign, e.g. 2018ReReco or UL2018.
    #[arg(long)]
    pub era: String,
    /// Identification algorithm, e.g. DeepTau2017v2p1VSjet.
    #[arg(long)]
    pub id: String,
    /// Working point of the algorithm.
    #[arg(long)]
    pub wp: String,
    /// Per-decay-mode scale factors.
    #[arg(long)]
    pub dm: bool,
    /// Scale factors fitted in decay mode and momentum.
    #[arg(long = "dm-pt")]
    pub dm_pt: bool,
    /// High-momentum scale factors.
    #[arg(long)]
    pub highpt: bool,
    /// Embedded-sample scale factors.
    #[arg(long)]
    pub emb: bool,
    /// Attach the anti-lepton working-point mismatch systematic.
    #[arg(long = "other-lepton-wp")]
    pub other_lepton_wp: bool,
    /// Anti-electron working point of the fitted and high-momentum schemes.
    #[arg(long = "vs-ele", default_value = "VVLoose")]
    pub vs_ele: String,
    /// Variation: Up, Down, All or a named component such as syst_TES_up.
    #[arg(long)]
    pub unc: Option<String>,
    /// Generator-match code of the tau candidate.
    #[arg(long, default_value_t = 5)]
    pub genmatch: i32,
    /// Momentum grid.
    #[arg(long, value_delimiter = ',', default_value = "20,25,30,35,40,50,70,100,140,200,500")]
    pub pt: Vec<f64>,
    /// Decay-mode grid.
    #[arg(long = "dms", value_delimiter = ',', default_value = "0,1,10,11")]
    pub dms: Vec<i32>,
    /// Pseudorapidity grid.
    #[arg(long, value_delimiter = ',', default_value = "0,0.5,1.0,1.5,2.0,2.3")]
    pub eta: Vec<f64>,
    /// Print JSON instead of a table.
    #[arg(long)]
    pub json: bool,
}

#[derive(Debug, Serialize)]
struct SfMeta<'a> {
    scheme: Scheme,
    era: &'a str,
    id: &'a str,
    wp: &'a str,
    genmatch: i32,
    provenance: &'a [ArtifactRecord],
}

pub fn run(store: &JsonStore, args: &SfArgs) -> Result<(), Box<dyn Error>> {
    let options = SfOptions {
        decay_mode: args.dm,
        dm_and_pt: args.dm_pt,
        embedded: args.emb,
        high_pt: args.highpt,
        other_lepton_wp: args.other_lepton_wp,
        vs_ele_wp: args.vs_ele.parse::<WorkingPoint>()?,
    };
    let sf = TauIdSf::from_labels(store, &args.era, &args.id, &args.wp, &options)?;
    let gm = genmatch(args.genmatch)?;
    let variation = sf.variation(args.unc.as_deref())?;

    let mut rows = Vec::new();
    match (sf.scheme(), variation) {
        (Scheme::PointsByMomentum | Scheme::PointsByMomentumHighPt, variation) => {
            for &pt in &args.pt {
                let result = match variation {
                    Variation::Mode(mode) => sf.evaluate_by_momentum(pt, gm, mode)?,
                    Variation::Component(component) => {
                        Estimate::Value(sf.evaluate_component_by_momentum(pt, gm, component)?)
                    }
                };
                rows.push(Row {
                    pt: Some(pt),
                    dm: None,
                    eta: None,
                    result,
                });
            }
        }
        (Scheme::FittedByDecayModeAndMomentum, variation) => {
            for &dm in &args.dms {
                for &pt in &args.pt {
                    let result = match variation {
                        Variation::Mode(mode) => {
                            sf.evaluate_by_decay_mode_and_momentum(pt, dm, gm, mode)?
                        }
                        Variation::Component(component) => {
                            Estimate::Value(sf.evaluate_component_by_decay_mode_and_momentum(
                                pt, dm, gm, component,
                            )?)
                        }
                    };
                    rows.push(Row {
                        pt: Some(pt),
                        dm: Some(dm),
                        eta: None,
                        result,
                    });
                }
            }
        }
        (Scheme::StepByDecayMode, Variation::Mode(mode)) => {
            for &dm in &args.dms {
                for &pt in &args.pt {
                    let result = sf.evaluate_by_decay_mode(pt, dm, gm, mode)?;
                    rows.push(Row {
                        pt: Some(pt),
                        dm: Some(dm),
                        eta: None,
                        result,
                    });
                }
            }
        }
        (Scheme::StepByPseudorapidity, Variation::Mode(mode)) => {
            for &eta in &args.eta {
                let result = sf.evaluate_by_eta(eta, gm, mode)?;
                rows.push(Row {
                    pt: None,
                    dm: None,
                    eta: Some(eta),
                    result,
                });
            }
        }
        (scheme, Variation::Component(_)) => {
            return Err(format!("named components are not defined for the {scheme} scheme").into());
        }
    }

    let meta = SfMeta {
        scheme: sf.scheme(),
        era: &args.era,
        id: &args.id,
        wp: &args.wp,
        genmatch: args.genmatch,
        provenance: sf.provenance(),
    };
    let title = format!("{} {} {} [{}]", args.id, args.wp, args.era, sf.scheme());
    emit(&meta, &title, &rows, args.json)
}
