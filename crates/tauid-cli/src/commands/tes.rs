use std::error::Error;

use clap::Args;
use serde::Serialize;
use tauid_core::{ArtifactRecord, JsonStore, Uncertainty};
use tauid_sf::{EsScheme, TauEs};

use super::{emit, genmatch, Row};

#[derive(Args, Debug)]
pub struct TesArgs {
    /// Campaign, e.g. 2018ReReco or UL2018.
    #[arg(long)]
    pub era: String,
    /// Anti-jet algorithm the scale was measured with.
    #[arg(long, default_value = "DeepTau2017v2p1VSjet")]
    pub id: String,
    /// Up, Down or All.
    #[arg(long)]
    pub unc: Option<String>,
    /// Generator-match code of the tau candidate.
    #[arg(long, default_value_t = 5)]
    pub genmatch: i32,
    /// Momentum grid.
    #[arg(long, value_delimiter = ',', default_value = "20,34,50,100,140,170,300")]
    pub pt: Vec<f64>,
    /// Decay-mode grid.
    #[arg(long = "dms", value_delimiter = ',', default_value = "0,1,10,11")]
    pub dms: Vec<i32>,
    /// Print the high-momentum measurement instead of the momentum grid.
    #[arg(long = "high-pt")]
    pub high_pt: bool,
    /// Print JSON instead of a table.
    #[arg(long)]
    pub json: bool,
}

#[derive(Debug, Serialize)]
struct TesMeta<'a> {
    scheme: EsScheme,
    era: &'a str,
    id: &'a str,
    provenance: &'a [ArtifactRecord],
}

pub fn run(store: &JsonStore, args: &TesArgs) -> Result<(), Box<dyn Error>> {
    let tes = TauEs::from_labels(store, &args.era, &args.id)?;
    let gm = genmatch(args.genmatch)?;
    let unc = Uncertainty::from_label(args.unc.as_deref())?;

    let mut rows = Vec::new();
    for &dm in &args.dms {
        if args.high_pt {
            let result = tes.evaluate_high_pt(dm, gm, unc)?;
            rows.push(Row {
                pt: None,
                dm: Some(dm),
                eta: None,
                result,
            });
            continue;
        }
        for &pt in &args.pt {
            let result = tes.evaluate(pt, dm, gm, unc);
            rows.push(Row {
                pt: Some(pt),
                dm: Some(dm),
                eta: None,
                result,
            });
        }
    }

    let meta = TesMeta {
        scheme: tes.scheme(),
        era: &args.era,
        id: &args.id,
        provenance: tes.provenance(),
    };
    let title = format!("TES {} {} [{:?}]", args.id, args.era, tes.scheme());
    emit(&meta, &title, &rows, args.json)
}
