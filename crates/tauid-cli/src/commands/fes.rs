use std::error::Error;

use clap::Args;
use serde::Serialize;
use tauid_core::{ArtifactRecord, JsonStore, Uncertainty};
use tauid_sf::TauFes;

use super::{emit, genmatch, Row};

#[derive(Args, Debug)]
pub struct FesArgs {
    /// Campaign, e.g. 2018ReReco or UL2018.
    #[arg(long)]
    pub era: String,
    /// Anti-electron algorithm.
    #[arg(long, default_value = "DeepTau2017v2p1VSe")]
    pub id: String,
    /// Up, Down or All.
    #[arg(long)]
    pub unc: Option<String>,
    /// Generator-match code of the tau candidate.
    #[arg(long, default_value_t = 1)]
    pub genmatch: i32,
    /// Pseudorapidity grid.
    #[arg(long, value_delimiter = ',', default_value = "0,1.0,1.5,2.0")]
    pub eta: Vec<f64>,
    /// Decay-mode grid.
    #[arg(long = "dms", value_delimiter = ',', default_value = "0,1")]
    pub dms: Vec<i32>,
    /// Print JSON instead of a table.
    #[arg(long)]
    pub json: bool,
}

#[derive(Debug, Serialize)]
struct FesMeta<'a> {
    era: &'a str,
    id: &'a str,
    provenance: &'a [ArtifactRecord],
}

pub fn run(store: &JsonStore, args: &FesArgs) -> Result<(), Box<dyn Error>> {
    let fes = TauFes::from_labels(store, &args.era, &args.id)?;
    let gm = genmatch(args.genmatch)?;
    let unc = Uncertainty::from_label(args.unc.as_deref())?;

    let mut rows = Vec::new();
    for &dm in &args.dms {
        for &eta in &args.eta {
            let result = fes.evaluate(eta, dm, gm, unc);
            rows.push(Row {
                pt: None,
                dm: Some(dm),
                eta: Some(eta),
                result,
            });
        }
    }

    let meta = FesMeta {
        era: &args.era,
        id: &args.id,
        provenance: fes.provenance(),
    };
    let title = format!("FES {} {}", args.id, args.era);
    emit(&meta, &title, &rows, args.json)
}
