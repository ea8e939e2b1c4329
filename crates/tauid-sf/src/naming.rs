//! Artifact identities and object names.
//!
//! These strings address calibration artifacts that already exist on disk,
//! so every function here must stay bit-exact.

use serde::{Deserialize, Serialize};
use tauid_core::{Algorithm, Direction, Era, WorkingPoint};

use crate::components::Source;

/// Decay-mode groups of the fitted scheme, each with its own curves.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum DmBucket {
    /// One prong.
    Dm0,
    /// One prong plus neutral pions (modes 1 and 2).
    Dm1,
    /// Three prongs.
    Dm10,
    /// Three prongs plus a neutral pion.
    Dm11,
}

impl DmBucket {
    /// Every bucket, in decay-mode order.
    pub const ALL: [DmBucket; 4] = [DmBucket::Dm0, DmBucket::Dm1, DmBucket::Dm10, DmBucket::Dm11];

    /// Bucket holding decay mode `dm`, if any.
    pub fn from_decay_mode(dm: i32) -> Option<Self> {
        match dm {
            0 => Some(DmBucket::Dm0),
            1 | 2 => Some(DmBucket::Dm1),
            10 => Some(DmBucket::Dm10),
            11 => Some(DmBucket::Dm11),
            _ => None,
        }
    }

    /// Object-name prefix.
    pub fn as_str(&self) -> &'static str {
        match self {
            DmBucket::Dm0 => "DM0",
            DmBucket::Dm1 => "DM1",
            DmBucket::Dm10 => "DM10",
            DmBucket::Dm11 => "DM11",
        }
    }
}

fn emb(embedded: bool) -> &'static str {
    if embedded {
        "_EMB"
    } else {
        ""
    }
}

/// `TauID_SF_pt_<id>_<era>[_EMB]`
pub fn sf_pt_artifact(algorithm: Algorithm, era: Era, embedded: bool) -> String {
    format!("TauID_SF_pt_{algorithm}_{era}{}", emb(embedded))
}

/// `TauID_SF_dm_<id>_<era>[_EMB]`
pub fn sf_dm_artifact(algorithm: Algorithm, era: Era, embedded: bool) -> String {
    format!("TauID_SF_dm_{algorithm}_{era}{}", emb(embedded))
}

/// `TauID_SF_eta_<id>_<era>`
pub fn sf_eta_artifact(algorithm: Algorithm, era: Era) -> String {
    format!("TauID_SF_eta_{algorithm}_{era}")
}

/// `TauID_SF_dm_<id>_VSjet<wp>_VSele<wp>_<tag>`
pub fn sf_dm_pt_artifact(
    algorithm: Algorithm,
    wp: WorkingPoint,
    vs_ele_wp: WorkingPoint,
    tag: &str,
) -> String {
    format!("TauID_SF_dm_{algorithm}_VSjet{wp}_VSele{vs_ele_wp}_{tag}")
}

/// `TauID_SF_Highpt_<id>_VSjet<wp>_VSele<wp>_<tag>`
pub fn sf_high_pt_artifact(
    algorithm: Algorithm,
    wp: WorkingPoint,
    vs_ele_wp: WorkingPoint,
    tag: &str,
) -> String {
    format!("TauID_SF_Highpt_{algorithm}_VSjet{wp}_VSele{vs_ele_wp}_{tag}")
}

/// `TauES_dm_<id>_<era>`
pub fn tes_artifact(algorithm: Algorithm, era: Era) -> String {
    format!("TauES_dm_{algorithm}_{era}")
}

/// `TauES_dm_<id>_<era>_ptgt100`
pub fn tes_high_pt_artifact(algorithm: Algorithm, era: Era) -> String {
    format!("TauES_dm_{algorithm}_{era}_ptgt100")
}

/// `TauFES_eta-dm_<id>_<era>`
pub fn fes_artifact(algorithm: Algorithm, era: Era) -> String {
    format!("TauFES_eta-dm_{algorithm}_{era}")
}

/// Object of the energy-scale tables.
pub const TES_OBJECT: &str = "tes";

/// Object of the fake energy-scale graph.
pub const FES_OBJECT: &str = "fes";

/// Central, up and down curve names of the momentum scheme.
pub fn momentum_curves(wp: WorkingPoint) -> [String; 3] {
    [
        format!("{wp}_cent"),
        format!("{wp}_up"),
        format!("{wp}_down"),
    ]
}

/// Nominal fitted curve of a bucket.
pub fn fitted_nominal(bucket: DmBucket, label: &str) -> String {
    format!("{}_{label}_fit", bucket.as_str())
}

/// Fitted variation curve of a bucket; `None` for sources the fitted scheme
/// does not store.
pub fn fitted_variation(
    bucket: DmBucket,
    label: &str,
    source: Source,
    direction: Direction,
) -> Option<String> {
    let dm = bucket.as_str();
    let dir = direction.suffix();
    let name = match source {
        Source::Uncert0 => format!("{dm}_{label}_fit_uncert0_{dir}"),
        Source::Uncert1 => format!("{dm}_{label}_fit_uncert1_{dir}"),
        Source::SystAllEras => format!("{dm}_{label}_syst_alleras_{dir}_fit"),
        Source::SystEra => format!("{dm}_{label}_syst_alldms_{label}_{dir}_fit"),
        Source::SystTes => match direction {
            Direction::Up => format!("{dm}_{label}_TESUp_fit"),
            Direction::Down => format!("{dm}_{label}_TESDown_fit"),
        },
        Source::StatBin(_) => return None,
    };
    Some(name)
}

/// Nominal, era-correlated and era-specific graphs of the high-momentum scheme.
pub fn high_pt_graphs(label: &str) -> [String; 3] {
    [
        format!("DMinclusive_{label}"),
        format!("DMinclusive_{label}_syst_alleras"),
        format!("DMinclusive_{label}_syst_{label}"),
    ]
}
