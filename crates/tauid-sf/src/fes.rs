//! Electron fake energy-scale engine.

use tauid_core::store::with_artifact;
use tauid_core::{
    Algorithm, Artifact, ArtifactRecord, Bin, CorrectionStore, Era, ErrorInfo, Estimate,
    GenMatch, TauIdError, Triple, Uncertainty,
};
use tracing::info;

use crate::naming::FES_OBJECT;
use crate::resolver::{resolve_fes, FesPlan};
use crate::variant::flag_negative_down;

/// Absolute pseudorapidity below which a tau is in the barrel.
pub const BARREL_ETA: f64 = 1.5;

/// Point labels of the graph, in storage order.
const POINT_LABELS: [&str; 4] = ["barrel_dm0", "barrel_dm1", "endcap_dm0", "endcap_dm1"];

/// Detector region.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Region {
    /// `|eta| < 1.5`.
    Barrel,
    /// Everything else.
    Endcap,
}

impl Region {
    /// Region of pseudorapidity `eta`.
    pub fn of(eta: f64) -> Self {
        if eta.abs() < BARREL_ETA {
            Region::Barrel
        } else {
            Region::Endcap
        }
    }
}

/// Resolved fake energy-scale correction for electrons reconstructed as
/// taus.
#[derive(Debug, Clone, PartialEq)]
pub struct TauFes {
    plan: FesPlan,
    // [region][dm]
    table: [[Triple; 2]; 2],
    provenance: Vec<ArtifactRecord>,
}

impl TauFes {
    /// Resolves and loads the fake energy scale of an anti-electron
    /// algorithm.
    pub fn new<S>(store: &S, era: Era, algorithm: Algorithm) -> Result<Self, TauIdError>
    where
        S: CorrectionStore + ?Sized,
    {
        let plan = resolve_fes(era, algorithm)?;
        let (table, record) = with_artifact(store, &plan.artifact, |artifact| {
            let graph = artifact.graph(FES_OBJECT)?;
            let corrupt = |message: String| {
                TauIdError::Corrupt(
                    ErrorInfo::new("tauid.fes.layout", message)
                        .with_context("artifact", artifact.identity())
                        .with_context("object", FES_OBJECT),
                )
            };
            if graph.len() != POINT_LABELS.len() {
                return Err(corrupt(format!(
                    "expected {} points, found {}",
                    POINT_LABELS.len(),
                    graph.len()
                )));
            }
            for (point, expected) in graph.points().iter().zip(POINT_LABELS) {
                if let Some(label) = &point.label {
                    if label != expected {
                        return Err(corrupt(format!(
                            "point '{label}' found where '{expected}' was expected"
                        )));
                    }
                }
            }
            flag_negative_down(
                artifact.identity(),
                FES_OBJECT,
                graph
                    .points()
                    .iter()
                    .map(|point| Bin::new(point.y, point.y_err_low))
                    .collect::<Vec<_>>()
                    .iter(),
            );
            let triple = |index: usize| {
                let point = &graph.points()[index];
                Triple::from_errors(point.y, point.y_err_low, point.y_err_high)
            };
            Ok([[triple(0), triple(1)], [triple(2), triple(3)]])
        })?;
        info!(
            era = %era,
            algorithm = %algorithm,
            artifact = %record.identity,
            "resolved fake energy scale"
        );
        Ok(Self {
            plan,
            table,
            provenance: vec![record],
        })
    }

    /// Same as [`TauFes::new`] with keys in their external spelling.
    pub fn from_labels<S>(store: &S, era: &str, algorithm: &str) -> Result<Self, TauIdError>
    where
        S: CorrectionStore + ?Sized,
    {
        Self::new(store, era.parse()?, algorithm.parse()?)
    }

    /// The resolved plan.
    pub fn plan(&self) -> &FesPlan {
        &self.plan
    }

    /// Artifacts read during construction.
    pub fn provenance(&self) -> &[ArtifactRecord] {
        &self.provenance
    }

    /// Fake energy scale for an electron-like tau candidate. Only decay
    /// modes 0 and 1 are corrected.
    pub fn evaluate(&self, eta: f64, dm: i32, genmatch: GenMatch, unc: Uncertainty) -> Estimate {
        let dm_index = match dm {
            0 => 0,
            1 => 1,
            _ => return Triple::unit().select(unc),
        };
        if !genmatch.is_electron_like() {
            return Triple::unit().select(unc);
        }
        let region_index = match Region::of(eta) {
            Region::Barrel => 0,
            Region::Endcap => 1,
        };
        self.table[region_index][dm_index].select(unc)
    }
}
