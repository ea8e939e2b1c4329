//! Tau energy-scale engine.

use tauid_core::store::with_artifact;
use tauid_core::{
    Algorithm, Artifact, ArtifactRecord, BinnedCorrection, CorrectionStore, Era, ErrorInfo,
    Estimate, GenMatch, TauIdError, Triple, Uncertainty,
};
use tracing::info;

use crate::naming::TES_OBJECT;
use crate::resolver::{resolve_tes, EsScheme, TesPlan};
use crate::variant::{bin_triple, flag_negative_down};

/// Upper edge of the low-momentum regime of the dual-table layout.
pub const TES_LOW_PT: f64 = 34.0;
/// Lower edge of the high-momentum regime of the dual-table layout.
pub const TES_HIGH_PT: f64 = 170.0;
/// Momentum from which the single-table layout uses the fixed error.
pub const SINGLE_TABLE_CUTOFF: f64 = 140.0;
/// Error of the single-table layout at and above the cutoff.
pub const SINGLE_TABLE_HIGH_PT_ERROR: f64 = 0.03;

/// Loaded energy-scale tables, indexed by decay mode.
#[derive(Debug, Clone, PartialEq)]
pub enum EsTables {
    /// Low- and high-momentum measurements.
    DualTable {
        /// Measured at low momentum; holds the nominal scale.
        low: BinnedCorrection,
        /// Measured at high momentum.
        high: BinnedCorrection,
    },
    /// Low-momentum measurement only.
    SingleTable {
        /// Per-decay-mode scale.
        table: BinnedCorrection,
    },
}

/// Resolved tau energy-scale correction.
#[derive(Debug, Clone, PartialEq)]
pub struct TauEs {
    plan: TesPlan,
    tables: EsTables,
    provenance: Vec<ArtifactRecord>,
}

fn load_table<S>(
    store: &S,
    identity: &str,
) -> Result<(BinnedCorrection, ArtifactRecord), TauIdError>
where
    S: CorrectionStore + ?Sized,
{
    with_artifact(store, identity, |artifact| {
        let table = artifact.binned(TES_OBJECT)?;
        flag_negative_down(artifact.identity(), TES_OBJECT, table.all_bins());
        Ok(table)
    })
}

impl TauEs {
    /// Resolves and loads the energy scale of an anti-jet algorithm.
    pub fn new<S>(store: &S, era: Era, algorithm: Algorithm) -> Result<Self, TauIdError>
    where
        S: CorrectionStore + ?Sized,
    {
        let plan = resolve_tes(era, algorithm)?;
        let (low, low_record) = load_table(store, &plan.artifact)?;
        let mut provenance = vec![low_record];
        let tables = match (&plan.scheme, &plan.high_pt_artifact) {
            (EsScheme::DualTable, Some(identity)) => {
                let (high, high_record) = load_table(store, identity)?;
                provenance.push(high_record);
                EsTables::DualTable { low, high }
            }
            (EsScheme::DualTable, None) => {
                return Err(TauIdError::invalid(
                    "tauid.tes.high_pt_artifact",
                    "dual-table energy scale needs a high-momentum artifact",
                )
                .with_context("era", era.as_str()));
            }
            (EsScheme::SingleTable, _) => EsTables::SingleTable { table: low },
        };
        info!(
            scheme = ?plan.scheme,
            era = %era,
            algorithm = %algorithm,
            artifacts = provenance.len(),
            "resolved tau energy scale"
        );
        Ok(Self {
            plan,
            tables,
            provenance,
        })
    }

    /// Same as [`TauEs::new`] with keys in their external spelling.
    pub fn from_labels<S>(store: &S, era: &str, algorithm: &str) -> Result<Self, TauIdError>
    where
        S: CorrectionStore + ?Sized,
    {
        Self::new(store, era.parse()?, algorithm.parse()?)
    }

    /// The resolved plan.
    pub fn plan(&self) -> &TesPlan {
        &self.plan
    }

    /// Table layout.
    pub fn scheme(&self) -> EsScheme {
        self.plan.scheme
    }

    /// Loaded tables.
    pub fn tables(&self) -> &EsTables {
        &self.tables
    }

    /// Artifacts read during construction.
    pub fn provenance(&self) -> &[ArtifactRecord] {
        &self.provenance
    }

    fn applies(&self, dm: i32, genmatch: GenMatch) -> bool {
        genmatch == GenMatch::HadronicTau && self.plan.decay_modes.contains(&dm)
    }

    /// Energy scale at momentum `pt` for decay mode `dm`.
    pub fn evaluate(&self, pt: f64, dm: i32, genmatch: GenMatch, unc: Uncertainty) -> Estimate {
        if !self.applies(dm, genmatch) {
            return Triple::unit().select(unc);
        }
        let x = f64::from(dm);
        let triple = match &self.tables {
            EsTables::DualTable { low, high } => {
                let nominal = low.locate(x);
                let error = if pt >= TES_HIGH_PT {
                    high.locate(x).error
                } else if pt > TES_LOW_PT {
                    let (err_low, err_high) = (nominal.error, high.locate(x).error);
                    err_low + (err_high - err_low) / (TES_HIGH_PT - TES_LOW_PT) * (pt - TES_LOW_PT)
                } else {
                    nominal.error
                };
                Triple::from_errors(nominal.value, error, error)
            }
            EsTables::SingleTable { table } => {
                if pt < SINGLE_TABLE_CUTOFF {
                    bin_triple(table.locate(x), None)
                } else {
                    Triple::from_errors(1.0, SINGLE_TABLE_HIGH_PT_ERROR, SINGLE_TABLE_HIGH_PT_ERROR)
                }
            }
        };
        triple.select(unc)
    }

    /// High-momentum measurement for decay mode `dm`. Defined for the
    /// dual-table layout only.
    pub fn evaluate_high_pt(
        &self,
        dm: i32,
        genmatch: GenMatch,
        unc: Uncertainty,
    ) -> Result<Estimate, TauIdError> {
        let EsTables::DualTable { high, .. } = &self.tables else {
            return Err(TauIdError::UnsupportedOperation(
                ErrorInfo::new(
                    "tauid.tes.unsupported_axis",
                    "high-momentum energy scale is not measured for this era",
                )
                .with_context("era", self.plan.era.as_str()),
            ));
        };
        if !self.applies(dm, genmatch) {
            return Ok(Triple::unit().select(unc));
        }
        Ok(bin_triple(high.locate(f64::from(dm)), None).select(unc))
    }
}
