//! The resolved correction: one variant per scheme, loaded once from the
//! store and immutable afterwards.

use std::collections::BTreeMap;

use tauid_core::store::with_artifact;
use tauid_core::uncertainty::{clamp_down, quadrature};
use tauid_core::{
    Artifact, ArtifactRecord, Bin, BinnedCorrection, CorrectionStore, Curve, Direction,
    ErrorInfo, GenMatch, GraphCorrection, TauIdError, Triple,
};
use tracing::warn;

use crate::components::{Component, Source};
use crate::naming::{self, DmBucket};
use crate::resolver::{ExtraSystematic, Scheme, SfPlan};

/// Momentum window of the fitted curves; inputs outside are held at the
/// boundary.
pub const FIT_PT_RANGE: (f64, f64) = (20.0, 140.0);

/// Central, up and down curves in momentum.
#[derive(Debug, Clone, PartialEq)]
pub struct MomentumCurves {
    central: Curve,
    up: Curve,
    down: Curve,
    extra: Option<ExtraSystematic>,
}

impl MomentumCurves {
    /// Bundles the three curves.
    pub fn new(central: Curve, up: Curve, down: Curve, extra: Option<ExtraSystematic>) -> Self {
        Self {
            central,
            up,
            down,
            extra,
        }
    }

    /// Correction at `pt` with the working-point systematic folded in.
    ///
    /// Where the up and down curves cross, or fall on the wrong side of the
    /// central curve, the outer values are taken as the band.
    pub fn triple(&self, pt: f64) -> Triple {
        let central = self.central.eval(pt);
        let (raw_up, raw_down) = (self.up.eval(pt), self.down.eval(pt));
        let up = raw_up.max(raw_down).max(central);
        let down = raw_up.min(raw_down).min(central);
        match self.extra {
            Some(extra) => {
                let extra = central * extra.at(pt);
                Triple::from_errors(
                    central,
                    quadrature(&[central - down, extra]),
                    quadrature(&[up - central, extra]),
                )
            }
            None => Triple::from_values(down, central, up),
        }
    }
}

/// Step function over decay mode or absolute pseudorapidity.
#[derive(Debug, Clone, PartialEq)]
pub struct BinnedTable {
    table: BinnedCorrection,
    extra: Option<ExtraSystematic>,
}

impl BinnedTable {
    /// Wraps a table with an optional flat systematic.
    pub fn new(table: BinnedCorrection, extra: Option<ExtraSystematic>) -> Self {
        Self { table, extra }
    }

    /// Underlying table.
    pub fn table(&self) -> &BinnedCorrection {
        &self.table
    }

    /// Correction in the bin holding `x`; `pt` only matters for a tiered
    /// systematic.
    pub fn triple(&self, x: f64, pt: f64) -> Triple {
        bin_triple(self.table.locate(x), self.extra.map(|extra| extra.at(pt)))
    }
}

/// `value ± error`, with an optional relative term added in quadrature.
pub(crate) fn bin_triple(bin: &Bin, extra: Option<f64>) -> Triple {
    let error = match extra {
        Some(fraction) => quadrature(&[bin.error, bin.value * fraction]),
        None => bin.error,
    };
    Triple::from_errors(bin.value, error, error)
}

/// Fitted curves of one decay-mode bucket.
#[derive(Debug, Clone, PartialEq)]
pub struct FittedBucket {
    nominal: Curve,
    variations: BTreeMap<Component, Curve>,
}

impl FittedBucket {
    fn value(curve: &Curve, pt: f64) -> f64 {
        let (lo, hi) = FIT_PT_RANGE;
        curve.eval(pt.clamp(lo, hi))
    }

    /// Nominal value, momentum clamped to [`FIT_PT_RANGE`].
    pub fn nominal(&self, pt: f64) -> f64 {
        Self::value(&self.nominal, pt)
    }

    /// Value of one variation curve. Downward curves are clamped at zero.
    pub fn component(&self, pt: f64, component: Component) -> Option<f64> {
        let value = Self::value(self.variations.get(&component)?, pt);
        Some(match component.direction {
            Direction::Up => value,
            Direction::Down => clamp_down(value),
        })
    }

    /// Positive and negative deviations from nominal, each summed in
    /// quadrature over all variations.
    pub fn triple(&self, pt: f64) -> Triple {
        let nominal = self.nominal(pt);
        let (mut up, mut down) = (0.0, 0.0);
        for curve in self.variations.values() {
            let shift = Self::value(curve, pt) - nominal;
            if shift > 0.0 {
                up += shift * shift;
            } else {
                down += shift * shift;
            }
        }
        Triple::from_errors(nominal, down.sqrt(), up.sqrt())
    }
}

/// Curves per decay-mode bucket.
#[derive(Debug, Clone, PartialEq)]
pub struct FittedCorrection {
    label: &'static str,
    buckets: BTreeMap<DmBucket, FittedBucket>,
}

impl FittedCorrection {
    /// In-artifact era label the curves were read with.
    pub fn label(&self) -> &'static str {
        self.label
    }

    /// Curves for decay mode `dm`, if the mode is fitted.
    pub fn bucket(&self, dm: i32) -> Option<&FittedBucket> {
        DmBucket::from_decay_mode(dm).and_then(|bucket| self.buckets.get(&bucket))
    }
}

/// One momentum bin of the high-momentum measurement.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct HighPtBin {
    /// Central value.
    pub value: f64,
    /// Statistical `(down, up)` error.
    pub stat: (f64, f64),
    /// Era-correlated systematic `(down, up)` error.
    pub syst_all_eras: (f64, f64),
    /// Era-specific systematic `(down, up)` error.
    pub syst_era: (f64, f64),
}

impl HighPtBin {
    /// Quadrature of all terms.
    pub fn triple(&self) -> Triple {
        Triple::from_errors(
            self.value,
            quadrature(&[self.stat.0, self.syst_all_eras.0, self.syst_era.0]),
            quadrature(&[self.stat.1, self.syst_all_eras.1, self.syst_era.1]),
        )
    }
}

/// Momentum bins of the high-momentum scheme.
#[derive(Debug, Clone, PartialEq)]
pub struct HighPtPoints {
    label: &'static str,
    ranges: GraphCorrection,
    bins: Vec<HighPtBin>,
}

impl HighPtPoints {
    /// In-artifact era label.
    pub fn label(&self) -> &'static str {
        self.label
    }

    /// Measured bins, lowest momentum first.
    pub fn bins(&self) -> &[HighPtBin] {
        &self.bins
    }

    /// Zero-based index of the bin holding `pt`.
    pub fn locate(&self, pt: f64) -> usize {
        self.ranges.locate(pt)
    }

    /// Value at `pt` shifted by one component.
    pub fn component(&self, pt: f64, component: Component) -> Option<f64> {
        let index = self.locate(pt);
        let bin = &self.bins[index];
        let errors = match component.source {
            Source::StatBin(k) if k == index + 1 => bin.stat,
            Source::StatBin(_) => (0.0, 0.0),
            Source::SystAllEras => bin.syst_all_eras,
            Source::SystEra => bin.syst_era,
            _ => return None,
        };
        let triple = Triple::from_errors(bin.value, errors.0, errors.1);
        Some(match component.direction {
            Direction::Up => triple.up,
            Direction::Down => triple.down,
        })
    }
}

/// A resolved scale-factor correction.
#[derive(Debug, Clone, PartialEq)]
pub enum CorrectionVariant {
    /// Curves in momentum.
    PointsByMomentum(MomentumCurves),
    /// One bin per decay mode.
    StepByDecayMode {
        /// Table indexed by decay mode.
        table: BinnedTable,
        /// Modes the table is valid for.
        decay_modes: Vec<i32>,
    },
    /// Momentum curves per decay-mode bucket.
    FittedByDecayModeAndMomentum(FittedCorrection),
    /// High-momentum bins.
    PointsByMomentumHighPt(HighPtPoints),
    /// Bins in absolute pseudorapidity.
    StepByPseudorapidity {
        /// Table indexed by `|eta|`.
        table: BinnedTable,
        /// Fake origins the table applies to.
        genmatches: Vec<GenMatch>,
    },
}

impl CorrectionVariant {
    /// Scheme tag of the variant.
    pub fn scheme(&self) -> Scheme {
        match self {
            CorrectionVariant::PointsByMomentum(_) => Scheme::PointsByMomentum,
            CorrectionVariant::StepByDecayMode { .. } => Scheme::StepByDecayMode,
            CorrectionVariant::FittedByDecayModeAndMomentum(_) => {
                Scheme::FittedByDecayModeAndMomentum
            }
            CorrectionVariant::PointsByMomentumHighPt(_) => Scheme::PointsByMomentumHighPt,
            CorrectionVariant::StepByPseudorapidity { .. } => Scheme::StepByPseudorapidity,
        }
    }

    /// Reads the objects a plan needs, releasing the artifact before
    /// returning.
    pub fn load<S>(plan: &SfPlan, store: &S) -> Result<(Self, ArtifactRecord), TauIdError>
    where
        S: CorrectionStore + ?Sized,
    {
        let wp = plan.working_point;
        with_artifact(store, &plan.artifact, |artifact| match plan.scheme {
            Scheme::PointsByMomentum => {
                let [central, up, down] = naming::momentum_curves(wp);
                Ok(CorrectionVariant::PointsByMomentum(MomentumCurves::new(
                    artifact.curve(&central)?,
                    artifact.curve(&up)?,
                    artifact.curve(&down)?,
                    plan.extra,
                )))
            }
            Scheme::StepByDecayMode => {
                let table = artifact.binned(wp.as_str())?;
                flag_negative_down(artifact.identity(), wp.as_str(), table.all_bins());
                Ok(CorrectionVariant::StepByDecayMode {
                    table: BinnedTable::new(table, plan.extra),
                    decay_modes: plan.decay_modes.clone(),
                })
            }
            Scheme::StepByPseudorapidity => {
                let table = artifact.binned(wp.as_str())?;
                flag_negative_down(artifact.identity(), wp.as_str(), table.all_bins());
                Ok(CorrectionVariant::StepByPseudorapidity {
                    table: BinnedTable::new(table, None),
                    genmatches: plan.genmatches.clone(),
                })
            }
            Scheme::FittedByDecayModeAndMomentum => {
                let label = era_label(plan)?;
                let mut buckets = BTreeMap::new();
                for bucket in DmBucket::ALL {
                    buckets.insert(bucket, load_bucket(artifact, bucket, label)?);
                }
                Ok(CorrectionVariant::FittedByDecayModeAndMomentum(
                    FittedCorrection { label, buckets },
                ))
            }
            Scheme::PointsByMomentumHighPt => {
                let label = era_label(plan)?;
                load_high_pt(artifact, label).map(CorrectionVariant::PointsByMomentumHighPt)
            }
        })
    }
}

fn era_label(plan: &SfPlan) -> Result<&'static str, TauIdError> {
    plan.label().ok_or_else(|| {
        TauIdError::invalid(
            "tauid.sf.ultra_legacy_only",
            "scheme requires an ultra-legacy era label",
        )
        .with_context("era", plan.era.as_str())
    })
}

fn load_bucket<A: Artifact>(
    artifact: &A,
    bucket: DmBucket,
    label: &str,
) -> Result<FittedBucket, TauIdError> {
    let nominal = artifact.curve(&naming::fitted_nominal(bucket, label))?;
    let mut variations = BTreeMap::new();
    for source in Source::FITTED {
        for direction in [Direction::Up, Direction::Down] {
            if let Some(name) = naming::fitted_variation(bucket, label, source, direction) {
                variations.insert(Component::new(source, direction), artifact.curve(&name)?);
            }
        }
    }
    Ok(FittedBucket {
        nominal,
        variations,
    })
}

fn load_high_pt<A: Artifact>(
    artifact: &A,
    label: &'static str,
) -> Result<HighPtPoints, TauIdError> {
    let [nominal_name, all_eras_name, era_name] = naming::high_pt_graphs(label);
    let nominal = artifact.graph(&nominal_name)?;
    let all_eras = artifact.graph(&all_eras_name)?;
    let era = artifact.graph(&era_name)?;
    for (name, graph) in [(&all_eras_name, &all_eras), (&era_name, &era)] {
        let aligned = graph.len() == nominal.len()
            && graph
                .points()
                .iter()
                .zip(nominal.points())
                .all(|(a, b)| (a.x - b.x).abs() < 1e-9);
        if !aligned {
            return Err(TauIdError::Corrupt(
                ErrorInfo::new(
                    "tauid.sf.high_pt_binning",
                    "systematic graph binning differs from the nominal graph",
                )
                .with_context("artifact", artifact.identity())
                .with_context("object", name.as_str()),
            ));
        }
    }
    let bins: Vec<HighPtBin> = nominal
        .points()
        .iter()
        .zip(all_eras.points())
        .zip(era.points())
        .map(|((point, all), era)| HighPtBin {
            value: point.y,
            stat: (point.y_err_low, point.y_err_high),
            syst_all_eras: (all.y_err_low, all.y_err_high),
            syst_era: (era.y_err_low, era.y_err_high),
        })
        .collect();
    flag_negative_down(
        artifact.identity(),
        &nominal_name,
        bins.iter()
            .map(|bin| {
                Bin::new(
                    bin.value,
                    quadrature(&[bin.stat.0, bin.syst_all_eras.0, bin.syst_era.0]),
                )
            })
            .collect::<Vec<_>>()
            .iter(),
    );
    Ok(HighPtPoints {
        label,
        ranges: nominal,
        bins,
    })
}

/// Warns about entries whose downward variation would cross zero; evaluation
/// clamps them.
pub(crate) fn flag_negative_down<'a>(
    identity: &str,
    object: &str,
    bins: impl Iterator<Item = &'a Bin>,
) {
    for (index, bin) in bins.enumerate() {
        if bin.value - bin.error < 0.0 {
            warn!(
                artifact = identity,
                object,
                index,
                value = bin.value,
                error = bin.error,
                "downward variation is negative and will be clamped to zero"
            );
        }
    }
}
