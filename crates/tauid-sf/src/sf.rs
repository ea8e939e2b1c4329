//! Scale-factor engine.
//!
//! A [`TauIdSf`] is resolved once for one configuration and then evaluated
//! as a pure function of the kinematic inputs. Each evaluation entry point is
//! defined for some schemes only; calling it on any other scheme fails with
//! [`TauIdError::UnsupportedOperation`].

use tauid_core::{
    Algorithm, ArtifactRecord, CorrectionStore, Era, ErrorInfo, Estimate, GenMatch, TauIdError,
    Triple, Uncertainty, WorkingPoint,
};
use tracing::info;

use crate::components::{Component, Source, Variation};
use crate::options::SfOptions;
use crate::resolver::{resolve_sf, Scheme, SfPlan};
use crate::variant::CorrectionVariant;

/// Momentum at or below which the per-decay-mode scale factor is zero.
pub const DM_PT_THRESHOLD: f64 = 40.0;

/// Resolved tau identification scale factor.
#[derive(Debug, Clone, PartialEq)]
pub struct TauIdSf {
    plan: SfPlan,
    variant: CorrectionVariant,
    provenance: Vec<ArtifactRecord>,
}

impl TauIdSf {
    /// Resolves and loads a configuration.
    pub fn new<S>(
        store: &S,
        era: Era,
        algorithm: Algorithm,
        working_point: WorkingPoint,
        options: &SfOptions,
    ) -> Result<Self, TauIdError>
    where
        S: CorrectionStore + ?Sized,
    {
        let plan = resolve_sf(era, algorithm, working_point, options)?;
        Self::from_plan(store, plan)
    }

    /// Same as [`TauIdSf::new`] with keys in their external spelling.
    pub fn from_labels<S>(
        store: &S,
        era: &str,
        algorithm: &str,
        working_point: &str,
        options: &SfOptions,
    ) -> Result<Self, TauIdError>
    where
        S: CorrectionStore + ?Sized,
    {
        Self::new(
            store,
            era.parse()?,
            algorithm.parse()?,
            working_point.parse()?,
            options,
        )
    }

    /// Loads an already resolved plan.
    pub fn from_plan<S>(store: &S, plan: SfPlan) -> Result<Self, TauIdError>
    where
        S: CorrectionStore + ?Sized,
    {
        let (variant, record) = CorrectionVariant::load(&plan, store)?;
        info!(
            scheme = %plan.scheme,
            era = %plan.era,
            algorithm = %plan.algorithm,
            working_point = %plan.working_point,
            artifact = %record.identity,
            "resolved tau ID scale factor"
        );
        Ok(Self {
            plan,
            variant,
            provenance: vec![record],
        })
    }

    /// The resolved plan.
    pub fn plan(&self) -> &SfPlan {
        &self.plan
    }

    /// Active scheme.
    pub fn scheme(&self) -> Scheme {
        self.variant.scheme()
    }

    /// Loaded correction.
    pub fn variant(&self) -> &CorrectionVariant {
        &self.variant
    }

    /// Artifacts read during construction.
    pub fn provenance(&self) -> &[ArtifactRecord] {
        &self.provenance
    }

    /// Parses an external variation name against this configuration's era.
    pub fn variation(&self, name: Option<&str>) -> Result<Variation, TauIdError> {
        Variation::parse(name, self.plan.label())
    }

    fn applies_to(&self, genmatch: GenMatch) -> bool {
        self.plan.genmatches.contains(&genmatch)
    }

    fn unsupported(&self, axis: &str) -> TauIdError {
        TauIdError::UnsupportedOperation(
            ErrorInfo::new(
                "tauid.sf.unsupported_axis",
                format!("{axis} evaluation is not defined for this scheme"),
            )
            .with_context("scheme", self.scheme().as_str())
            .with_context("axis", axis),
        )
    }

    fn foreign_component(&self, component: Component) -> TauIdError {
        let label = self.plan.label().unwrap_or_default();
        TauIdError::InvalidConfiguration(
            ErrorInfo::new(
                "tauid.unknown_component",
                format!(
                    "component '{}' is not defined for this scheme",
                    component.name(label)
                ),
            )
            .with_context("scheme", self.scheme().as_str()),
        )
    }

    /// Scale factor versus momentum.
    ///
    /// Defined for the momentum-curve and high-momentum schemes.
    pub fn evaluate_by_momentum(
        &self,
        pt: f64,
        genmatch: GenMatch,
        unc: Uncertainty,
    ) -> Result<Estimate, TauIdError> {
        let triple = match &self.variant {
            CorrectionVariant::PointsByMomentum(curves) => {
                if !self.applies_to(genmatch) {
                    return Ok(Triple::unit().select(unc));
                }
                curves.triple(pt)
            }
            CorrectionVariant::PointsByMomentumHighPt(points) => {
                if !self.applies_to(genmatch) {
                    return Ok(Triple::unit().select(unc));
                }
                points.bins()[points.locate(pt)].triple()
            }
            _ => return Err(self.unsupported("momentum")),
        };
        Ok(triple.select(unc))
    }

    /// High-momentum scale factor shifted by a single named component.
    pub fn evaluate_component_by_momentum(
        &self,
        pt: f64,
        genmatch: GenMatch,
        component: Component,
    ) -> Result<f64, TauIdError> {
        let CorrectionVariant::PointsByMomentumHighPt(points) = &self.variant else {
            return Err(self.unsupported("momentum component"));
        };
        let in_range = match component.source {
            Source::StatBin(k) => (1..=points.bins().len()).contains(&k),
            source => source.is_high_pt(),
        };
        if !in_range {
            return Err(self.foreign_component(component));
        }
        if !self.applies_to(genmatch) {
            return Ok(1.0);
        }
        points
            .component(pt, component)
            .ok_or_else(|| self.foreign_component(component))
    }

    /// Scale factor versus decay mode.
    ///
    /// Zero at or below [`DM_PT_THRESHOLD`] for genuine taus; one for other
    /// origins or unsupported decay modes.
    pub fn evaluate_by_decay_mode(
        &self,
        pt: f64,
        dm: i32,
        genmatch: GenMatch,
        unc: Uncertainty,
    ) -> Result<Estimate, TauIdError> {
        let CorrectionVariant::StepByDecayMode { table, decay_modes } = &self.variant else {
            return Err(self.unsupported("decay mode"));
        };
        if !self.applies_to(genmatch) {
            return Ok(Triple::unit().select(unc));
        }
        if pt <= DM_PT_THRESHOLD {
            return Ok(Triple::flat(0.0).select(unc));
        }
        if !decay_modes.contains(&dm) {
            return Ok(Triple::unit().select(unc));
        }
        Ok(table.triple(f64::from(dm), pt).select(unc))
    }

    /// Fitted scale factor versus decay mode and momentum.
    ///
    /// Momentum is clamped into the fitted window before evaluation.
    pub fn evaluate_by_decay_mode_and_momentum(
        &self,
        pt: f64,
        dm: i32,
        genmatch: GenMatch,
        unc: Uncertainty,
    ) -> Result<Estimate, TauIdError> {
        let CorrectionVariant::FittedByDecayModeAndMomentum(fitted) = &self.variant else {
            return Err(self.unsupported("decay mode and momentum"));
        };
        if !self.applies_to(genmatch) {
            return Ok(Triple::unit().select(unc));
        }
        Ok(match fitted.bucket(dm) {
            Some(bucket) => bucket.triple(pt).select(unc),
            None => Triple::unit().select(unc),
        })
    }

    /// Fitted scale factor evaluated on one named variation curve.
    pub fn evaluate_component_by_decay_mode_and_momentum(
        &self,
        pt: f64,
        dm: i32,
        genmatch: GenMatch,
        component: Component,
    ) -> Result<f64, TauIdError> {
        let CorrectionVariant::FittedByDecayModeAndMomentum(fitted) = &self.variant else {
            return Err(self.unsupported("decay mode and momentum component"));
        };
        if !component.source.is_fitted() {
            return Err(self.foreign_component(component));
        }
        if !self.applies_to(genmatch) {
            return Ok(1.0);
        }
        match fitted.bucket(dm) {
            Some(bucket) => bucket
                .component(pt, component)
                .ok_or_else(|| self.foreign_component(component)),
            None => Ok(1.0),
        }
    }

    /// Lepton fake scale factor versus pseudorapidity. The sign of `eta` is
    /// ignored.
    pub fn evaluate_by_eta(
        &self,
        eta: f64,
        genmatch: GenMatch,
        unc: Uncertainty,
    ) -> Result<Estimate, TauIdError> {
        let CorrectionVariant::StepByPseudorapidity { table, genmatches } = &self.variant else {
            return Err(self.unsupported("pseudorapidity"));
        };
        if !genmatches.contains(&genmatch) {
            return Ok(Triple::unit().select(unc));
        }
        Ok(table.triple(eta.abs(), 0.0).select(unc))
    }
}
