//! Configuration resolver.
//!
//! Maps a requested configuration to a validated plan: the evaluation scheme,
//! the artifact identity to read and the extra systematic to attach. Resolving
//! never touches a store, so every invalid combination is rejected before any
//! I/O.

use std::fmt::{self, Display};

use serde::{Deserialize, Serialize};
use tauid_core::{Algorithm, Discriminates, Era, ErrorInfo, GenMatch, TauIdError, WorkingPoint};

use crate::naming;
use crate::options::SfOptions;

/// Anti-jet working points measured for the fitted and high-momentum schemes.
pub const MEASURED_VS_JET_WPS: [WorkingPoint; 4] = [
    WorkingPoint::Loose,
    WorkingPoint::Medium,
    WorkingPoint::Tight,
    WorkingPoint::VTight,
];

/// Anti-electron working points measured for the fitted and high-momentum
/// schemes.
pub const MEASURED_VS_ELE_WPS: [WorkingPoint; 2] = [WorkingPoint::VVLoose, WorkingPoint::Tight];

/// Momentum at which the tiered working-point systematic steps up.
pub const TIER_THRESHOLD: f64 = 100.0;

/// Evaluation scheme of a resolved scale factor.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Scheme {
    /// Central/up/down curves in momentum.
    PointsByMomentum,
    /// One bin per decay mode.
    StepByDecayMode,
    /// Curves in momentum fitted per decay-mode bucket.
    FittedByDecayModeAndMomentum,
    /// Momentum bins with separate statistical and systematic errors.
    PointsByMomentumHighPt,
    /// Bins in absolute pseudorapidity for lepton fakes.
    StepByPseudorapidity,
}

impl Scheme {
    /// Stable name used in logs and CLI output.
    pub fn as_str(&self) -> &'static str {
        match self {
            Scheme::PointsByMomentum => "PointsByMomentum",
            Scheme::StepByDecayMode => "StepByDecayMode",
            Scheme::FittedByDecayModeAndMomentum => "FittedByDecayModeAndMomentum",
            Scheme::PointsByMomentumHighPt => "PointsByMomentumHighPt",
            Scheme::StepByPseudorapidity => "StepByPseudorapidity",
        }
    }
}

impl Display for Scheme {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Relative systematic added in quadrature on top of the measured error.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum ExtraSystematic {
    /// Same fraction everywhere.
    Flat(f64),
    /// `below` under `threshold` in momentum, `above` at or over it.
    Tiered {
        /// Momentum boundary.
        threshold: f64,
        /// Fraction below the boundary.
        below: f64,
        /// Fraction at or above the boundary.
        above: f64,
    },
}

impl ExtraSystematic {
    /// Relative size at momentum `pt`.
    pub fn at(&self, pt: f64) -> f64 {
        match *self {
            ExtraSystematic::Flat(fraction) => fraction,
            ExtraSystematic::Tiered {
                threshold,
                below,
                above,
            } => {
                if pt < threshold {
                    below
                } else {
                    above
                }
            }
        }
    }
}

/// Validated scale-factor configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SfPlan {
    /// Campaign.
    pub era: Era,
    /// Identification algorithm.
    pub algorithm: Algorithm,
    /// Working point of `algorithm`.
    pub working_point: WorkingPoint,
    /// Options the plan was resolved from.
    pub options: SfOptions,
    /// Selected scheme.
    pub scheme: Scheme,
    /// Artifact holding the correction.
    pub artifact: String,
    /// Working-point mismatch systematic, if requested.
    pub extra: Option<ExtraSystematic>,
    /// Decay modes the correction is defined for.
    pub decay_modes: Vec<i32>,
    /// Generator-match categories the correction applies to.
    pub genmatches: Vec<GenMatch>,
}

impl SfPlan {
    /// In-artifact era label; present for the ultra-legacy schemes.
    pub fn label(&self) -> Option<&'static str> {
        self.era.label()
    }
}

fn rejected(code: &str, message: impl Into<String>, era: Era, algorithm: Algorithm) -> TauIdError {
    TauIdError::InvalidConfiguration(
        ErrorInfo::new(code, message)
            .with_context("era", era.as_str())
            .with_context("algorithm", algorithm.as_str()),
    )
}

/// Resolves a scale-factor configuration.
pub fn resolve_sf(
    era: Era,
    algorithm: Algorithm,
    working_point: WorkingPoint,
    options: &SfOptions,
) -> Result<SfPlan, TauIdError> {
    if options.scheme_flags() > 1 {
        return Err(rejected(
            "tauid.sf.exclusive_schemes",
            "decay_mode, dm_and_pt and high_pt are mutually exclusive",
            era,
            algorithm,
        ));
    }
    let (scheme, artifact, extra, genmatches) = match algorithm.discriminates() {
        Discriminates::Jet => resolve_vs_jet(era, algorithm, working_point, options)?,
        Discriminates::Electron | Discriminates::Muon => {
            resolve_vs_lepton(era, algorithm, options)?
        }
    };
    Ok(SfPlan {
        era,
        algorithm,
        working_point,
        options: options.clone(),
        scheme,
        artifact,
        extra,
        decay_modes: algorithm.decay_modes().to_vec(),
        genmatches,
    })
}

type Resolved = (Scheme, String, Option<ExtraSystematic>, Vec<GenMatch>);

fn resolve_vs_jet(
    era: Era,
    algorithm: Algorithm,
    working_point: WorkingPoint,
    options: &SfOptions,
) -> Result<Resolved, TauIdError> {
    let hadronic = vec![GenMatch::HadronicTau];
    if options.dm_and_pt || options.high_pt {
        let tag = measured_tag(era, algorithm, working_point, options)?;
        return Ok(if options.dm_and_pt {
            (
                Scheme::FittedByDecayModeAndMomentum,
                naming::sf_dm_pt_artifact(algorithm, working_point, options.vs_ele_wp, tag),
                None,
                hadronic,
            )
        } else {
            (
                Scheme::PointsByMomentumHighPt,
                naming::sf_high_pt_artifact(algorithm, working_point, options.vs_ele_wp, tag),
                None,
                hadronic,
            )
        });
    }
    if options.embedded && !algorithm.is_deep_tau() {
        return Err(rejected(
            "tauid.sf.embedded_unsupported",
            "scale factors for embedded samples are not provided for the MVA identification",
            era,
            algorithm,
        )
        .with_context("embedded", "true"));
    }
    let mismatch = if options.embedded { 0.05 } else { 0.03 };
    Ok(if options.decay_mode {
        (
            Scheme::StepByDecayMode,
            naming::sf_dm_artifact(algorithm, era, options.embedded),
            options
                .other_lepton_wp
                .then_some(ExtraSystematic::Flat(mismatch)),
            hadronic,
        )
    } else {
        (
            Scheme::PointsByMomentum,
            naming::sf_pt_artifact(algorithm, era, options.embedded),
            options.other_lepton_wp.then_some(ExtraSystematic::Tiered {
                threshold: TIER_THRESHOLD,
                below: mismatch,
                above: 0.15,
            }),
            hadronic,
        )
    })
}

/// Validates the preconditions of the per-WP-pair measurements and returns
/// their release tag.
fn measured_tag(
    era: Era,
    algorithm: Algorithm,
    working_point: WorkingPoint,
    options: &SfOptions,
) -> Result<&'static str, TauIdError> {
    let scheme = if options.dm_and_pt { "dm_and_pt" } else { "high_pt" };
    let tag = algorithm.measurement_tag().ok_or_else(|| {
        rejected(
            "tauid.sf.deep_tau_only",
            format!("{scheme} scale factors exist only for DeepTau"),
            era,
            algorithm,
        )
    })?;
    if !era.is_ultra_legacy() {
        return Err(rejected(
            "tauid.sf.ultra_legacy_only",
            format!("{scheme} scale factors exist only for ultra-legacy eras"),
            era,
            algorithm,
        ));
    }
    if options.embedded {
        return Err(rejected(
            "tauid.sf.embedded_unsupported",
            format!("{scheme} scale factors are not provided for embedded samples"),
            era,
            algorithm,
        )
        .with_context("embedded", "true"));
    }
    if options.other_lepton_wp {
        return Err(rejected(
            "tauid.sf.other_lepton_wp",
            format!("{scheme} scale factors are measured per anti-electron working point"),
            era,
            algorithm,
        )
        .with_context("vs_ele_wp", options.vs_ele_wp.as_str()));
    }
    if !MEASURED_VS_JET_WPS.contains(&working_point)
        || !MEASURED_VS_ELE_WPS.contains(&options.vs_ele_wp)
    {
        return Err(TauIdError::InvalidConfiguration(
            ErrorInfo::new(
                "tauid.sf.working_point_pair",
                format!("{scheme} scale factors were not measured for this working-point pair"),
            )
            .with_context("era", era.as_str())
            .with_context("algorithm", algorithm.as_str())
            .with_context("working_point", working_point.as_str())
            .with_context("vs_ele_wp", options.vs_ele_wp.as_str())
            .with_hint("VSjet Loose/Medium/Tight/VTight with VSe VVLoose/Tight"),
        ));
    }
    Ok(tag)
}

fn resolve_vs_lepton(
    era: Era,
    algorithm: Algorithm,
    options: &SfOptions,
) -> Result<Resolved, TauIdError> {
    if options.scheme_flags() > 0 {
        return Err(rejected(
            "tauid.sf.vs_jet_only",
            "decay-mode and high-momentum schemes exist only for anti-jet identification",
            era,
            algorithm,
        ));
    }
    if options.embedded {
        return Err(rejected(
            "tauid.sf.embedded_unsupported",
            "scale factors for embedded samples are not provided for anti-lepton discriminators",
            era,
            algorithm,
        )
        .with_context("embedded", "true"));
    }
    if options.other_lepton_wp {
        return Err(rejected(
            "tauid.sf.other_lepton_wp",
            "the working-point mismatch systematic applies only to anti-jet identification",
            era,
            algorithm,
        ));
    }
    let genmatches = if algorithm.discriminates() == Discriminates::Electron {
        vec![GenMatch::PromptElectron, GenMatch::TauToElectron]
    } else {
        vec![GenMatch::PromptMuon, GenMatch::TauToMuon]
    };
    Ok((
        Scheme::StepByPseudorapidity,
        naming::sf_eta_artifact(algorithm, era),
        None,
        genmatches,
    ))
}

/// Energy-scale table layout.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum EsScheme {
    /// Low- and high-momentum tables with an interpolated error in between.
    DualTable,
    /// One low-momentum table and a fixed error above a cutoff.
    SingleTable,
}

/// Validated energy-scale configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TesPlan {
    /// Campaign.
    pub era: Era,
    /// Anti-jet algorithm the scale was measured with.
    pub algorithm: Algorithm,
    /// Table layout.
    pub scheme: EsScheme,
    /// Low-momentum table artifact.
    pub artifact: String,
    /// High-momentum table artifact of the dual-table layout.
    pub high_pt_artifact: Option<String>,
    /// Decay modes the scale is defined for.
    pub decay_modes: Vec<i32>,
}

/// Resolves an energy-scale configuration.
pub fn resolve_tes(era: Era, algorithm: Algorithm) -> Result<TesPlan, TauIdError> {
    if algorithm.discriminates() != Discriminates::Jet {
        return Err(rejected(
            "tauid.tes.vs_jet_only",
            "tau energy scales are measured for anti-jet identification only",
            era,
            algorithm,
        ));
    }
    let (scheme, high_pt_artifact) = if era.is_ultra_legacy() {
        (EsScheme::SingleTable, None)
    } else {
        (
            EsScheme::DualTable,
            Some(naming::tes_high_pt_artifact(algorithm, era)),
        )
    };
    Ok(TesPlan {
        era,
        algorithm,
        scheme,
        artifact: naming::tes_artifact(algorithm, era),
        high_pt_artifact,
        decay_modes: algorithm.decay_modes().to_vec(),
    })
}

/// Validated fake energy-scale configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FesPlan {
    /// Campaign.
    pub era: Era,
    /// Anti-electron algorithm.
    pub algorithm: Algorithm,
    /// Artifact holding the graph.
    pub artifact: String,
}

/// Resolves a fake energy-scale configuration.
pub fn resolve_fes(era: Era, algorithm: Algorithm) -> Result<FesPlan, TauIdError> {
    if algorithm.discriminates() != Discriminates::Electron || !algorithm.is_deep_tau() {
        return Err(rejected(
            "tauid.fes.vs_electron_only",
            "electron fake energy scales exist only for DeepTau anti-electron discriminators",
            era,
            algorithm,
        ));
    }
    Ok(FesPlan {
        era,
        algorithm,
        artifact: naming::fes_artifact(algorithm, era),
    })
}
