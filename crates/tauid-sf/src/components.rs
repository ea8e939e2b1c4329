//! Named uncertainty components of the fitted and high-momentum schemes.
//!
//! Component names are external vocabulary (`uncert0_up`, `syst_2018_down`,
//! `stat_bin2_up`, ...). They parse into [`Component`] once, against the era
//! label of the resolved configuration.

use std::fmt::{self, Display};

use serde::{Deserialize, Serialize};
use tauid_core::{Direction, ErrorInfo, TauIdError, Uncertainty};

/// Origin of an uncertainty component.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum Source {
    /// First eigenvector of the fit covariance.
    Uncert0,
    /// Second eigenvector of the fit covariance.
    Uncert1,
    /// Systematic correlated across eras.
    SystAllEras,
    /// Systematic specific to the configured era.
    SystEra,
    /// Tau energy-scale systematic.
    SystTes,
    /// Statistical error of the 1-based momentum bin.
    StatBin(usize),
}

impl Source {
    /// Sources stored for every bucket of the fitted scheme.
    pub const FITTED: [Source; 5] = [
        Source::Uncert0,
        Source::Uncert1,
        Source::SystAllEras,
        Source::SystEra,
        Source::SystTes,
    ];

    /// Whether the fitted scheme stores curves for this source.
    pub fn is_fitted(&self) -> bool {
        !matches!(self, Source::StatBin(_))
    }

    /// Whether the high-momentum scheme defines this source.
    pub fn is_high_pt(&self) -> bool {
        matches!(
            self,
            Source::StatBin(_) | Source::SystAllEras | Source::SystEra
        )
    }
}

/// A single directed uncertainty component.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct Component {
    /// What the component varies.
    pub source: Source,
    /// Which way.
    pub direction: Direction,
}

impl Component {
    /// Creates a component.
    pub const fn new(source: Source, direction: Direction) -> Self {
        Self { source, direction }
    }

    /// Parses an external component name for an era with in-artifact
    /// `label`.
    pub fn parse(name: &str, label: &str) -> Result<Self, TauIdError> {
        let (body, direction) = if let Some(body) = name.strip_suffix("_up") {
            (body, Direction::Up)
        } else if let Some(body) = name.strip_suffix("_down") {
            (body, Direction::Down)
        } else {
            return Err(unknown_component(name, label));
        };
        let source = match body {
            "uncert0" => Source::Uncert0,
            "uncert1" => Source::Uncert1,
            "syst_alleras" => Source::SystAllEras,
            "syst_TES" => Source::SystTes,
            other => {
                if let Some(index) = other.strip_prefix("stat_bin") {
                    match index.parse::<usize>() {
                        Ok(k) if k >= 1 => Source::StatBin(k),
                        _ => return Err(unknown_component(name, label)),
                    }
                } else if other.strip_prefix("syst_") == Some(label) {
                    Source::SystEra
                } else {
                    return Err(unknown_component(name, label));
                }
            }
        };
        Ok(Self { source, direction })
    }

    /// External name of the component for an era with in-artifact `label`.
    pub fn name(&self, label: &str) -> String {
        let dir = self.direction.suffix();
        match self.source {
            Source::Uncert0 => format!("uncert0_{dir}"),
            Source::Uncert1 => format!("uncert1_{dir}"),
            Source::SystAllEras => format!("syst_alleras_{dir}"),
            Source::SystEra => format!("syst_{label}_{dir}"),
            Source::SystTes => format!("syst_TES_{dir}"),
            Source::StatBin(k) => format!("stat_bin{k}_{dir}"),
        }
    }
}

impl Display for Component {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name("<era>"))
    }
}

/// A variation request: one of the generic modes or a single named
/// component.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Variation {
    /// Nominal, `Up`, `Down` or `All`.
    Mode(Uncertainty),
    /// A named component.
    Component(Component),
}

impl Variation {
    /// Parses an optional external name. Component names need the era
    /// `label`; without one only the generic modes are accepted.
    pub fn parse(name: Option<&str>, label: Option<&str>) -> Result<Self, TauIdError> {
        let name = match name {
            None | Some("") => return Ok(Variation::Mode(Uncertainty::Nominal)),
            Some(name) => name,
        };
        if let Ok(mode) = name.parse::<Uncertainty>() {
            return Ok(Variation::Mode(mode));
        }
        match label {
            Some(label) => Component::parse(name, label).map(Variation::Component),
            None => Err(TauIdError::InvalidConfiguration(
                ErrorInfo::new(
                    "tauid.unknown_uncertainty",
                    format!("'{name}' is not a valid uncertainty request"),
                )
                .with_hint("use \"\", \"Up\", \"Down\" or \"All\""),
            )),
        }
    }
}

fn unknown_component(name: &str, label: &str) -> TauIdError {
    TauIdError::InvalidConfiguration(
        ErrorInfo::new(
            "tauid.unknown_component",
            format!("'{name}' is not a valid uncertainty component"),
        )
        .with_context("component", name)
        .with_context("label", label)
        .with_hint(format!(
            "use uncert0_up/down, uncert1_up/down, syst_alleras_up/down, syst_{label}_up/down, \
             syst_TES_up/down or stat_bin<k>_up/down"
        )),
    )
}
