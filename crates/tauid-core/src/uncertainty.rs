//! Uncertainty requests and evaluated correction values.

use std::fmt::{self, Display};
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use tracing::trace;

use crate::errors::{ErrorInfo, TauIdError};

/// Which variation of a correction the caller wants.
///
/// The external vocabulary is the empty string (or `None`) for the nominal
/// value, `Up`, `Down` and `All`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum Uncertainty {
    /// Central value only.
    #[default]
    Nominal,
    /// Central value shifted up by the combined error.
    Up,
    /// Central value shifted down by the combined error, never below zero.
    Down,
    /// The full `(down, central, up)` triple.
    All,
}

impl Uncertainty {
    /// Parses the optional external spelling; `None` means nominal.
    pub fn from_label(label: Option<&str>) -> Result<Self, TauIdError> {
        match label {
            None => Ok(Uncertainty::Nominal),
            Some(label) => label.parse(),
        }
    }

    /// External spelling (`""` for nominal).
    pub fn as_str(&self) -> &'static str {
        match self {
            Uncertainty::Nominal => "",
            Uncertainty::Up => "Up",
            Uncertainty::Down => "Down",
            Uncertainty::All => "All",
        }
    }
}

impl Display for Uncertainty {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Uncertainty::Nominal => f.write_str("Nominal"),
            other => f.write_str(other.as_str()),
        }
    }
}

impl FromStr for Uncertainty {
    type Err = TauIdError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "" => Ok(Uncertainty::Nominal),
            "Up" => Ok(Uncertainty::Up),
            "Down" => Ok(Uncertainty::Down),
            "All" => Ok(Uncertainty::All),
            other => Err(TauIdError::InvalidConfiguration(
                ErrorInfo::new(
                    "tauid.unknown_uncertainty",
                    format!("'{other}' is not a valid uncertainty request"),
                )
                .with_hint("use \"\", \"Up\", \"Down\" or \"All\""),
            )),
        }
    }
}

/// Direction of a named uncertainty component.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum Direction {
    /// Upward variation.
    Up,
    /// Downward variation.
    Down,
}

impl Direction {
    /// Suffix used in component names (`_up` / `_down`).
    pub fn suffix(&self) -> &'static str {
        match self {
            Direction::Up => "up",
            Direction::Down => "down",
        }
    }
}

/// A correction with its asymmetric variations.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Triple {
    /// Downward variation.
    pub down: f64,
    /// Central value.
    pub central: f64,
    /// Upward variation.
    pub up: f64,
}

impl Triple {
    /// Creates a triple from explicit values.
    pub const fn new(down: f64, central: f64, up: f64) -> Self {
        Self { down, central, up }
    }

    /// A flat value with no variation.
    pub const fn flat(value: f64) -> Self {
        Self::new(value, value, value)
    }

    /// The identity correction `(1, 1, 1)`.
    pub const fn unit() -> Self {
        Self::flat(1.0)
    }

    /// Builds `(central - err_down, central, central + err_up)` with the
    /// downward value clamped at zero.
    pub fn from_errors(central: f64, err_down: f64, err_up: f64) -> Self {
        Self::new(clamp_down(central - err_down), central, central + err_up)
    }

    /// Builds a triple from already-shifted values, clamping the downward one.
    pub fn from_values(down: f64, central: f64, up: f64) -> Self {
        Self::new(clamp_down(down), central, up)
    }

    /// Picks the requested variation.
    pub fn select(&self, mode: Uncertainty) -> Estimate {
        match mode {
            Uncertainty::Nominal => Estimate::Value(self.central),
            Uncertainty::Up => Estimate::Value(self.up),
            Uncertainty::Down => Estimate::Value(self.down),
            Uncertainty::All => Estimate::Triple(*self),
        }
    }
}

/// Result of an evaluation: a single value, or the full triple for
/// [`Uncertainty::All`].
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Estimate {
    /// Nominal, up or down value.
    Value(f64),
    /// `(down, central, up)`.
    Triple(Triple),
}

impl Estimate {
    /// The value for single-valued requests.
    pub fn value(&self) -> Option<f64> {
        match self {
            Estimate::Value(value) => Some(*value),
            Estimate::Triple(_) => None,
        }
    }

    /// The triple for `All` requests.
    pub fn triple(&self) -> Option<Triple> {
        match self {
            Estimate::Value(_) => None,
            Estimate::Triple(triple) => Some(*triple),
        }
    }

    /// Central value, whichever shape was returned.
    pub fn central(&self) -> f64 {
        match self {
            Estimate::Value(value) => *value,
            Estimate::Triple(triple) => triple.central,
        }
    }
}

/// Combines uncertainty terms in quadrature.
pub fn quadrature(terms: &[f64]) -> f64 {
    terms.iter().map(|term| term * term).sum::<f64>().sqrt()
}

/// Replaces a negative downward-shifted correction with zero.
pub fn clamp_down(value: f64) -> f64 {
    if value < 0.0 {
        trace!(value, "downward variation clamped to zero");
        0.0
    } else {
        value
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_external_vocabulary() {
        assert_eq!(Uncertainty::from_label(None).unwrap(), Uncertainty::Nominal);
        assert_eq!("".parse::<Uncertainty>().unwrap(), Uncertainty::Nominal);
        assert_eq!("All".parse::<Uncertainty>().unwrap(), Uncertainty::All);
        assert!("up".parse::<Uncertainty>().is_err());
    }

    #[test]
    fn down_never_negative() {
        let triple = Triple::from_errors(0.2, 0.5, 0.5);
        assert_eq!(triple.down, 0.0);
        assert!((triple.up - 0.7).abs() < 1e-12);
        assert_eq!(triple.select(Uncertainty::Down), Estimate::Value(0.0));
    }

    #[test]
    fn quadrature_sum() {
        assert!((quadrature(&[3.0, 4.0]) - 5.0).abs() < 1e-12);
        assert_eq!(quadrature(&[]), 0.0);
    }
}
