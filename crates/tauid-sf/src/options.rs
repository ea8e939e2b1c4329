//! Construction options for the scale-factor engine.

use serde::{Deserialize, Serialize};
use tauid_core::WorkingPoint;

fn default_vs_ele_wp() -> WorkingPoint {
    WorkingPoint::VVLoose
}

/// Named flags selecting the scale-factor scheme and its extra terms.
///
/// At most one of `decay_mode`, `dm_and_pt` and `high_pt` may be set; with
/// none of them the momentum-dependent scheme is used.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SfOptions {
    /// Per-decay-mode binning instead of the momentum curves.
    #[serde(default)]
    pub decay_mode: bool,
    /// Curves fitted jointly in decay mode and momentum.
    #[serde(default)]
    pub dm_and_pt: bool,
    /// Use the embedding-specific artifacts.
    #[serde(default)]
    pub embedded: bool,
    /// High-momentum scheme derived from W* events.
    #[serde(default)]
    pub high_pt: bool,
    /// The anti-lepton working point differs from the measured one; attaches
    /// an extra systematic.
    #[serde(default)]
    pub other_lepton_wp: bool,
    /// Anti-electron working point the fitted and high-momentum schemes were
    /// measured with.
    #[serde(default = "default_vs_ele_wp")]
    pub vs_ele_wp: WorkingPoint,
}

impl Default for SfOptions {
    fn default() -> Self {
        Self {
            decay_mode: false,
            dm_and_pt: false,
            embedded: false,
            high_pt: false,
            other_lepton_wp: false,
            vs_ele_wp: default_vs_ele_wp(),
        }
    }
}

impl SfOptions {
    /// Options for the per-decay-mode scheme.
    pub fn by_decay_mode() -> Self {
        Self {
            decay_mode: true,
            ..Self::default()
        }
    }

    /// Options for the fitted decay-mode and momentum scheme.
    pub fn by_decay_mode_and_momentum(vs_ele_wp: WorkingPoint) -> Self {
        Self {
            dm_and_pt: true,
            vs_ele_wp,
            ..Self::default()
        }
    }

    /// Options for the high-momentum scheme.
    pub fn high_momentum(vs_ele_wp: WorkingPoint) -> Self {
        Self {
            high_pt: true,
            vs_ele_wp,
            ..Self::default()
        }
    }

    /// Marks the artifacts as embedding-specific.
    pub fn embedded(mut self) -> Self {
        self.embedded = true;
        self
    }

    /// Attaches the working-point mismatch systematic.
    pub fn other_lepton_wp(mut self) -> Self {
        self.other_lepton_wp = true;
        self
    }

    pub(crate) fn scheme_flags(&self) -> usize {
        [self.decay_mode, self.dm_and_pt, self.high_pt]
            .into_iter()
            .filter(|flag| *flag)
            .count()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_fields_take_defaults() {
        let options: SfOptions = serde_json::from_str(r#"{"decay_mode": true}"#).unwrap();
        assert_eq!(options, SfOptions::by_decay_mode());
        assert_eq!(options.vs_ele_wp, WorkingPoint::VVLoose);
    }

    #[test]
    fn counts_scheme_flags() {
        let mut options = SfOptions::high_momentum(WorkingPoint::Tight);
        assert_eq!(options.scheme_flags(), 1);
        options.decay_mode = true;
        assert_eq!(options.scheme_flags(), 2);
    }
}
