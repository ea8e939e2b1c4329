//! Classification keys: eras, identification algorithms, working points and
//! generator-match categories.
//!
//! Every key keeps its external spelling (`as_str`/`FromStr`) bit-exact, since
//! artifact identities and object names are composed from these strings.

use std::fmt::{self, Display};
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::errors::{ErrorInfo, TauIdError};

fn unknown(kind: &str, value: &str, allowed: &[&str]) -> TauIdError {
    TauIdError::InvalidConfiguration(
        ErrorInfo::new(
            format!("tauid.unknown_{kind}"),
            format!("'{value}' is not a valid {kind}"),
        )
        .with_context(kind, value)
        .with_hint(format!("choose from {}", allowed.join(", "))),
    )
}

/// Data-taking campaign with independently measured calibrations.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum Era {
    /// 2016 legacy reprocessing.
    #[serde(rename = "2016Legacy")]
    Legacy2016,
    /// 2017 re-reconstruction.
    #[serde(rename = "2017ReReco")]
    ReReco2017,
    /// 2018 re-reconstruction.
    #[serde(rename = "2018ReReco")]
    ReReco2018,
    /// Ultra-legacy 2016, before the VFP change.
    #[serde(rename = "UL2016_preVFP")]
    Ul2016PreVfp,
    /// Ultra-legacy 2016, after the VFP change.
    #[serde(rename = "UL2016_postVFP")]
    Ul2016PostVfp,
    /// Ultra-legacy 2017.
    #[serde(rename = "UL2017")]
    Ul2017,
    /// Ultra-legacy 2018.
    #[serde(rename = "UL2018")]
    Ul2018,
}

impl Era {
    /// Every supported campaign, in chronological order of processing.
    pub const ALL: [Era; 7] = [
        Era::Legacy2016,
        Era::ReReco2017,
        Era::ReReco2018,
        Era::Ul2016PreVfp,
        Era::Ul2016PostVfp,
        Era::Ul2017,
        Era::Ul2018,
    ];

    /// External campaign spelling used in artifact identities.
    pub fn as_str(&self) -> &'static str {
        match self {
            Era::Legacy2016 => "2016Legacy",
            Era::ReReco2017 => "2017ReReco",
            Era::ReReco2018 => "2018ReReco",
            Era::Ul2016PreVfp => "UL2016_preVFP",
            Era::Ul2016PostVfp => "UL2016_postVFP",
            Era::Ul2017 => "UL2017",
            Era::Ul2018 => "UL2018",
        }
    }

    /// Whether the campaign belongs to the ultra-legacy reprocessing.
    pub fn is_ultra_legacy(&self) -> bool {
        self.label().is_some()
    }

    /// Era label used inside ultra-legacy artifacts (`DM0_2018_fit`, ...).
    pub fn label(&self) -> Option<&'static str> {
        match self {
            Era::Ul2016PreVfp => Some("2016_preVFP"),
            Era::Ul2016PostVfp => Some("2016_postVFP"),
            Era::Ul2017 => Some("2017"),
            Era::Ul2018 => Some("2018"),
            _ => None,
        }
    }
}

impl Display for Era {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Era {
    type Err = TauIdError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Era::ALL
            .into_iter()
            .find(|era| era.as_str() == s)
            .ok_or_else(|| {
                let allowed: Vec<&str> = Era::ALL.iter().map(Era::as_str).collect();
                unknown("era", s, &allowed)
            })
    }
}

/// Background an identification algorithm discriminates against.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Discriminates {
    /// Quark and gluon jets.
    Jet,
    /// Electrons.
    Electron,
    /// Muons.
    Muon,
}

/// Supported tau identification algorithms.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum Algorithm {
    /// Legacy MVA isolation, old decay-mode reconstruction.
    #[serde(rename = "MVAoldDM2017v2")]
    MvaOldDm2017v2,
    /// DeepTau v2.1 against jets.
    #[serde(rename = "DeepTau2017v2p1VSjet")]
    DeepTau2017v2p1VsJet,
    /// DeepTau v2.5 against jets.
    #[serde(rename = "DeepTau2018v2p5VSjet")]
    DeepTau2018v2p5VsJet,
    /// Legacy MVA discriminator against electrons.
    #[serde(rename = "antiEleMVA6")]
    AntiEleMva6,
    /// DeepTau v2.1 against electrons.
    #[serde(rename = "DeepTau2017v2p1VSe")]
    DeepTau2017v2p1VsE,
    /// DeepTau v2.5 against electrons.
    #[serde(rename = "DeepTau2018v2p5VSe")]
    DeepTau2018v2p5VsE,
    /// Cut-based discriminator against muons.
    #[serde(rename = "antiMu3")]
    AntiMu3,
    /// DeepTau v2.1 against muons.
    #[serde(rename = "DeepTau2017v2p1VSmu")]
    DeepTau2017v2p1VsMu,
    /// DeepTau v2.5 against muons.
    #[serde(rename = "DeepTau2018v2p5VSmu")]
    DeepTau2018v2p5VsMu,
}

impl Algorithm {
    /// Every supported algorithm.
    pub const ALL: [Algorithm; 9] = [
        Algorithm::MvaOldDm2017v2,
        Algorithm::DeepTau2017v2p1VsJet,
        Algorithm::DeepTau2018v2p5VsJet,
        Algorithm::AntiEleMva6,
        Algorithm::DeepTau2017v2p1VsE,
        Algorithm::DeepTau2018v2p5VsE,
        Algorithm::AntiMu3,
        Algorithm::DeepTau2017v2p1VsMu,
        Algorithm::DeepTau2018v2p5VsMu,
    ];

    /// External algorithm identifier used in artifact identities.
    pub fn as_str(&self) -> &'static str {
        match self {
            Algorithm::MvaOldDm2017v2 => "MVAoldDM2017v2",
            Algorithm::DeepTau2017v2p1VsJet => "DeepTau2017v2p1VSjet",
            Algorithm::DeepTau2018v2p5VsJet => "DeepTau2018v2p5VSjet",
            Algorithm::AntiEleMva6 => "antiEleMVA6",
            Algorithm::DeepTau2017v2p1VsE => "DeepTau2017v2p1VSe",
            Algorithm::DeepTau2018v2p5VsE => "DeepTau2018v2p5VSe",
            Algorithm::AntiMu3 => "antiMu3",
            Algorithm::DeepTau2017v2p1VsMu => "DeepTau2017v2p1VSmu",
            Algorithm::DeepTau2018v2p5VsMu => "DeepTau2018v2p5VSmu",
        }
    }

    /// Background rejected by this algorithm.
    pub fn discriminates(&self) -> Discriminates {
        match self {
            Algorithm::MvaOldDm2017v2
            | Algorithm::DeepTau2017v2p1VsJet
            | Algorithm::DeepTau2018v2p5VsJet => Discriminates::Jet,
            Algorithm::AntiEleMva6
            | Algorithm::DeepTau2017v2p1VsE
            | Algorithm::DeepTau2018v2p5VsE => Discriminates::Electron,
            Algorithm::AntiMu3
            | Algorithm::DeepTau2017v2p1VsMu
            | Algorithm::DeepTau2018v2p5VsMu => Discriminates::Muon,
        }
    }

    /// Whether the algorithm is one of the DeepTau networks.
    pub fn is_deep_tau(&self) -> bool {
        self.measurement_tag().is_some()
    }

    /// Release tag appended to artifacts of the per-WP-pair measurements.
    pub fn measurement_tag(&self) -> Option<&'static str> {
        match self {
            Algorithm::DeepTau2017v2p1VsJet
            | Algorithm::DeepTau2017v2p1VsE
            | Algorithm::DeepTau2017v2p1VsMu => Some("Mar07"),
            Algorithm::DeepTau2018v2p5VsJet
            | Algorithm::DeepTau2018v2p5VsE
            | Algorithm::DeepTau2018v2p5VsMu => Some("Jul18"),
            _ => None,
        }
    }

    /// Reconstructed decay modes for which the algorithm was calibrated.
    ///
    /// The old decay-mode reconstruction has no three-prong plus pi0 mode.
    pub fn decay_modes(&self) -> &'static [i32] {
        match self {
            Algorithm::MvaOldDm2017v2 => &[0, 1, 10],
            _ => &[0, 1, 10, 11],
        }
    }
}

impl Display for Algorithm {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Algorithm {
    type Err = TauIdError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Algorithm::ALL
            .into_iter()
            .find(|alg| alg.as_str() == s)
            .ok_or_else(|| {
                let allowed: Vec<&str> = Algorithm::ALL.iter().map(Algorithm::as_str).collect();
                unknown("algorithm", s, &allowed)
            })
    }
}

/// Named operating threshold of an identification algorithm.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum WorkingPoint {
    /// Very-very-very loose.
    VVVLoose,
    /// Very-very loose.
    VVLoose,
    /// Very loose.
    VLoose,
    /// Loose.
    Loose,
    /// Medium.
    Medium,
    /// Tight.
    Tight,
    /// Very tight.
    VTight,
    /// Very-very tight.
    VVTight,
}

impl WorkingPoint {
    /// Every working point, loosest first.
    pub const ALL: [WorkingPoint; 8] = [
        WorkingPoint::VVVLoose,
        WorkingPoint::VVLoose,
        WorkingPoint::VLoose,
        WorkingPoint::Loose,
        WorkingPoint::Medium,
        WorkingPoint::Tight,
        WorkingPoint::VTight,
        WorkingPoint::VVTight,
    ];

    /// External spelling, also the object name in binned artifacts.
    pub fn as_str(&self) -> &'static str {
        match self {
            WorkingPoint::VVVLoose => "VVVLoose",
            WorkingPoint::VVLoose => "VVLoose",
            WorkingPoint::VLoose => "VLoose",
            WorkingPoint::Loose => "Loose",
            WorkingPoint::Medium => "Medium",
            WorkingPoint::Tight => "Tight",
            WorkingPoint::VTight => "VTight",
            WorkingPoint::VVTight => "VVTight",
        }
    }
}

impl Display for WorkingPoint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for WorkingPoint {
    type Err = TauIdError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        WorkingPoint::ALL
            .into_iter()
            .find(|wp| wp.as_str() == s)
            .ok_or_else(|| {
                let allowed: Vec<&str> =
                    WorkingPoint::ALL.iter().map(WorkingPoint::as_str).collect();
                unknown("working_point", s, &allowed)
            })
    }
}

/// Truth origin of a reconstructed tau candidate.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[repr(u8)]
pub enum GenMatch {
    /// No generator particle matched.
    Unmatched = 0,
    /// Prompt electron.
    PromptElectron = 1,
    /// Prompt muon.
    PromptMuon = 2,
    /// Electron from a leptonic tau decay.
    TauToElectron = 3,
    /// Muon from a leptonic tau decay.
    TauToMuon = 4,
    /// Genuine hadronic tau decay.
    HadronicTau = 5,
    /// Quark or gluon jet.
    Jet = 6,
}

impl GenMatch {
    /// Numeric category code used by analysis ntuples.
    pub fn code(&self) -> u8 {
        *self as u8
    }

    /// Electron-like fake origins (prompt or from tau decay).
    pub fn is_electron_like(&self) -> bool {
        matches!(self, GenMatch::PromptElectron | GenMatch::TauToElectron)
    }

    /// Muon-like fake origins (prompt or from tau decay).
    pub fn is_muon_like(&self) -> bool {
        matches!(self, GenMatch::PromptMuon | GenMatch::TauToMuon)
    }
}

impl TryFrom<i32> for GenMatch {
    type Error = TauIdError;

    fn try_from(value: i32) -> Result<Self, Self::Error> {
        match value {
            0 => Ok(GenMatch::Unmatched),
            1 => Ok(GenMatch::PromptElectron),
            2 => Ok(GenMatch::PromptMuon),
            3 => Ok(GenMatch::TauToElectron),
            4 => Ok(GenMatch::TauToMuon),
            5 => Ok(GenMatch::HadronicTau),
            6 => Ok(GenMatch::Jet),
            other => Err(unknown(
                "genmatch",
                &other.to_string(),
                &["0", "1", "2", "3", "4", "5", "6"],
            )),
        }
    }
}

impl Default for GenMatch {
    fn default() -> Self {
        GenMatch::HadronicTau
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn spellings_round_trip() {
        for era in Era::ALL {
            assert_eq!(era.as_str().parse::<Era>().unwrap(), era);
        }
        for alg in Algorithm::ALL {
            assert_eq!(alg.as_str().parse::<Algorithm>().unwrap(), alg);
        }
        for wp in WorkingPoint::ALL {
            assert_eq!(wp.as_str().parse::<WorkingPoint>().unwrap(), wp);
        }
    }

    #[test]
    fn serde_uses_external_spelling() {
        let json = serde_json::to_string(&Era::Ul2016PreVfp).unwrap();
        assert_eq!(json, "\"UL2016_preVFP\"");
        let alg: Algorithm = serde_json::from_str("\"DeepTau2017v2p1VSe\"").unwrap();
        assert_eq!(alg, Algorithm::DeepTau2017v2p1VsE);
    }

    #[test]
    fn only_ultra_legacy_eras_have_labels() {
        assert_eq!(Era::Ul2016PostVfp.label(), Some("2016_postVFP"));
        assert!(!Era::ReReco2018.is_ultra_legacy());
    }

    #[test]
    fn genmatch_codes() {
        assert_eq!(GenMatch::try_from(5).unwrap(), GenMatch::HadronicTau);
        assert_eq!(GenMatch::TauToMuon.code(), 4);
        assert!(GenMatch::try_from(7).is_err());
    }
}
