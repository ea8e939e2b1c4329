mod common;

use common::{close, store};
use tauid_core::{
    Algorithm, Direction, Era, ErrorKind, Estimate, GenMatch, TauIdError, Triple, Uncertainty,
    WorkingPoint,
};
use tauid_sf::{Component, Scheme, SfOptions, Source, TauIdSf, Variation};

fn value(estimate: Estimate) -> f64 {
    estimate.value().expect("single value")
}

fn triple(estimate: Estimate) -> Triple {
    estimate.triple().expect("triple")
}

fn legacy(options: SfOptions) -> Result<TauIdSf, TauIdError> {
    TauIdSf::new(
        &store(),
        Era::ReReco2018,
        Algorithm::DeepTau2017v2p1VsJet,
        WorkingPoint::Medium,
        &options,
    )
}

fn ultra_legacy(options: SfOptions) -> Result<TauIdSf, TauIdError> {
    TauIdSf::new(
        &store(),
        Era::Ul2018,
        Algorithm::DeepTau2017v2p1VsJet,
        WorkingPoint::Medium,
        &options,
    )
}

#[test]
fn momentum_curves_select_variation() -> Result<(), TauIdError> {
    let sf = legacy(SfOptions::default())?;
    assert_eq!(sf.scheme(), Scheme::PointsByMomentum);
    let hadronic = GenMatch::HadronicTau;
    assert_eq!(value(sf.evaluate_by_momentum(30.0, hadronic, Uncertainty::Nominal)?), 0.90);
    assert_eq!(value(sf.evaluate_by_momentum(60.0, hadronic, Uncertainty::Nominal)?), 0.95);
    assert_eq!(value(sf.evaluate_by_momentum(30.0, hadronic, Uncertainty::Up)?), 0.95);
    assert_eq!(
        triple(sf.evaluate_by_momentum(30.0, hadronic, Uncertainty::All)?),
        Triple::new(0.85, 0.90, 0.95)
    );
    assert_eq!(
        sf.evaluate_by_momentum(30.0, GenMatch::Jet, Uncertainty::All)?,
        Estimate::Triple(Triple::unit())
    );
    Ok(())
}

#[test]
fn momentum_mismatch_systematic_adds_in_quadrature() -> Result<(), TauIdError> {
    let sf = legacy(SfOptions::default().other_lepton_wp())?;
    let low = triple(sf.evaluate_by_momentum(30.0, GenMatch::HadronicTau, Uncertainty::All)?);
    let expected = (0.05_f64.powi(2) + (0.90_f64 * 0.03).powi(2)).sqrt();
    assert!(close(low.up - low.central, expected));
    assert!(close(low.central - low.down, expected));

    let high = triple(sf.evaluate_by_momentum(150.0, GenMatch::HadronicTau, Uncertainty::All)?);
    let expected = (0.05_f64.powi(2) + (0.95_f64 * 0.15).powi(2)).sqrt();
    assert!(close(high.up - high.central, expected));
    Ok(())
}

#[test]
fn embedded_artifact_is_used() -> Result<(), TauIdError> {
    let sf = legacy(SfOptions::default().embedded())?;
    assert_eq!(
        sf.provenance()[0].identity,
        "TauID_SF_pt_DeepTau2017v2p1VSjet_2018ReReco_EMB"
    );
    assert_eq!(
        value(sf.evaluate_by_momentum(80.0, GenMatch::HadronicTau, Uncertainty::Nominal)?),
        0.97
    );
    Ok(())
}

#[test]
fn decay_mode_threshold_is_strict_at_forty() -> Result<(), TauIdError> {
    let sf = legacy(SfOptions::by_decay_mode())?;
    let hadronic = GenMatch::HadronicTau;
    assert_eq!(value(sf.evaluate_by_decay_mode(40.0, 0, hadronic, Uncertainty::Nominal)?), 0.0);
    assert_eq!(value(sf.evaluate_by_decay_mode(40.01, 0, hadronic, Uncertainty::Nominal)?), 0.93);
    assert_eq!(
        triple(sf.evaluate_by_decay_mode(25.0, 1, hadronic, Uncertainty::All)?),
        Triple::flat(0.0)
    );
    Ok(())
}

#[test]
fn decay_mode_bins_and_gating() -> Result<(), TauIdError> {
    let sf = legacy(SfOptions::by_decay_mode())?;
    let hadronic = GenMatch::HadronicTau;
    let dm10 = triple(sf.evaluate_by_decay_mode(50.0, 10, hadronic, Uncertainty::All)?);
    assert!(close(dm10.down, 0.82));
    assert_eq!(dm10.central, 0.87);
    assert!(close(dm10.up, 0.92));
    assert_eq!(value(sf.evaluate_by_decay_mode(50.0, 5, hadronic, Uncertainty::Nominal)?), 1.0);
    // Origin gating comes before the momentum threshold.
    assert_eq!(
        value(sf.evaluate_by_decay_mode(30.0, 0, GenMatch::Jet, Uncertainty::Nominal)?),
        1.0
    );
    Ok(())
}

#[test]
fn mva_has_no_decay_mode_eleven() -> Result<(), TauIdError> {
    let sf = TauIdSf::new(
        &store(),
        Era::ReReco2018,
        Algorithm::MvaOldDm2017v2,
        WorkingPoint::Tight,
        &SfOptions::by_decay_mode(),
    )?;
    let hadronic = GenMatch::HadronicTau;
    assert_eq!(value(sf.evaluate_by_decay_mode(50.0, 11, hadronic, Uncertainty::Nominal)?), 1.0);
    assert_eq!(value(sf.evaluate_by_decay_mode(50.0, 10, hadronic, Uncertainty::Nominal)?), 0.86);
    Ok(())
}

#[test]
fn decay_mode_flat_mismatch_systematic() -> Result<(), TauIdError> {
    let sf = legacy(SfOptions::by_decay_mode().other_lepton_wp())?;
    let dm0 = triple(sf.evaluate_by_decay_mode(50.0, 0, GenMatch::HadronicTau, Uncertainty::All)?);
    let expected = (0.04_f64.powi(2) + (0.93_f64 * 0.03).powi(2)).sqrt();
    assert!(close(dm0.up - dm0.central, expected));
    Ok(())
}

#[test]
fn fitted_momentum_is_clamped_to_window() -> Result<(), TauIdError> {
    let sf = ultra_legacy(SfOptions::by_decay_mode_and_momentum(WorkingPoint::VVLoose))?;
    assert_eq!(sf.scheme(), Scheme::FittedByDecayModeAndMomentum);
    let eval = |pt: f64, dm: i32| {
        sf.evaluate_by_decay_mode_and_momentum(pt, dm, GenMatch::HadronicTau, Uncertainty::Nominal)
            .map(value)
    };
    assert_eq!(eval(5.0, 0)?, eval(20.0, 0)?);
    assert_eq!(eval(500.0, 0)?, eval(140.0, 0)?);
    assert!(close(eval(20.0, 0)?, 0.94));
    assert!(close(eval(140.0, 0)?, 0.88));
    assert_eq!(eval(60.0, 2)?, eval(60.0, 1)?);
    assert_eq!(eval(60.0, 5)?, 1.0);
    Ok(())
}

#[test]
fn fitted_all_combines_deviations_by_sign() -> Result<(), TauIdError> {
    let sf = ultra_legacy(SfOptions::by_decay_mode_and_momentum(WorkingPoint::VVLoose))?;
    let all = triple(sf.evaluate_by_decay_mode_and_momentum(
        60.0,
        0,
        GenMatch::HadronicTau,
        Uncertainty::All,
    )?);
    assert!(close(all.central, 0.92));
    assert!(close(all.up - all.central, 0.0019_f64.sqrt()));
    assert!(close(all.central - all.down, 0.045));
    Ok(())
}

#[test]
fn fitted_components_by_name() -> Result<(), TauIdError> {
    let sf = ultra_legacy(SfOptions::by_decay_mode_and_momentum(WorkingPoint::VVLoose))?;
    let Variation::Component(tes_down) = sf.variation(Some("syst_TES_down"))? else {
        panic!("expected a component");
    };
    let shifted = sf.evaluate_component_by_decay_mode_and_momentum(
        60.0,
        10,
        GenMatch::HadronicTau,
        tes_down,
    )?;
    assert!(close(shifted, 0.847));
    let era = Component::new(Source::SystEra, Direction::Up);
    let shifted =
        sf.evaluate_component_by_decay_mode_and_momentum(60.0, 0, GenMatch::HadronicTau, era)?;
    assert!(close(shifted, 0.94));
    assert_eq!(
        sf.evaluate_component_by_decay_mode_and_momentum(60.0, 0, GenMatch::Unmatched, era)?,
        1.0
    );
    let err = sf.variation(Some("syst_2017_up")).unwrap_err();
    assert_eq!(err.kind(), ErrorKind::InvalidConfiguration);
    Ok(())
}

#[test]
fn high_pt_bins_and_components() -> Result<(), TauIdError> {
    let sf = ultra_legacy(SfOptions::high_momentum(WorkingPoint::VVLoose))?;
    assert_eq!(sf.scheme(), Scheme::PointsByMomentumHighPt);
    let hadronic = GenMatch::HadronicTau;
    let first = triple(sf.evaluate_by_momentum(150.0, hadronic, Uncertainty::All)?);
    assert_eq!(first.central, 0.91);
    assert!(close(first.central - first.down, 0.0077_f64.sqrt()));
    assert!(close(first.up - first.central, 0.0094_f64.sqrt()));
    assert_eq!(value(sf.evaluate_by_momentum(500.0, hadronic, Uncertainty::Nominal)?), 0.86);
    assert_eq!(value(sf.evaluate_by_momentum(50.0, hadronic, Uncertainty::Nominal)?), 0.91);
    assert_eq!(value(sf.evaluate_by_momentum(185.0, hadronic, Uncertainty::Nominal)?), 0.86);

    let stat1 = Component::new(Source::StatBin(1), Direction::Up);
    let stat2 = Component::new(Source::StatBin(2), Direction::Up);
    assert!(close(sf.evaluate_component_by_momentum(150.0, hadronic, stat1)?, 1.00));
    assert_eq!(sf.evaluate_component_by_momentum(150.0, hadronic, stat2)?, 0.91);
    assert!(close(sf.evaluate_component_by_momentum(250.0, hadronic, stat2)?, 1.00));
    let Variation::Component(era_down) = sf.variation(Some("syst_2018_down"))? else {
        panic!("expected a component");
    };
    assert!(close(sf.evaluate_component_by_momentum(250.0, hadronic, era_down)?, 0.82));

    let fitted_only = Component::new(Source::Uncert0, Direction::Up);
    let err = sf
        .evaluate_component_by_momentum(150.0, hadronic, fitted_only)
        .unwrap_err();
    assert_eq!(err.kind(), ErrorKind::InvalidConfiguration);
    Ok(())
}

#[test]
fn high_pt_stat_bins_beyond_the_graph_are_unknown() -> Result<(), TauIdError> {
    let sf = ultra_legacy(SfOptions::high_momentum(WorkingPoint::VVLoose))?;
    let Variation::Component(missing) = sf.variation(Some("stat_bin9_up"))? else {
        panic!("expected a component");
    };
    for gm in [GenMatch::HadronicTau, GenMatch::Jet] {
        let err = sf.evaluate_component_by_momentum(300.0, gm, missing).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::InvalidConfiguration);
        assert_eq!(err.info().code, "tauid.unknown_component");
    }
    let last = Component::new(Source::StatBin(2), Direction::Down);
    assert!(close(sf.evaluate_component_by_momentum(300.0, GenMatch::HadronicTau, last)?, 0.74));
    let third = Component::new(Source::StatBin(3), Direction::Down);
    assert!(sf
        .evaluate_component_by_momentum(300.0, GenMatch::HadronicTau, third)
        .is_err());
    Ok(())
}

#[test]
fn eta_bins_for_lepton_fakes() -> Result<(), TauIdError> {
    let store = store();
    let vs_e = TauIdSf::new(
        &store,
        Era::ReReco2018,
        Algorithm::DeepTau2017v2p1VsE,
        WorkingPoint::VLoose,
        &SfOptions::default(),
    )?;
    let nominal = Uncertainty::Nominal;
    assert_eq!(value(vs_e.evaluate_by_eta(-1.0, GenMatch::PromptElectron, nominal)?), 1.09);
    assert_eq!(value(vs_e.evaluate_by_eta(2.0, GenMatch::TauToElectron, nominal)?), 1.19);
    assert_eq!(value(vs_e.evaluate_by_eta(3.0, GenMatch::PromptElectron, nominal)?), 1.19);
    assert_eq!(value(vs_e.evaluate_by_eta(1.0, GenMatch::PromptMuon, nominal)?), 1.0);
    assert_eq!(value(vs_e.evaluate_by_eta(1.0, GenMatch::HadronicTau, nominal)?), 1.0);

    let vs_mu = TauIdSf::new(
        &store,
        Era::ReReco2018,
        Algorithm::DeepTau2017v2p1VsMu,
        WorkingPoint::Tight,
        &SfOptions::default(),
    )?;
    assert_eq!(
        value(vs_mu.evaluate_by_eta(1.5, GenMatch::PromptMuon, Uncertainty::Down)?),
        0.0
    );
    let all = triple(vs_mu.evaluate_by_eta(-1.5, GenMatch::TauToMuon, Uncertainty::All)?);
    assert_eq!(all.down, 0.0);
    assert_eq!(all.central, 0.30);
    assert!(close(all.up, 0.80));
    Ok(())
}

#[test]
fn inapplicable_axes_fail() -> Result<(), TauIdError> {
    let momentum = legacy(SfOptions::default())?;
    let err = momentum
        .evaluate_by_eta(1.0, GenMatch::HadronicTau, Uncertainty::Nominal)
        .unwrap_err();
    assert_eq!(err.kind(), ErrorKind::UnsupportedOperation);
    assert_eq!(err.info().context["scheme"], "PointsByMomentum");
    assert!(momentum
        .evaluate_by_decay_mode(50.0, 0, GenMatch::HadronicTau, Uncertainty::Nominal)
        .is_err());
    assert!(momentum
        .evaluate_by_decay_mode_and_momentum(50.0, 0, GenMatch::HadronicTau, Uncertainty::Nominal)
        .is_err());

    let by_dm = legacy(SfOptions::by_decay_mode())?;
    let err = by_dm
        .evaluate_by_momentum(50.0, GenMatch::HadronicTau, Uncertainty::Nominal)
        .unwrap_err();
    assert_eq!(err.kind(), ErrorKind::UnsupportedOperation);
    let stat = Component::new(Source::StatBin(1), Direction::Up);
    let err = by_dm
        .evaluate_component_by_momentum(50.0, GenMatch::HadronicTau, stat)
        .unwrap_err();
    assert_eq!(err.kind(), ErrorKind::UnsupportedOperation);
    Ok(())
}
