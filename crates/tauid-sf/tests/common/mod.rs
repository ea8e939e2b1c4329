#![allow(dead_code)]

use tauid_core::{
    ArtifactFile, Bin, BinnedCorrection, Curve, GraphCorrection, GraphPoint, MemoryStore,
    NumericObject, Segment,
};

pub const PT_LEGACY: &str = "TauID_SF_pt_DeepTau2017v2p1VSjet_2018ReReco";
pub const PT_LEGACY_EMB: &str = "TauID_SF_pt_DeepTau2017v2p1VSjet_2018ReReco_EMB";
pub const DM_LEGACY: &str = "TauID_SF_dm_DeepTau2017v2p1VSjet_2018ReReco";
pub const DM_MVA: &str = "TauID_SF_dm_MVAoldDM2017v2_2018ReReco";
pub const ETA_VSE: &str = "TauID_SF_eta_DeepTau2017v2p1VSe_2018ReReco";
pub const ETA_VSMU: &str = "TauID_SF_eta_DeepTau2017v2p1VSmu_2018ReReco";
pub const FITTED: &str = "TauID_SF_dm_DeepTau2017v2p1VSjet_VSjetMedium_VSeleVVLoose_Mar07";
pub const HIGH_PT: &str = "TauID_SF_Highpt_DeepTau2017v2p1VSjet_VSjetMedium_VSeleVVLoose_Mar07";
pub const TES_LEGACY: &str = "TauES_dm_DeepTau2017v2p1VSjet_2018ReReco";
pub const TES_LEGACY_HIGH: &str = "TauES_dm_DeepTau2017v2p1VSjet_2018ReReco_ptgt100";
pub const TES_UL: &str = "TauES_dm_DeepTau2017v2p1VSjet_UL2018";
pub const FES: &str = "TauFES_eta-dm_DeepTau2017v2p1VSe_2018ReReco";

/// Per-decay-mode `(value, error)` used by the decay-mode fixture table.
pub const DM_BINS: [(i32, f64, f64); 4] = [
    (0, 0.93, 0.04),
    (1, 0.95, 0.03),
    (10, 0.87, 0.05),
    (11, 0.78, 0.08),
];

/// Low- and high-momentum energy-scale `(dm, low value, low error, high value, high error)`.
pub const TES_BINS: [(i32, f64, f64, f64, f64); 4] = [
    (0, 0.984, 0.009, 0.970, 0.027),
    (1, 0.996, 0.006, 0.978, 0.017),
    (10, 0.988, 0.007, 0.992, 0.025),
    (11, 0.999, 0.011, 1.000, 0.030),
];

/// Fitted nominal `a + b * pt` per bucket.
pub const FIT_NOMINAL: [(&str, f64, f64); 4] = [
    ("DM0", 0.95, -0.0005),
    ("DM1", 0.90, 0.0004),
    ("DM10", 0.85, 0.0002),
    ("DM11", 0.75, 0.0010),
];

pub fn curve(value: f64) -> NumericObject {
    NumericObject::Curve(Curve::constant(value))
}

pub fn stepped(below_50: f64, above_50: f64) -> NumericObject {
    NumericObject::Curve(
        Curve::new(vec![
            Segment::constant(20.0, 50.0, below_50),
            Segment::constant(50.0, f64::INFINITY, above_50),
        ])
        .unwrap(),
    )
}

pub fn line(a: f64, b: f64) -> NumericObject {
    NumericObject::Curve(
        Curve::new(vec![Segment::linear(f64::NEG_INFINITY, f64::INFINITY, a, b)]).unwrap(),
    )
}

pub fn per_decay_mode(
    entries: impl IntoIterator<Item = (i32, f64, f64)>,
    modes: usize,
) -> NumericObject {
    let mut bins = vec![Bin::new(0.0, 0.0); modes];
    for (dm, value, error) in entries {
        bins[dm as usize] = Bin::new(value, error);
    }
    NumericObject::Binned(BinnedCorrection::uniform(0.0, modes as f64, bins).unwrap())
}

pub fn binned(edges: Vec<f64>, bins: Vec<(f64, f64)>) -> NumericObject {
    let bins = bins.into_iter().map(|(v, e)| Bin::new(v, e)).collect();
    NumericObject::Binned(BinnedCorrection::new(edges, bins).unwrap())
}

pub fn graph(points: Vec<GraphPoint>) -> NumericObject {
    NumericObject::Graph(GraphCorrection::new(points).unwrap())
}

/// Fitted curves for every bucket: a nominal line per bucket and each
/// variation shifted by a fixed offset.
pub fn fitted_artifact(label: &str, nominal: &[(&str, f64, f64)]) -> ArtifactFile {
    let mut file = ArtifactFile::new();
    for &(dm, a, b) in nominal {
        let variations: [(String, f64); 10] = [
            (format!("{dm}_{label}_fit_uncert0_up"), 0.02),
            (format!("{dm}_{label}_fit_uncert0_down"), -0.02),
            (format!("{dm}_{label}_fit_uncert1_up"), 0.01),
            (format!("{dm}_{label}_fit_uncert1_down"), -0.01),
            (format!("{dm}_{label}_syst_alleras_up_fit"), 0.03),
            (format!("{dm}_{label}_syst_alleras_down_fit"), -0.03),
            (format!("{dm}_{label}_syst_alldms_{label}_up_fit"), 0.02),
            (format!("{dm}_{label}_syst_alldms_{label}_down_fit"), -0.02),
            (format!("{dm}_{label}_TESUp_fit"), 0.01),
            (format!("{dm}_{label}_TESDown_fit"), -0.015),
        ];
        file = file.with_object(format!("{dm}_{label}_fit"), line(a, b));
        for (name, shift) in variations {
            file = file.with_object(name, line(a + shift, b));
        }
    }
    file
}

fn high_pt_artifact(label: &str) -> ArtifactFile {
    ArtifactFile::new()
        .with_object(
            format!("DMinclusive_{label}"),
            graph(vec![
                GraphPoint::new(145.0, 25.0, 0.91, 0.08, 0.09),
                GraphPoint::new(250.0, 50.0, 0.86, 0.12, 0.14),
            ]),
        )
        .with_object(
            format!("DMinclusive_{label}_syst_alleras"),
            graph(vec![
                GraphPoint::new(145.0, 25.0, 0.91, 0.03, 0.03),
                GraphPoint::new(250.0, 50.0, 0.86, 0.05, 0.05),
            ]),
        )
        .with_object(
            format!("DMinclusive_{label}_syst_{label}"),
            graph(vec![
                GraphPoint::new(145.0, 25.0, 0.91, 0.02, 0.02),
                GraphPoint::new(250.0, 50.0, 0.86, 0.04, 0.04),
            ]),
        )
}

pub fn fes_points() -> Vec<GraphPoint> {
    vec![
        GraphPoint::new(0.0, 0.5, 1.01362, 0.00474, 0.00664).labelled("barrel_dm0"),
        GraphPoint::new(1.0, 0.5, 1.01945, 0.00696, 0.00683).labelled("barrel_dm1"),
        GraphPoint::new(2.0, 0.5, 0.96903, 0.01345, 0.01374).labelled("endcap_dm0"),
        GraphPoint::new(3.0, 0.5, 1.02000, 0.06000, 0.05000).labelled("endcap_dm1"),
    ]
}

/// Store holding one artifact of every scheme.
pub fn store() -> MemoryStore {
    MemoryStore::new()
        .with_artifact(
            PT_LEGACY,
            ArtifactFile::new()
                .with_object("Medium_cent", stepped(0.90, 0.95))
                .with_object("Medium_up", stepped(0.95, 1.00))
                .with_object("Medium_down", stepped(0.85, 0.90)),
        )
        .with_artifact(
            PT_LEGACY_EMB,
            ArtifactFile::new()
                .with_object("Medium_cent", curve(0.97))
                .with_object("Medium_up", curve(1.02))
                .with_object("Medium_down", curve(0.92)),
        )
        .with_artifact(
            DM_LEGACY,
            ArtifactFile::new().with_object("Medium", per_decay_mode(DM_BINS, 12)),
        )
        .with_artifact(
            DM_MVA,
            ArtifactFile::new().with_object(
                "Tight",
                per_decay_mode(
                    [(0, 0.90, 0.05), (1, 0.88, 0.05), (10, 0.86, 0.05), (11, 0.60, 0.05)],
                    12,
                ),
            ),
        )
        .with_artifact(
            ETA_VSE,
            ArtifactFile::new().with_object(
                "VLoose",
                binned(
                    vec![0.0, 1.46, 1.558, 2.3],
                    vec![(1.09, 0.07), (1.0, 0.0), (1.19, 0.09)],
                ),
            ),
        )
        .with_artifact(
            ETA_VSMU,
            ArtifactFile::new().with_object(
                "Tight",
                binned(
                    vec![0.0, 0.4, 0.8, 1.2, 1.7, 2.3],
                    vec![(1.17, 0.12), (1.29, 0.32), (1.14, 0.05), (0.30, 0.50), (2.39, 0.40)],
                ),
            ),
        )
        .with_artifact(FITTED, fitted_artifact("2018", &FIT_NOMINAL))
        .with_artifact(HIGH_PT, high_pt_artifact("2018"))
        .with_artifact(
            TES_LEGACY,
            ArtifactFile::new().with_object(
                "tes",
                per_decay_mode(TES_BINS.map(|(dm, v, e, _, _)| (dm, v, e)), 13),
            ),
        )
        .with_artifact(
            TES_LEGACY_HIGH,
            ArtifactFile::new().with_object(
                "tes",
                per_decay_mode(TES_BINS.map(|(dm, _, _, v, e)| (dm, v, e)), 13),
            ),
        )
        .with_artifact(
            TES_UL,
            ArtifactFile::new().with_object(
                "tes",
                per_decay_mode(TES_BINS.map(|(dm, v, e, _, _)| (dm, v, e)), 13),
            ),
        )
        .with_artifact(
            FES,
            ArtifactFile::new().with_object("fes", graph(fes_points())),
        )
}

pub fn close(a: f64, b: f64) -> bool {
    (a - b).abs() < 1e-9
}
