use tauid_core::{
    ArtifactFile, ArtifactProvenance, Bin, BinnedCorrection, Curve, GraphCorrection, GraphPoint,
    NumericObject, Segment,
};

#[test]
fn artifact_round_trip_json() {
    let provenance = ArtifactProvenance {
        source: "Z->tautau template fit".into(),
        created_at: "2021-03-07T00:00:00Z".into(),
        notes: [("reference".into(), "TauIDRecommendation13TeV".into())]
            .into_iter()
            .collect(),
    };
    let mut file = ArtifactFile::new()
        .with_object(
            "tes",
            NumericObject::Binned(
                BinnedCorrection::uniform(0.0, 13.0, vec![Bin::new(1.0, 0.0); 13]).unwrap(),
            ),
        )
        .with_object(
            "Tight_cent",
            NumericObject::Curve(
                Curve::new(vec![
                    Segment::constant(20.0, 25.0, 0.87),
                    Segment::linear(25.0, 500.0, 0.85, 0.0001),
                ])
                .unwrap(),
            ),
        )
        .with_object(
            "fes",
            NumericObject::Graph(
                GraphCorrection::new(vec![
                    GraphPoint::new(0.5, 0.0, 1.00679, 0.00982, 0.00806).labelled("barrel_dm0"),
                    GraphPoint::new(1.5, 0.0, 1.03389, 0.02475, 0.01168).labelled("barrel_dm1"),
                ])
                .unwrap(),
            ),
        );
    file.provenance = provenance.clone();

    let json = serde_json::to_string_pretty(&file).expect("serialize");
    let decoded: ArtifactFile = serde_json::from_str(&json).expect("deserialize");

    assert_eq!(decoded, file);
    assert_eq!(decoded.provenance, provenance);
}

#[test]
fn invalid_objects_are_rejected_on_load() {
    let doc = r#"{"objects":{"Loose":{"kind":"binned","edges":[0.0,1.0,0.5],
        "bins":[{"value":1.0},{"value":1.0}]}}}"#;
    assert!(serde_json::from_str::<ArtifactFile>(doc).is_err());

    let doc =
        r#"{"objects":{"fes":{"kind":"graph","points":[{"x":0.5,"y":1.0,"y_err_low":-0.1}]}}}"#;
    assert!(serde_json::from_str::<ArtifactFile>(doc).is_err());
}
