use proptest::prelude::*;
use tauid_core::{Bin, BinnedCorrection, Curve, Segment};

fn eta_table() -> BinnedCorrection {
    BinnedCorrection::new(
        vec![0.0, 1.46, 1.558, 2.3],
        vec![Bin::new(1.09, 0.01), Bin::new(1.0, 0.0), Bin::new(1.19, 0.01)],
    )
    .unwrap()
}

proptest! {
    #[test]
    fn in_range_lookup_matches_containing_bin(x in 0.0f64..2.3) {
        let table = eta_table();
        let edges = table.edges();
        let idx = (0..table.bins().len())
            .find(|&i| edges[i] <= x && x < edges[i + 1])
            .unwrap();
        prop_assert_eq!(table.locate(x), &table.bins()[idx]);
    }

    #[test]
    fn out_of_range_lookup_holds_edge_bins(x in 2.3f64..1e6) {
        let table = eta_table();
        prop_assert_eq!(table.locate(x).value, 1.19);
        prop_assert_eq!(table.locate(-x).value, 1.09);
    }

    #[test]
    fn curve_evaluation_is_deterministic(x in -1e3f64..1e4) {
        let curve = Curve::new(vec![
            Segment::constant(20.0, 25.0, 0.87),
            Segment::linear(25.0, 100.0, 0.85, 0.0002),
            Segment::constant(100.0, 2000.0, 0.87),
        ]).unwrap();
        prop_assert_eq!(curve.eval(x).to_bits(), curve.eval(x).to_bits());
    }
}
