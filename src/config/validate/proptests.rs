//! Property-based tests for run specification validation

use super::error::ValidationError;
use super::validator::validate_spec;
use crate::config::schema::RunSpec;
use proptest::prelude::*;

fn arb_valid_spec() -> impl Strategy<Value = RunSpec> {
    (
        2usize..20,   // initial_points
        0.0f64..1e-2, // improvement_threshold
        1usize..10,   // consecutive_trials
        1e-3f64..1.0, // x_range
        1.0f64..2.0,  // ratio_min
        0.0f64..0.5,  // ratio width
    )
        .prop_map(
            |(initial_points, threshold, consecutive, x_range, ratio_min, width)| {
                let mut spec = RunSpec::default();
                spec.design.initial_points = initial_points;
                spec.stopping.improvement_threshold = threshold;
                spec.stopping.consecutive_trials = consecutive;
                spec.stopping.x_range = x_range;
                spec.domain.ratio_min = ratio_min;
                spec.domain.ratio_max = ratio_min + width;
                spec
            },
        )
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(200))]

    #[test]
    fn prop_valid_spec_passes(spec in arb_valid_spec()) {
        prop_assert!(validate_spec(&spec).is_ok());
    }

    #[test]
    fn prop_too_few_points_fails(spec in arb_valid_spec(), n in 0usize..2) {
        let mut spec = spec;
        spec.design.initial_points = n;
        prop_assert_eq!(validate_spec(&spec), Err(ValidationError::TooFewInitialPoints(n)));
    }

    #[test]
    fn prop_negative_threshold_fails(spec in arb_valid_spec(), t in -10.0f64..-1e-9) {
        let mut spec = spec;
        spec.stopping.improvement_threshold = t;
        prop_assert!(matches!(
            validate_spec(&spec),
            Err(ValidationError::InvalidImprovementThreshold(_))
        ));
    }
}
