//! Property-based tests for the Tankflow engine.
//!
//! Uses proptest to generate random tank sets with integer capacities and
//! flow rates, as the plain input format produces, then checks invariants
//! over whole runs.

use proptest::prelude::*;
use tankflow_core::engine::Engine;
use tankflow_core::rounding::{ceil5, report_time};
use tankflow_core::tank::TankSpec;
use tankflow_core::test_utils::*;

/// Fractional digits in the shortest decimal form of `t`.
fn fraction_digits(t: f64) -> usize {
    t.to_string()
        .split_once('.')
        .map_or(0, |(_, fraction)| fraction.len())
}

// ===========================================================================
// Generators
// ===========================================================================

/// Up to `max_tanks` tanks sharing one flow rate.
fn arb_uniform(max_tanks: usize) -> impl Strategy<Value = (f64, Vec<f64>)> {
    (
        1..=20u32,
        proptest::collection::vec(1..=1_000u32, 1..=max_tanks),
    )
        .prop_map(|(flow, caps)| {
            (
                f64::from(flow),
                caps.into_iter().map(f64::from).collect(),
            )
        })
}

/// Up to `max_tanks` tanks, each with its own flow rate.
fn arb_mixed(max_tanks: usize) -> impl Strategy<Value = Vec<TankSpec>> {
    proptest::collection::vec(
        (1..=1_000u32, 1..=20u32)
            .prop_map(|(c, f)| TankSpec::new(f64::from(c), f64::from(f))),
        1..=max_tanks,
    )
}

// ===========================================================================
// Properties
// ===========================================================================

proptest! {
    #![proptest_config(ProptestConfig::with_cases(200))]

    /// A lone tank overflows at C/F, and both reported times agree.
    #[test]
    fn single_tank_reports_fill_time(capacity in 1..=100_000u32, flow in 1..=1_000u32) {
        let (c, f) = (f64::from(capacity), f64::from(flow));
        let times = run_uniform(f, &[c]);
        let expected = report_time(c / f);
        prop_assert_eq!(times.last, expected);
        prop_assert_eq!(times.all, expected);
    }

    /// Every step retires at least one tank, so N tanks take at most N steps.
    #[test]
    fn terminates_within_tank_count((flow, caps) in arb_uniform(60)) {
        let mut engine = Engine::uniform(flow, &caps).unwrap();
        let mut previous = engine.active_count();
        while let Some(outcome) = engine.step().unwrap() {
            prop_assert!(!outcome.filled.is_empty());
            prop_assert!(engine.active_count() < previous);
            previous = engine.active_count();
        }
        prop_assert!(engine.steps() as usize <= caps.len());
    }

    /// Flow is only ever moved between tanks or released past the last one.
    #[test]
    fn flow_is_conserved(specs in arb_mixed(40)) {
        let mut engine = Engine::new(specs).unwrap();
        let initial = engine.initial_flow_rate();
        while engine.step().unwrap().is_some() {
            let accounted = engine.active_flow_rate() + engine.discarded_flow();
            prop_assert!((accounted - initial).abs() < 1e-9 * initial.max(1.0));
        }
    }

    /// The clock never runs backwards and the last overflow never trails
    /// the moment all tanks are full.
    #[test]
    fn clock_is_monotonic(specs in arb_mixed(40)) {
        let mut engine = Engine::new(specs).unwrap();
        let mut clock = engine.clock();
        while let Some(outcome) = engine.step().unwrap() {
            prop_assert!(outcome.elapsed >= 0.0);
            prop_assert!(outcome.clock >= clock);
            clock = outcome.clock;
        }
        let report = engine.report().unwrap();
        prop_assert!(report.last_overflow_time <= report.all_overflow_time);
        let times = report.overflow_times();
        prop_assert!(times.last <= times.all);
    }

    /// Flow only moves forward in order: an active tank's rate never drops.
    #[test]
    fn flow_rates_never_decrease((flow, caps) in arb_uniform(40)) {
        let mut engine = Engine::uniform(flow, &caps).unwrap();
        let mut before: Vec<(usize, f64)> = engine
            .active_tanks()
            .map(|t| (t.ordinal(), t.flow_rate()))
            .collect();
        while engine.step().unwrap().is_some() {
            for tank in engine.active_tanks() {
                let (_, old) = before.iter().find(|(o, _)| *o == tank.ordinal()).unwrap();
                prop_assert!(tank.flow_rate() >= *old);
            }
            before = engine.active_tanks().map(|t| (t.ordinal(), t.flow_rate())).collect();
        }
    }

    /// Rounding twice is the same as rounding once.
    #[test]
    fn rounding_is_idempotent(t in 0.0..1_000_000.0f64) {
        let once = ceil5(t);
        prop_assert_eq!(ceil5(once), once);
        prop_assert_eq!(report_time(once), report_time(t));
    }

    /// `ceil5(t)` is the least five-decimal value not below `t`.
    #[test]
    fn rounding_is_least_five_decimal_upper_bound(t in 0.0..1_000_000.0f64) {
        let rounded = ceil5(t);
        prop_assert!(rounded >= t);
        prop_assert!(fraction_digits(rounded) <= 5, "{} has too many digits", rounded);
        // One step down the five-decimal grid is already below t.
        let units = (rounded * 100_000.0).round();
        prop_assert!((units - 1.0) / 100_000.0 < t);
    }

    /// Anything strictly above a grid point rounds past it.
    #[test]
    fn one_ulp_above_grid_point_rounds_up(units in 0u64..1_000_000_000_000u64) {
        let grid = units as f64 / 100_000.0;
        let above = f64::from_bits(grid.to_bits() + 1);
        prop_assert!(ceil5(above) > grid);
        prop_assert_eq!(ceil5(grid), grid);
    }

    /// A run resumed from a mid-run snapshot ends exactly where the original does.
    #[test]
    fn snapshot_resume_matches((flow, caps) in arb_uniform(30), split in 0..10usize) {
        let mut original = Engine::uniform(flow, &caps).unwrap();
        for _ in 0..split {
            if original.step().unwrap().is_none() {
                break;
            }
        }
        let mut resumed = Engine::deserialize(&original.serialize().unwrap()).unwrap();
        prop_assert_eq!(original.run().unwrap(), resumed.run().unwrap());
    }
}

/// Sanity check that the helpers agree with a direct engine run.
#[test]
fn chain_helper_runs() {
    let mut engine = build_chain(25, 2.0);
    let report = engine.run().unwrap();
    assert!(report.steps <= 25);
    assert!(engine.is_finished());
    assert_eq!(active_ordinals(&engine), Vec::<usize>::new());
}
