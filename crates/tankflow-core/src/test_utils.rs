//! Shared test helpers for unit tests, integration tests, and benchmarks.
//!
//! Gated behind `#[cfg(any(test, feature = "test-utils"))]`.

use crate::engine::Engine;
use crate::report::OverflowTimes;
use crate::tank::{Tank, TankSpec};

/// Tolerance used by [`assert_approx`].
pub const APPROX_EPSILON: f64 = 1e-9;

/// Specs where every tank shares one flow rate.
pub fn uniform_specs(flow_rate: f64, capacities: &[f64]) -> Vec<TankSpec> {
    capacities
        .iter()
        .map(|&capacity| TankSpec::new(capacity, flow_rate))
        .collect()
}

/// Run a uniform scenario to completion and return the reported integers.
pub fn run_uniform(flow_rate: f64, capacities: &[f64]) -> OverflowTimes {
    Engine::uniform(flow_rate, capacities)
        .and_then(|mut engine| engine.run())
        .expect("uniform scenario should run")
        .overflow_times()
}

/// Flow rates of active tanks, in order.
pub fn flow_rates(engine: &Engine) -> Vec<f64> {
    engine.active_tanks().map(Tank::flow_rate).collect()
}

/// Ordinals of active tanks, in order.
pub fn active_ordinals(engine: &Engine) -> Vec<usize> {
    engine.active_tanks().map(Tank::ordinal).collect()
}

/// Assert two times agree to within [`APPROX_EPSILON`], relative to their size.
#[track_caller]
pub fn assert_approx(actual: f64, expected: f64) {
    let scale = expected.abs().max(1.0);
    assert!(
        (actual - expected).abs() <= APPROX_EPSILON * scale,
        "expected {expected}, got {actual}"
    );
}

/// A chain of `count` tanks with capacities cycling through a few sizes.
pub fn build_chain(count: usize, flow_rate: f64) -> Engine {
    let capacities: Vec<f64> = (0..count).map(|i| ((i * 7) % 13 + 1) as f64).collect();
    Engine::uniform(flow_rate, &capacities).expect("chain should build")
}
