//! Tankflow Core -- discrete-event simulation of tanks filled from a shared,
//! redistributing flow source.
//!
//! Every tank starts with a capacity and a flow rate. The engine repeatedly
//! jumps the clock forward to the next moment a tank becomes full, then hands
//! the flow released by that tank to the next still-filling tank in input
//! order. A run reports two times: when the last tank (in iteration order)
//! of some step overflows, and when every tank is full.
//!
//! # Event Loop
//!
//! Each call to [`engine::Engine::step`] processes exactly one discrete event:
//!
//! 1. **Select** -- Find the smallest fill time among active tanks.
//! 2. **Advance** -- Move the clock and drain that much time into every tank.
//! 3. **Redistribute** -- Walk tanks in order; flow from full tanks moves to
//!    the next tank that is still filling.
//! 4. **Retire** -- Full tanks leave the active set.
//!
//! ```rust,ignore
//! let mut engine = Engine::uniform(1.0, &[2.0, 4.0, 8.0])?;
//! let report = engine.run()?;
//! assert_eq!(report.overflow_times().to_string(), "4 4");
//! ```
//!
//! # Key Types
//!
//! - [`engine::Engine`] -- Owns the clock and the active set; drives tanks.
//! - [`tank::Tank`] -- Remaining capacity, flow rate, and derived fill time.
//! - [`active::ActiveTanks`] -- Ordered removable container with a cursor.
//! - [`report::RunReport`] -- Raw times plus the rounded integer output.
//! - [`rounding`] -- Ceiling at five decimals, then floor.
//! - [`snapshot`] -- Versioned binary snapshots of an in-progress engine.

pub mod active;
pub mod engine;
pub mod error;
pub mod event;
pub mod id;
pub mod report;
pub mod rounding;
pub mod snapshot;
pub mod tank;

#[cfg(any(test, feature = "test-utils"))]
pub mod test_utils;

pub use engine::Engine;
pub use error::{SimError, TankError};
pub use report::{OverflowTimes, RunReport};
pub use tank::{Tank, TankSpec, TOLERANCE};
