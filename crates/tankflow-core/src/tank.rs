//! A single tank being filled.

use serde::{Deserialize, Serialize};

use crate::error::TankError;

/// Remaining capacity below which a tank counts as full.
///
/// Absorbs drift from repeated subtraction so a tank whose true remaining
/// capacity is zero is detected as full.
pub const TOLERANCE: f64 = 1e-6;

// ---------------------------------------------------------------------------
// Input record
// ---------------------------------------------------------------------------

/// Initial state of one tank, as supplied by the caller.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TankSpec {
    /// Volume to fill.
    pub capacity: f64,
    /// Volume per unit time flowing in at the start of the run.
    pub flow_rate: f64,
}

impl TankSpec {
    pub fn new(capacity: f64, flow_rate: f64) -> Self {
        Self {
            capacity,
            flow_rate,
        }
    }
}

// ---------------------------------------------------------------------------
// Tank
// ---------------------------------------------------------------------------

/// A tank that is still filling.
///
/// `fill_time` is derived from the other two fields and recomputed on every
/// mutation, so it is never stale.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Tank {
    ordinal: usize,
    remaining_capacity: f64,
    flow_rate: f64,
    fill_time: f64,
}

impl Tank {
    /// Create a tank. Fails on a non-positive or non-finite flow rate and on
    /// a negative or non-finite capacity.
    pub fn new(ordinal: usize, capacity: f64, flow_rate: f64) -> Result<Self, TankError> {
        if !flow_rate.is_finite() || flow_rate <= 0.0 {
            return Err(TankError::InvalidFlowRate(flow_rate));
        }
        if !capacity.is_finite() || capacity < 0.0 {
            return Err(TankError::InvalidCapacity(capacity));
        }
        let mut tank = Self {
            ordinal,
            remaining_capacity: capacity,
            flow_rate,
            fill_time: 0.0,
        };
        tank.recompute_fill_time();
        Ok(tank)
    }

    /// Create a tank from its input record.
    pub fn from_spec(ordinal: usize, spec: TankSpec) -> Result<Self, TankError> {
        Self::new(ordinal, spec.capacity, spec.flow_rate)
    }

    /// Position of this tank in the input sequence.
    pub fn ordinal(&self) -> usize {
        self.ordinal
    }

    pub fn remaining_capacity(&self) -> f64 {
        self.remaining_capacity
    }

    pub fn flow_rate(&self) -> f64 {
        self.flow_rate
    }

    /// Time until this tank is full at its current flow rate.
    pub fn fill_time(&self) -> f64 {
        self.fill_time
    }

    pub fn is_full(&self) -> bool {
        self.remaining_capacity < TOLERANCE
    }

    /// Pour `elapsed` time worth of flow into the tank.
    ///
    /// Returns `true` if the tank is full afterwards.
    pub fn advance(&mut self, elapsed: f64) -> bool {
        self.remaining_capacity -= self.flow_rate * elapsed;
        self.recompute_fill_time();
        self.is_full()
    }

    /// Add flow released by a tank that just became full.
    pub fn increase_flow_rate(&mut self, delta: f64) -> Result<(), TankError> {
        if !delta.is_finite() || delta <= 0.0 {
            return Err(TankError::InvalidFlowIncrease(delta));
        }
        self.flow_rate += delta;
        self.recompute_fill_time();
        Ok(())
    }

    /// Re-check a tank that did not come through [`Tank::new`], such as one
    /// decoded from a snapshot.
    pub(crate) fn revalidate(&self) -> Result<(), TankError> {
        let rebuilt = Self::new(self.ordinal, self.remaining_capacity, self.flow_rate)?;
        if rebuilt.fill_time.to_bits() != self.fill_time.to_bits() {
            return Err(TankError::StaleFillTime(self.fill_time));
        }
        Ok(())
    }

    fn recompute_fill_time(&mut self) {
        self.fill_time = self.remaining_capacity / self.flow_rate;
    }
}
