//! Result of a finished simulation run.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::rounding::report_time;

/// Raw times produced by a finished run.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RunReport {
    /// Clock value when the last tank in order of some step overflowed.
    pub last_overflow_time: f64,
    /// Clock value when every tank was full.
    pub all_overflow_time: f64,
    /// Number of discrete steps processed.
    pub steps: u64,
}

impl RunReport {
    /// The two reported integers, rounded per [`report_time`].
    pub fn overflow_times(&self) -> OverflowTimes {
        OverflowTimes {
            last: report_time(self.last_overflow_time),
            all: report_time(self.all_overflow_time),
        }
    }
}

/// The complete output of a run: two non-negative integers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct OverflowTimes {
    pub last: u64,
    pub all: u64,
}

impl fmt::Display for OverflowTimes {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}", self.last, self.all)
    }
}
