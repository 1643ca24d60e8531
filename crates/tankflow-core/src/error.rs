//! Error types for tank construction and simulation runs.

/// A tank was given a value it cannot simulate with.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum TankError {
    #[error("flow rate must be positive and finite, got {0}")]
    InvalidFlowRate(f64),
    #[error("capacity must be non-negative and finite, got {0}")]
    InvalidCapacity(f64),
    #[error("flow increase must be positive and finite, got {0}")]
    InvalidFlowIncrease(f64),
    #[error("stored fill time {0} does not match remaining capacity and flow rate")]
    StaleFillTime(f64),
}

/// Errors that abort a simulation run.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum SimError {
    #[error("no tanks to simulate")]
    NoTanks,
    #[error("tank {ordinal}: {source}")]
    InvalidTank {
        ordinal: usize,
        #[source]
        source: TankError,
    },
    #[error("all tanks are full but the last overflow time was never reached")]
    LastOverflowNotReached,
    #[error("simulation has not finished ({active} tanks still filling)")]
    NotFinished { active: usize },
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::error::Error;

    #[test]
    fn invalid_tank_exposes_source() {
        let err = SimError::InvalidTank {
            ordinal: 3,
            source: TankError::InvalidFlowRate(0.0),
        };
        assert_eq!(
            err.to_string(),
            "tank 3: flow rate must be positive and finite, got 0"
        );
        let source = err.source().unwrap();
        assert_eq!(
            source.to_string(),
            "flow rate must be positive and finite, got 0"
        );
    }

    #[test]
    fn not_finished_reports_active_count() {
        let err = SimError::NotFinished { active: 2 };
        assert!(err.to_string().contains("2 tanks"));
    }
}
