//! Events emitted while the engine processes a discrete step.
//!
//! Events describe what happened during one step in the order it happened
//! during the walk over active tanks. They are returned from
//! [`Engine::step`](crate::engine::Engine::step) and carry input ordinals
//! rather than internal ids so callers can relate them to their input.

use serde::{Deserialize, Serialize};

/// Something that happened to a tank during a step.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum TankEvent {
    /// A tank reached full and left the active set.
    Filled {
        ordinal: usize,
        clock: f64,
        /// Flow rate the tank had when it filled; this flow is released.
        released_flow: f64,
        /// Whether no active tank followed it during this step's walk.
        last_in_order: bool,
    },
    /// Flow released by preceding full tanks moved onto a still-filling tank.
    FlowRedistributed {
        to_ordinal: usize,
        clock: f64,
        delta: f64,
        new_flow_rate: f64,
    },
    /// Flow released by full tanks at the end of the order, with no
    /// still-filling tank after them to receive it.
    FlowDiscarded { clock: f64, flow: f64 },
}

impl TankEvent {
    /// Clock value at which the event happened.
    pub fn clock(&self) -> f64 {
        match self {
            TankEvent::Filled { clock, .. }
            | TankEvent::FlowRedistributed { clock, .. }
            | TankEvent::FlowDiscarded { clock, .. } => *clock,
        }
    }
}
