//! Binary snapshots of an in-progress engine.
//!
//! Snapshots are encoded with `bitcode` behind a versioned header, so a run
//! can be paused, stored, and resumed later, or forked to inspect what the
//! next steps would do.

use serde::{Deserialize, Serialize};

use crate::active::ActiveTanks;
use crate::engine::Engine;
use crate::error::TankError;

// ---------------------------------------------------------------------------
// Constants
// ---------------------------------------------------------------------------

/// Magic number identifying a Tankflow engine snapshot.
pub const SNAPSHOT_MAGIC: u32 = 0x7A4C_0001;

/// Current format version. Increment when breaking the wire format.
pub const FORMAT_VERSION: u32 = 1;

// ---------------------------------------------------------------------------
// Error types
// ---------------------------------------------------------------------------

/// Encoding a snapshot failed.
#[derive(Debug, thiserror::Error)]
pub enum SerializeError {
    #[error("could not encode engine snapshot: {0}")]
    Encode(String),
}

/// A snapshot could not be turned back into an engine.
#[derive(Debug, thiserror::Error)]
pub enum DeserializeError {
    #[error("not a tankflow snapshot (magic 0x{0:08X})")]
    InvalidMagic(u32),
    #[error("snapshot format version {0} is not readable by this build (reads version {FORMAT_VERSION})")]
    UnsupportedVersion(u32),
    #[error("could not decode engine snapshot: {0}")]
    Decode(String),
    #[error("snapshot holds an unusable engine state: {0}")]
    InvalidState(#[from] StateError),
}

/// Why a decoded engine state was rejected.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum StateError {
    #[error("tank list refers to a missing entry")]
    DanglingLink,
    #[error("tank list links disagree with each other")]
    BrokenChain,
    #[error("tank list reaches {visited} of {stored} stored tanks")]
    LengthMismatch { visited: usize, stored: usize },
    #[error("tank {ordinal} is out of input order")]
    OutOfOrder { ordinal: usize },
    #[error("tank {ordinal}: {source}")]
    InvalidTank {
        ordinal: usize,
        #[source]
        source: TankError,
    },
    #[error("{field} must be non-negative and finite, got {value}")]
    InvalidQuantity { field: &'static str, value: f64 },
    #[error("active tanks remain but the all-overflow time is already set")]
    FinishedWithActiveTanks,
}

// ---------------------------------------------------------------------------
// Snapshot header
// ---------------------------------------------------------------------------

/// Header prepended to every snapshot.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SnapshotHeader {
    pub magic: u32,
    pub version: u32,
    /// Steps processed when the snapshot was taken.
    pub steps: u64,
}

impl SnapshotHeader {
    pub fn new(steps: u64) -> Self {
        Self {
            magic: SNAPSHOT_MAGIC,
            version: FORMAT_VERSION,
            steps,
        }
    }

    pub fn validate(&self) -> Result<(), DeserializeError> {
        if self.magic != SNAPSHOT_MAGIC {
            return Err(DeserializeError::InvalidMagic(self.magic));
        }
        if self.version != FORMAT_VERSION {
            return Err(DeserializeError::UnsupportedVersion(self.version));
        }
        Ok(())
    }
}

#[derive(Debug, Serialize, Deserialize)]
struct EngineSnapshot {
    header: SnapshotHeader,
    active: ActiveTanks,
    clock: f64,
    steps: u64,
    last_overflow_time: Option<f64>,
    all_overflow_time: Option<f64>,
    initial_flow_rate: f64,
    discarded_flow: f64,
}

/// Read only the header of a snapshot.
///
/// bitcode has no partial decoding, so this decodes the whole payload.
pub fn read_snapshot_header(data: &[u8]) -> Result<SnapshotHeader, DeserializeError> {
    let snapshot: EngineSnapshot =
        bitcode::deserialize(data).map_err(|e| DeserializeError::Decode(e.to_string()))?;
    Ok(snapshot.header)
}

impl EngineSnapshot {
    /// Reject decoded state that `Engine::new` and `Engine::step` could never
    /// have produced, so a restored engine cannot divide by a zero flow rate
    /// or walk a broken tank list.
    fn check(&self) -> Result<(), StateError> {
        let quantities = [
            ("clock", Some(self.clock)),
            ("initial flow rate", Some(self.initial_flow_rate)),
            ("discarded flow", Some(self.discarded_flow)),
            ("last overflow time", self.last_overflow_time),
            ("all overflow time", self.all_overflow_time),
        ];
        for (field, value) in quantities {
            if let Some(value) = value.filter(|v| !v.is_finite() || *v < 0.0) {
                return Err(StateError::InvalidQuantity { field, value });
            }
        }
        if self.all_overflow_time.is_some() && !self.active.is_empty() {
            return Err(StateError::FinishedWithActiveTanks);
        }
        self.active.check_integrity()
    }
}

impl Engine {
    /// Serialize the full engine state.
    pub fn serialize(&self) -> Result<Vec<u8>, SerializeError> {
        let snapshot = EngineSnapshot {
            header: SnapshotHeader::new(self.steps),
            active: self.active.clone(),
            clock: self.clock,
            steps: self.steps,
            last_overflow_time: self.last_overflow_time,
            all_overflow_time: self.all_overflow_time,
            initial_flow_rate: self.initial_flow_rate,
            discarded_flow: self.discarded_flow,
        };
        bitcode::serialize(&snapshot).map_err(|e| SerializeError::Encode(e.to_string()))
    }

    /// Restore an engine from [`Engine::serialize`] output.
    ///
    /// The header and the decoded state are both validated before the
    /// engine is handed back.
    pub fn deserialize(data: &[u8]) -> Result<Self, DeserializeError> {
        let snapshot: EngineSnapshot =
            bitcode::deserialize(data).map_err(|e| DeserializeError::Decode(e.to_string()))?;
        snapshot.header.validate()?;
        snapshot.check()?;
        tracing::debug!(steps = snapshot.steps, "engine restored from snapshot");
        Ok(Engine {
            active: snapshot.active,
            clock: snapshot.clock,
            steps: snapshot.steps,
            last_overflow_time: snapshot.last_overflow_time,
            all_overflow_time: snapshot.all_overflow_time,
            initial_flow_rate: snapshot.initial_flow_rate,
            discarded_flow: snapshot.discarded_flow,
        })
    }
}
