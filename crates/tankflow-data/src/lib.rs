//! Scenario loading for Tankflow.
//!
//! Turns input files into the ordered tank list the engine consumes. Two
//! families of input are supported:
//!
//! - **Plain**: a `<count> <flow_rate>` header followed by one capacity per
//!   line. Every tank shares the header's flow rate.
//! - **Structured**: RON, JSON, or TOML documents with an optional shared
//!   flow rate, an optional declared count, and per-tank entries that may
//!   override the flow rate.
//!
//! The format is picked from the file extension unless given explicitly.

pub mod format;
pub mod loader;
pub mod plain;
pub mod scenario;

pub use format::{Format, detect_format};
pub use loader::{DataLoadError, load_scenario};
pub use scenario::{Scenario, ScenarioError};
