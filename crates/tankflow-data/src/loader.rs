//! File loading: reads a scenario file and parses it in the right format.

use std::path::{Path, PathBuf};

use crate::format::{Format, detect_format};
use crate::scenario::{Scenario, ScenarioError, parse_scenario};

// ===========================================================================
// Errors
// ===========================================================================

/// Errors that can occur while loading a scenario file.
#[derive(Debug, thiserror::Error)]
pub enum DataLoadError {
    /// The file has an extension we don't support.
    #[error("unsupported format for file: {}", file.display())]
    UnsupportedFormat { file: PathBuf },

    /// The file was read but its content is not a valid scenario.
    #[error("invalid scenario in {}: {source}", file.display())]
    Scenario {
        file: PathBuf,
        #[source]
        source: ScenarioError,
    },

    /// An I/O error occurred.
    #[error("cannot read {}: {source}", file.display())]
    Io {
        file: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

// ===========================================================================
// Loading
// ===========================================================================

/// Load a scenario file.
///
/// When `format` is `None` it is detected from the file extension.
pub fn load_scenario(path: &Path, format: Option<Format>) -> Result<Scenario, DataLoadError> {
    let format = match format {
        Some(format) => format,
        None => detect_format(path)?,
    };
    let content = std::fs::read_to_string(path).map_err(|source| DataLoadError::Io {
        file: path.to_path_buf(),
        source,
    })?;
    let scenario = parse_scenario(&content, format).map_err(|source| DataLoadError::Scenario {
        file: path.to_path_buf(),
        source,
    })?;
    tracing::debug!(
        file = %path.display(),
        %format,
        tanks = scenario.len(),
        "scenario loaded"
    );
    Ok(scenario)
}

// ===========================================================================
// Tests
// ===========================================================================
