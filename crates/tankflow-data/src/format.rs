//! Input format detection.

use std::fmt;
use std::path::Path;
use std::str::FromStr;

use crate::loader::DataLoadError;

/// Supported scenario file formats.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Format {
    /// Header line plus one capacity per line.
    Plain,
    Ron,
    Json,
    Toml,
}

impl Format {
    pub fn name(self) -> &'static str {
        match self {
            Format::Plain => "plain",
            Format::Ron => "ron",
            Format::Json => "json",
            Format::Toml => "toml",
        }
    }
}

impl fmt::Display for Format {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Format {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "plain" | "txt" => Ok(Format::Plain),
            "ron" => Ok(Format::Ron),
            "json" => Ok(Format::Json),
            "toml" => Ok(Format::Toml),
            other => Err(format!("unknown format '{other}'")),
        }
    }
}

/// Detect the format of a file from its extension.
///
/// `.txt`, `.in`, and files without an extension are plain.
pub fn detect_format(path: &Path) -> Result<Format, DataLoadError> {
    match path.extension().and_then(|e| e.to_str()) {
        None | Some("txt") | Some("in") => Ok(Format::Plain),
        Some("ron") => Ok(Format::Ron),
        Some("json") => Ok(Format::Json),
        Some("toml") => Ok(Format::Toml),
        Some(_) => Err(DataLoadError::UnsupportedFormat {
            file: path.to_path_buf(),
        }),
    }
}
