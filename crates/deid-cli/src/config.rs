//! Optional TOML defaults for the CLI.
//!
//! ```toml
//! [input]
//! sheet = "Participants"
//! header_row = 2
//!
//! [hash]
//! identifier = "Study ID"
//! columns = ["Name", "col4"]
//! separator = "|"
//!
//! [output]
//! path = "out/hashed.csv"
//! format = "csv"
//! ```
//!
//! Explicit command-line flags always win over values from the file.

use std::path::{Path, PathBuf};

use deid_output::OutputFormat;
use serde::Deserialize;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("invalid config {path}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Config {
    pub input: InputConfig,
    pub hash: HashConfig,
    pub output: OutputConfig,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct InputConfig {
    pub sheet: Option<String>,
    pub header_row: Option<usize>,
}

/// Columns are named by key (`col2`) or by header label.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct HashConfig {
    pub identifier: Option<String>,
    pub columns: Vec<String>,
    pub separator: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct OutputConfig {
    pub path: Option<PathBuf>,
    pub format: Option<OutputFormat>,
}

impl Config {
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let contents = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        toml::from_str(&contents).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })
    }

    /// Loads `path` when given, otherwise returns the built-in defaults.
    pub fn load_optional(path: Option<&Path>) -> Result<Self, ConfigError> {
        path.map_or_else(|| Ok(Self::default()), Self::load)
    }
}
