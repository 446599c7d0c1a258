//! Error types
//!
//! The simulation itself is infallible (bad timesteps and unknown ids are
//! no-ops). The only fallible edge is reading driver settings from disk.

use std::path::PathBuf;

use thiserror::Error;

/// Failure while loading `Settings`
#[derive(Debug, Error)]
pub enum SettingsError {
    #[error("failed to read settings file {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("malformed settings JSON: {0}")]
    Parse(#[from] serde_json::Error),
}
