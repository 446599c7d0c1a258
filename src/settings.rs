//! Driver settings
//!
//! Options for the headless loop. Physics constants are fixed in
//! [`crate::consts`] and are deliberately not part of this struct.

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::consts::TICK_HZ;
use crate::error::SettingsError;

/// Environment variable naming a settings JSON file
pub const SETTINGS_ENV: &str = "FLAPPY_SETTINGS";

/// One minute of game time
pub const DEFAULT_MAX_TICKS: u64 = 60 * TICK_HZ as u64;

/// Loop driver options
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    /// RNG seed for gap placement (wall-clock time when absent)
    pub seed: Option<u64>,
    /// Stop after this many ticks (`null` runs until quit)
    pub max_ticks: Option<u64>,
    /// Let the autopilot press jump
    pub autopilot: bool,
    /// Sleep between ticks to hold 60 Hz
    pub realtime: bool,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            seed: None,
            max_ticks: Some(DEFAULT_MAX_TICKS),
            autopilot: true,
            realtime: false,
        }
    }
}

impl Settings {
    /// Parse settings from a JSON string
    pub fn from_json(json: &str) -> Result<Self, SettingsError> {
        Ok(serde_json::from_str(json)?)
    }

    /// Read settings from a JSON file
    pub fn load_from(path: impl AsRef<Path>) -> Result<Self, SettingsError> {
        let path = path.as_ref();
        let json = std::fs::read_to_string(path).map_err(|source| SettingsError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let settings = Self::from_json(&json)?;
        log::info!("Loaded settings from {}", path.display());
        Ok(settings)
    }

    /// Load from `$FLAPPY_SETTINGS`, falling back to defaults
    pub fn load() -> Self {
        let Ok(path) = std::env::var(SETTINGS_ENV) else {
            log::info!("Using default settings");
            return Self::default();
        };

        match Self::load_from(&path) {
            Ok(settings) => settings,
            Err(err) => {
                log::warn!("{err}; using default settings");
                Self::default()
            }
        }
    }
}
