//! Engine settings persisted by the host application.
//!
//! Stored as a JSON object with camelCase keys. Missing keys take their
//! defaults, so older or partial documents still load.

use crate::error::SettingsError;
use serde::{Deserialize, Serialize};
use std::fs;
use std::io::ErrorKind;
use std::path::Path;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct EngineSettings {
    /// Capacity of the undo history.
    pub max_undo_steps: usize,
    /// Apply operations to the active sheet instead of a new one.
    pub in_place_mode: bool,
    /// Whether dialogs default to writing results to a new sheet.
    pub default_to_new_sheet: bool,
}

impl Default for EngineSettings {
    fn default() -> Self {
        EngineSettings {
            max_undo_steps: crate::history::DEFAULT_CAPACITY,
            in_place_mode: false,
            default_to_new_sheet: true,
        }
    }
}

impl EngineSettings {
    pub fn from_json(json: &str) -> Result<Self, SettingsError> {
        Ok(serde_json::from_str(json)?)
    }

    pub fn to_json(&self) -> Result<String, SettingsError> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Read settings from `path`. A file that does not exist yields the
    /// defaults; any other I/O or parse failure is an error.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, SettingsError> {
        let path = path.as_ref();
        match fs::read_to_string(path) {
            Ok(json) => EngineSettings::from_json(&json),
            Err(e) if e.kind() == ErrorKind::NotFound => {
                log::debug!("no settings at {}, using defaults", path.display());
                Ok(EngineSettings::default())
            }
            Err(e) => Err(e.into()),
        }
    }

    pub fn save(&self, path: impl AsRef<Path>) -> Result<(), SettingsError> {
        fs::write(path, self.to_json()?)?;
        Ok(())
    }
}
