use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use super::config::{CanvasConfig, ToolConfig};
use crate::symmetry::SymmetryMode;
use crate::tools::ToolKind;

/// Errors that can occur during settings persistence operations
#[derive(Debug, Error)]
pub enum PersistenceError {
    #[error("Failed to serialize settings: {0}")]
    SerializationError(#[from] serde_json::Error),

    #[error("Failed to access settings file: {0}")]
    IoError(#[from] std::io::Error),
}

/// Result type for persistence operations
pub type PersistenceResult<T> = Result<T, PersistenceError>;

/// Editor preferences that survive a restart. The drawing itself is not part of it.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)] // if we add new fields, give them default values when deserializing old settings
pub struct Settings {
    pub canvas: CanvasConfig,
    pub tools: ToolConfig,
    pub tool: ToolKind,
    pub symmetry: SymmetryMode,
    pub show_grid: bool,
}

impl Settings {
    pub fn to_json(&self) -> PersistenceResult<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    pub fn from_json(json: &str) -> PersistenceResult<Self> {
        Ok(serde_json::from_str(json)?)
    }
}

/// Writes `settings` as pretty JSON to `path`.
pub fn save_settings(settings: &Settings, path: impl AsRef<Path>) -> PersistenceResult<()> {
    fs::write(path, settings.to_json()?)?;
    Ok(())
}

pub fn load_settings(path: impl AsRef<Path>) -> PersistenceResult<Settings> {
    let json = fs::read_to_string(path)?;
    Settings::from_json(&json)
}
