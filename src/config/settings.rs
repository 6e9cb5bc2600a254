//! User settings for the debt model
//!
//! Persisted as `config.json` in the base directory. Every field has a
//! default so older files keep loading.

use serde::{Deserialize, Serialize};

use super::paths::DebtPaths;
use crate::error::DebtError;
use crate::models::DurationUnit;
use crate::plugins::DEFAULT_MODEL_PLUGIN;

/// User settings for the debt model
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Settings {
    /// Schema version for migration support
    #[serde(default = "default_schema_version")]
    pub schema_version: u32,

    /// Unit appended to imported durations that carry no unit of their own
    #[serde(default)]
    pub default_duration_unit: DurationUnit,

    /// Plugin key whose model XML is used by `reset`
    #[serde(default = "default_plugin_key")]
    pub default_plugin_key: String,

    /// Whether reconciliation writes are recorded in the audit log
    #[serde(default = "default_audit_enabled")]
    pub audit_enabled: bool,
}

fn default_schema_version() -> u32 {
    1
}

fn default_plugin_key() -> String {
    DEFAULT_MODEL_PLUGIN.to_string()
}

fn default_audit_enabled() -> bool {
    true
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            schema_version: default_schema_version(),
            default_duration_unit: DurationUnit::default(),
            default_plugin_key: default_plugin_key(),
            audit_enabled: default_audit_enabled(),
        }
    }
}

impl Settings {
    /// Load settings from disk, or create default settings if file doesn't exist
    pub fn load_or_create(paths: &DebtPaths) -> Result<Self, DebtError> {
        let settings_path = paths.settings_file();

        if settings_path.exists() {
            let contents = std::fs::read_to_string(&settings_path)
                .map_err(|e| DebtError::Io(format!("Failed to read settings file: {}", e)))?;

            let settings: Settings = serde_json::from_str(&contents)
                .map_err(|e| DebtError::Config(format!("Failed to parse settings file: {}", e)))?;

            Ok(settings)
        } else {
            // Don't save yet - let caller decide when to persist
            Ok(Settings::default())
        }
    }

    /// Save settings to disk
    pub fn save(&self, paths: &DebtPaths) -> Result<(), DebtError> {
        paths.ensure_directories()?;

        let contents = serde_json::to_string_pretty(self)
            .map_err(|e| DebtError::Config(format!("Failed to serialize settings: {}", e)))?;

        std::fs::write(paths.settings_file(), contents)
            .map_err(|e| DebtError::Io(format!("Failed to write settings file: {}", e)))?;

        Ok(())
    }
}
