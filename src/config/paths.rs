//! Path management for the debt model
//!
//! ## Path Resolution Order
//!
//! 1. `DEBT_MODEL_HOME` environment variable (if set)
//! 2. The platform configuration directory joined with `debt-model`
//!    (`~/.config/debt-model` on Linux, `%APPDATA%\debt-model` on Windows)

use std::path::PathBuf;

use crate::error::DebtError;

/// Manages all paths used by the debt model
#[derive(Debug, Clone)]
pub struct DebtPaths {
    /// Base directory for all debt model data
    base_dir: PathBuf,
}

impl DebtPaths {
    /// Create a new DebtPaths instance
    ///
    /// # Errors
    ///
    /// Returns an error if no home directory can be determined.
    pub fn new() -> Result<Self, DebtError> {
        let base_dir = if let Ok(custom) = std::env::var("DEBT_MODEL_HOME") {
            PathBuf::from(custom)
        } else {
            resolve_default_path()?
        };

        Ok(Self { base_dir })
    }

    /// Create DebtPaths with a custom base directory (useful for testing)
    pub fn with_base_dir(base_dir: PathBuf) -> Self {
        Self { base_dir }
    }

    pub fn base_dir(&self) -> &PathBuf {
        &self.base_dir
    }

    /// Get the data directory (`<base>/data/`)
    pub fn data_dir(&self) -> PathBuf {
        self.base_dir.join("data")
    }

    /// Get the directory where XML backups are written (`<base>/backups/`)
    pub fn backup_dir(&self) -> PathBuf {
        self.base_dir.join("backups")
    }

    /// Get the directory holding contributed `<plugin>-model.xml` files
    pub fn plugins_dir(&self) -> PathBuf {
        self.base_dir.join("plugins")
    }

    /// Get the directory holding rule definition JSON files
    pub fn rule_definitions_dir(&self) -> PathBuf {
        self.base_dir.join("rule-definitions")
    }

    pub fn settings_file(&self) -> PathBuf {
        self.base_dir.join("config.json")
    }

    pub fn audit_log(&self) -> PathBuf {
        self.base_dir.join("audit.log")
    }

    /// Get the path to characteristics.json
    pub fn characteristics_file(&self) -> PathBuf {
        self.data_dir().join("characteristics.json")
    }

    /// Get the path to rules.json
    pub fn rules_file(&self) -> PathBuf {
        self.data_dir().join("rules.json")
    }

    /// Ensure all required directories exist
    pub fn ensure_directories(&self) -> Result<(), DebtError> {
        for dir in [
            self.base_dir.clone(),
            self.data_dir(),
            self.backup_dir(),
            self.plugins_dir(),
            self.rule_definitions_dir(),
        ] {
            std::fs::create_dir_all(&dir).map_err(|e| {
                DebtError::Io(format!("Failed to create directory {}: {}", dir.display(), e))
            })?;
        }

        Ok(())
    }
}

fn resolve_default_path() -> Result<PathBuf, DebtError> {
    let dirs = directories::BaseDirs::new()
        .ok_or_else(|| DebtError::Config("Could not determine home directory".into()))?;
    Ok(dirs.config_dir().join("debt-model"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_custom_base_dir() {
        let temp_dir = TempDir::new().unwrap();
        let paths = DebtPaths::with_base_dir(temp_dir.path().to_path_buf());

        assert_eq!(paths.base_dir(), temp_dir.path());
        assert_eq!(paths.data_dir(), temp_dir.path().join("data"));
        assert_eq!(paths.backup_dir(), temp_dir.path().join("backups"));
        assert_eq!(paths.plugins_dir(), temp_dir.path().join("plugins"));
    }

    #[test]
    fn test_ensure_directories() {
        let temp_dir = TempDir::new().unwrap();
        let paths = DebtPaths::with_base_dir(temp_dir.path().to_path_buf());

        paths.ensure_directories().unwrap();

        assert!(paths.data_dir().exists());
        assert!(paths.backup_dir().exists());
        assert!(paths.plugins_dir().exists());
        assert!(paths.rule_definitions_dir().exists());
    }

    #[test]
    fn test_file_paths() {
        let temp_dir = TempDir::new().unwrap();
        let paths = DebtPaths::with_base_dir(temp_dir.path().to_path_buf());

        assert_eq!(paths.settings_file(), temp_dir.path().join("config.json"));
        assert_eq!(
            paths.characteristics_file(),
            temp_dir.path().join("data").join("characteristics.json")
        );
        assert_eq!(
            paths.rules_file(),
            temp_dir.path().join("data").join("rules.json")
        );
    }
}
