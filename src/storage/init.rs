//! Storage initialization
//!
//! Handles first-run setup: directories and empty data files.

use crate::config::paths::DebtPaths;
use crate::error::DebtError;

use super::characteristics::CharacteristicData;
use super::file_io::write_data_file;
use super::rules::RuleData;

/// Initialize storage for a fresh installation
///
/// Existing data files are left untouched.
pub fn initialize_storage(paths: &DebtPaths) -> Result<(), DebtError> {
    paths.ensure_directories()?;

    if !paths.characteristics_file().exists() {
        write_data_file(&paths.characteristics_file(), &CharacteristicData::default())?;
    }
    if !paths.rules_file().exists() {
        write_data_file(&paths.rules_file(), &RuleData::default())?;
    }

    Ok(())
}

/// Check if storage needs initialization
pub fn needs_initialization(paths: &DebtPaths) -> bool {
    !paths.characteristics_file().exists() || !paths.rules_file().exists()
}
