//! JSON data file I/O
//!
//! Data files are replaced through a sibling temp file and a rename, so a
//! failed save leaves the previous characteristics or rules in place.

use std::fs::{self, File};
use std::io::{ErrorKind, Write};
use std::path::{Path, PathBuf};

use serde::{de::DeserializeOwned, Serialize};

use crate::error::{DebtError, DebtResult};

/// Read a JSON file that must exist
pub fn read_json_file<T: DeserializeOwned>(path: &Path) -> DebtResult<T> {
    let contents = fs::read_to_string(path)
        .map_err(|e| DebtError::Storage(format!("Failed to read {}: {}", path.display(), e)))?;
    parse(path, &contents)
}

/// Read a data file, treating a missing file as empty data
///
/// Storage is usable before `init` created its files.
pub fn read_data_file<T: DeserializeOwned + Default>(path: &Path) -> DebtResult<T> {
    match fs::read_to_string(path) {
        Ok(contents) => parse(path, &contents),
        Err(e) if e.kind() == ErrorKind::NotFound => Ok(T::default()),
        Err(e) => Err(DebtError::Storage(format!(
            "Failed to read {}: {}",
            path.display(),
            e
        ))),
    }
}

/// Replace a data file with the pretty-printed JSON of `data`
pub fn write_data_file<T: Serialize>(path: &Path, data: &T) -> DebtResult<()> {
    let json = serde_json::to_vec_pretty(data).map_err(|e| {
        DebtError::Storage(format!("Failed to serialize {}: {}", path.display(), e))
    })?;

    if let Some(dir) = path.parent() {
        fs::create_dir_all(dir).map_err(|e| {
            DebtError::Storage(format!("Failed to create {}: {}", dir.display(), e))
        })?;
    }

    let temp_path = temp_path(path);
    let written = File::create(&temp_path).and_then(|mut file| {
        file.write_all(&json)?;
        file.sync_all()
    });
    if let Err(e) = written.and_then(|()| fs::rename(&temp_path, path)) {
        let _ = fs::remove_file(&temp_path);
        return Err(DebtError::Storage(format!(
            "Failed to save {}: {}",
            path.display(),
            e
        )));
    }

    Ok(())
}

fn parse<T: DeserializeOwned>(path: &Path, contents: &str) -> DebtResult<T> {
    serde_json::from_str(contents)
        .map_err(|e| DebtError::Storage(format!("Failed to parse {}: {}", path.display(), e)))
}

/// `rules.json` is staged as `.rules.json.tmp` in the same directory
fn temp_path(path: &Path) -> PathBuf {
    let name = path
        .file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_default();
    path.with_file_name(format!(".{}.tmp", name))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{Rule, RuleId, RuleKey};
    use crate::storage::rules::RuleData;
    use tempfile::TempDir;

    fn rule_data() -> RuleData {
        RuleData {
            rules: vec![Rule::new(RuleId::new(1), RuleKey::of("squid", "S1"))],
        }
    }

    #[test]
    fn test_missing_data_file_is_empty() {
        let temp_dir = TempDir::new().unwrap();

        let data: RuleData = read_data_file(&temp_dir.path().join("rules.json")).unwrap();
        assert!(data.rules.is_empty());
    }

    #[test]
    fn test_missing_required_file_is_an_error() {
        let temp_dir = TempDir::new().unwrap();

        let result: DebtResult<RuleData> = read_json_file(&temp_dir.path().join("java.json"));
        assert!(matches!(result, Err(DebtError::Storage(_))));
    }

    #[test]
    fn test_write_then_read() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("data").join("rules.json");

        write_data_file(&path, &rule_data()).unwrap();

        let data: RuleData = read_data_file(&path).unwrap();
        assert_eq!(data.rules, rule_data().rules);
        assert!(!temp_dir.path().join("data").join(".rules.json.tmp").exists());
    }

    #[test]
    fn test_corrupt_file_names_the_path() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("rules.json");
        fs::write(&path, "{\"rules\": [").unwrap();

        let err = read_data_file::<RuleData>(&path).unwrap_err();
        assert!(err.to_string().contains("rules.json"));
    }
}
