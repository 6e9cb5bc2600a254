//! Characteristic repository for JSON storage
//!
//! Manages loading and saving characteristics to characteristics.json

use std::collections::HashMap;
use std::path::PathBuf;
use std::sync::RwLock;

use crate::error::DebtError;
use crate::models::{Characteristic, CharacteristicId};

use super::file_io::{read_data_file, write_data_file};

/// Serializable characteristic data structure
#[derive(Debug, Clone, Default, serde::Serialize, serde::Deserialize)]
pub struct CharacteristicData {
    pub characteristics: Vec<Characteristic>,
}

/// Repository for characteristic persistence
pub struct CharacteristicRepository {
    path: PathBuf,
    characteristics: RwLock<HashMap<CharacteristicId, Characteristic>>,
}

impl CharacteristicRepository {
    /// Create a new characteristic repository
    pub fn new(path: PathBuf) -> Self {
        Self {
            path,
            characteristics: RwLock::new(HashMap::new()),
        }
    }

    /// Load characteristics from disk
    pub fn load(&self) -> Result<(), DebtError> {
        let file_data: CharacteristicData = read_data_file(&self.path)?;

        let mut characteristics = self
            .characteristics
            .write()
            .map_err(|e| DebtError::Storage(format!("Failed to acquire write lock: {}", e)))?;

        characteristics.clear();
        for characteristic in file_data.characteristics {
            characteristics.insert(characteristic.id, characteristic);
        }

        Ok(())
    }

    /// Save characteristics to disk
    pub fn save(&self) -> Result<(), DebtError> {
        let file_data = CharacteristicData {
            characteristics: self.get_all()?,
        };

        write_data_file(&self.path, &file_data)
    }

    /// Get a characteristic by ID
    pub fn get(&self, id: CharacteristicId) -> Result<Option<Characteristic>, DebtError> {
        let characteristics = self
            .characteristics
            .read()
            .map_err(|e| DebtError::Storage(format!("Failed to acquire read lock: {}", e)))?;

        Ok(characteristics.get(&id).cloned())
    }

    /// Get all characteristics, ordered by ID
    pub fn get_all(&self) -> Result<Vec<Characteristic>, DebtError> {
        let characteristics = self
            .characteristics
            .read()
            .map_err(|e| DebtError::Storage(format!("Failed to acquire read lock: {}", e)))?;

        let mut list: Vec<_> = characteristics.values().cloned().collect();
        list.sort_by_key(|c| c.id);
        Ok(list)
    }

    /// Replace the whole content of the repository
    pub fn replace_all(
        &self,
        list: impl IntoIterator<Item = Characteristic>,
    ) -> Result<(), DebtError> {
        let mut characteristics = self
            .characteristics
            .write()
            .map_err(|e| DebtError::Storage(format!("Failed to acquire write lock: {}", e)))?;

        characteristics.clear();
        for characteristic in list {
            characteristics.insert(characteristic.id, characteristic);
        }
        Ok(())
    }

    /// Count characteristics
    pub fn count(&self) -> Result<usize, DebtError> {
        let characteristics = self
            .characteristics
            .read()
            .map_err(|e| DebtError::Storage(format!("Failed to acquire read lock: {}", e)))?;

        Ok(characteristics.len())
    }
}
