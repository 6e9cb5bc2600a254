//! Rule repository for JSON storage
//!
//! Manages loading and saving rules to rules.json. Rules are registered by
//! the rule registry; the debt model only rewrites their remediation fields.

use std::collections::HashMap;
use std::path::PathBuf;
use std::sync::RwLock;

use crate::error::DebtError;
use crate::models::{Rule, RuleId};

use super::file_io::{read_data_file, write_data_file};

/// Serializable rule data structure
#[derive(Debug, Clone, Default, serde::Serialize, serde::Deserialize)]
pub struct RuleData {
    pub rules: Vec<Rule>,
}

/// Repository for rule persistence
pub struct RuleRepository {
    path: PathBuf,
    rules: RwLock<HashMap<RuleId, Rule>>,
}

impl RuleRepository {
    /// Create a new rule repository
    pub fn new(path: PathBuf) -> Self {
        Self {
            path,
            rules: RwLock::new(HashMap::new()),
        }
    }

    /// Load rules from disk
    pub fn load(&self) -> Result<(), DebtError> {
        let file_data: RuleData = read_data_file(&self.path)?;

        let mut rules = self
            .rules
            .write()
            .map_err(|e| DebtError::Storage(format!("Failed to acquire write lock: {}", e)))?;

        rules.clear();
        for rule in file_data.rules {
            rules.insert(rule.id, rule);
        }

        Ok(())
    }

    /// Save rules to disk
    pub fn save(&self) -> Result<(), DebtError> {
        let file_data = RuleData {
            rules: self.get_all()?,
        };

        write_data_file(&self.path, &file_data)
    }

    /// Get a rule by ID
    pub fn get(&self, id: RuleId) -> Result<Option<Rule>, DebtError> {
        let rules = self
            .rules
            .read()
            .map_err(|e| DebtError::Storage(format!("Failed to acquire read lock: {}", e)))?;

        Ok(rules.get(&id).cloned())
    }

    /// Get all rules, ordered by ID
    pub fn get_all(&self) -> Result<Vec<Rule>, DebtError> {
        let rules = self
            .rules
            .read()
            .map_err(|e| DebtError::Storage(format!("Failed to acquire read lock: {}", e)))?;

        let mut list: Vec<_> = rules.values().cloned().collect();
        list.sort_by_key(|r| r.id);
        Ok(list)
    }

    /// Insert or update a rule
    ///
    /// Used by the rule registry side; the debt model goes through a session.
    pub fn upsert(&self, rule: Rule) -> Result<(), DebtError> {
        let mut rules = self
            .rules
            .write()
            .map_err(|e| DebtError::Storage(format!("Failed to acquire write lock: {}", e)))?;

        rules.insert(rule.id, rule);
        Ok(())
    }

    /// Replace the whole content of the repository
    pub fn replace_all(&self, list: impl IntoIterator<Item = Rule>) -> Result<(), DebtError> {
        let mut rules = self
            .rules
            .write()
            .map_err(|e| DebtError::Storage(format!("Failed to acquire write lock: {}", e)))?;

        rules.clear();
        for rule in list {
            rules.insert(rule.id, rule);
        }
        Ok(())
    }

    /// Count rules
    pub fn count(&self) -> Result<usize, DebtError> {
        let rules = self
            .rules
            .read()
            .map_err(|e| DebtError::Storage(format!("Failed to acquire read lock: {}", e)))?;

        Ok(rules.len())
    }
}
