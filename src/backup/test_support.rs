//! Fixtures shared by the backup and restore tests

use std::cell::Cell;
use std::collections::BTreeMap;
use std::io::Read;

use chrono::Utc;
use tempfile::TempDir;

use crate::config::paths::DebtPaths;
use crate::error::{DebtError, DebtResult};
use crate::import::{RulesImporter, ValidationMessages};
use crate::models::{Characteristic, CharacteristicId, RuleDebt};
use crate::plugins::{
    DebtModelPluginRepository, RuleDefinitionsLoader, RulesDefinition, DEFAULT_MODEL_PLUGIN,
};
use crate::storage::Storage;

pub fn create_test_storage() -> (TempDir, Storage) {
    let temp_dir = TempDir::new().unwrap();
    let paths = DebtPaths::with_base_dir(temp_dir.path().to_path_buf());
    let storage = Storage::new(paths).unwrap();
    storage.load_all().unwrap();
    (temp_dir, storage)
}

pub fn root_row(key: &str, name: &str, order: i32) -> Characteristic {
    Characteristic {
        id: CharacteristicId::new(0),
        key: key.to_string(),
        name: name.to_string(),
        order: Some(order),
        parent_id: None,
        enabled: true,
        created_at: Utc::now(),
        updated_at: None,
    }
}

pub fn sub_row(key: &str, name: &str, parent_id: CharacteristicId) -> Characteristic {
    Characteristic {
        order: None,
        parent_id: Some(parent_id),
        ..root_row(key, name, 0)
    }
}

/// Plugin registry serving models from memory
#[derive(Default)]
pub struct TestPlugins {
    default_model: Option<String>,
    contributed: BTreeMap<String, String>,
}

impl TestPlugins {
    pub fn with_default(xml: &str) -> Self {
        Self {
            default_model: Some(xml.to_string()),
            ..Self::default()
        }
    }

    pub fn contribute(&mut self, plugin_key: &str, xml: &str) {
        self.contributed
            .insert(plugin_key.to_string(), xml.to_string());
    }
}

impl DebtModelPluginRepository for TestPlugins {
    fn create_reader_for_xml_file(&self, plugin_key: &str) -> DebtResult<Box<dyn Read + '_>> {
        let xml = match self.contributed.get(plugin_key) {
            Some(xml) => Some(xml),
            None if plugin_key == DEFAULT_MODEL_PLUGIN => self.default_model.as_ref(),
            None => None,
        };
        xml.map(|xml| Box::new(xml.as_bytes()) as Box<dyn Read + '_>)
            .ok_or_else(|| DebtError::Plugin(format!("unknown plugin '{}'", plugin_key)))
    }

    fn contributing_plugins(&self) -> DebtResult<Vec<String>> {
        Ok(self.contributed.keys().cloned().collect())
    }
}

/// Rule definitions loader counting its calls
#[derive(Default)]
pub struct TestLoader {
    definitions: RulesDefinition,
    calls: Cell<usize>,
}

impl TestLoader {
    pub fn new(definitions: RulesDefinition) -> Self {
        Self {
            definitions,
            calls: Cell::new(0),
        }
    }

    pub fn calls(&self) -> usize {
        self.calls.get()
    }
}

impl RuleDefinitionsLoader for TestLoader {
    fn load(&self) -> DebtResult<RulesDefinition> {
        self.calls.set(self.calls.get() + 1);
        Ok(self.definitions.clone())
    }
}

pub fn import_rule_debts(xml: &str) -> Vec<RuleDebt> {
    let mut messages = ValidationMessages::new();
    RulesImporter::default().import_xml(xml, &mut messages).unwrap()
}
