//! Plugin collaborators of the debt model
//!
//! - [`DebtModelPluginRepository`]: serves the characteristic model XML
//!   declared by plugins. The default model ships with the crate.
//! - [`RuleDefinitionsLoader`]: the debt declared by plugins for their rules,
//!   used by reset.

pub mod rule_definitions;

use std::fs::{self, File};
use std::io::Read;
use std::path::PathBuf;

use crate::error::{DebtError, DebtResult};

pub use rule_definitions::{
    DebtRemediationDefinition, JsonRuleDefinitionsLoader, RepositoryDefinition, RuleDefinition,
    RuleDefinitionsLoader, RulesDefinition,
};

/// Key of the plugin providing the default debt model
pub const DEFAULT_MODEL_PLUGIN: &str = "technical-debt";

const DEFAULT_MODEL_XML: &str = include_str!("../../resources/default-debt-model.xml");

const MODEL_FILE_SUFFIX: &str = "-model.xml";

/// Registry of plugins contributing a debt model
pub trait DebtModelPluginRepository {
    /// Open the model XML declared by `plugin_key`
    fn create_reader_for_xml_file(&self, plugin_key: &str) -> DebtResult<Box<dyn Read + '_>>;

    /// Keys of the plugins contributing a model besides the default one
    fn contributing_plugins(&self) -> DebtResult<Vec<String>>;

    /// Read the whole model XML of `plugin_key`
    fn read_xml(&self, plugin_key: &str) -> DebtResult<String> {
        let mut xml = String::new();
        self.create_reader_for_xml_file(plugin_key)?
            .read_to_string(&mut xml)
            .map_err(|e| {
                DebtError::Plugin(format!(
                    "Failed to read debt model of plugin '{}': {}",
                    plugin_key, e
                ))
            })?;
        Ok(xml)
    }
}

/// Plugin registry backed by the bundled default model and a plugins directory
///
/// Every `<key>-model.xml` file in the directory is the model of plugin `key`.
pub struct FsDebtModelPluginRepository {
    plugins_dir: PathBuf,
}

impl FsDebtModelPluginRepository {
    pub fn new(plugins_dir: PathBuf) -> Self {
        Self { plugins_dir }
    }

    fn model_file(&self, plugin_key: &str) -> PathBuf {
        self.plugins_dir
            .join(format!("{}{}", plugin_key, MODEL_FILE_SUFFIX))
    }
}

impl DebtModelPluginRepository for FsDebtModelPluginRepository {
    fn create_reader_for_xml_file(&self, plugin_key: &str) -> DebtResult<Box<dyn Read + '_>> {
        let path = self.model_file(plugin_key);
        if path.exists() {
            let file = File::open(&path).map_err(|e| {
                DebtError::Plugin(format!("Failed to open {}: {}", path.display(), e))
            })?;
            return Ok(Box::new(file));
        }

        if plugin_key == DEFAULT_MODEL_PLUGIN {
            return Ok(Box::new(DEFAULT_MODEL_XML.as_bytes()));
        }

        Err(DebtError::Plugin(format!(
            "Plugin '{}' does not declare a debt model",
            plugin_key
        )))
    }

    fn contributing_plugins(&self) -> DebtResult<Vec<String>> {
        if !self.plugins_dir.exists() {
            return Ok(Vec::new());
        }

        let entries = fs::read_dir(&self.plugins_dir).map_err(|e| {
            DebtError::Plugin(format!(
                "Failed to read plugins directory {}: {}",
                self.plugins_dir.display(),
                e
            ))
        })?;

        let mut keys = Vec::new();
        for entry in entries {
            let entry = entry
                .map_err(|e| DebtError::Plugin(format!("Failed to read directory entry: {}", e)))?;
            let file_name = entry.file_name().to_string_lossy().to_string();
            if let Some(key) = file_name.strip_suffix(MODEL_FILE_SUFFIX) {
                if !key.is_empty() && key != DEFAULT_MODEL_PLUGIN {
                    keys.push(key.to_string());
                }
            }
        }

        keys.sort();
        Ok(keys)
    }
}
