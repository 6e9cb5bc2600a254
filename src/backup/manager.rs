//! Debt model backup and reset
//!
//! Backup reads the enabled characteristics and the effective remediation of
//! every enabled rule and exports them as XML. Reset reconciles the
//! characteristics with the plugin models and rewrites the rules' default
//! remediation from the plugin rule definitions.

use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};

use chrono::{DateTime, Utc};

use crate::audit::ChangeSource;
use crate::config::Settings;
use crate::error::{DebtError, DebtResult};
use crate::export::export_xml;
use crate::import::import_characteristics;
use crate::models::{
    Characteristic, CharacteristicId, DebtCharacteristic, DebtModel, DurationUnit, Rule, RuleDebt,
};
use crate::plugins::{
    DebtModelPluginRepository, RuleDefinitionsLoader, RulesDefinition, DEFAULT_MODEL_PLUGIN,
};
use crate::storage::{Storage, StorageSession};

/// Synchronizes the persisted debt model with XML documents and plugins
pub struct DebtModelBackup<'a> {
    pub(super) storage: &'a Storage,
    plugins: &'a dyn DebtModelPluginRepository,
    rule_definitions: &'a dyn RuleDefinitionsLoader,
    default_plugin_key: String,
    pub(super) default_unit: DurationUnit,
}

/// Outcome of a reset
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ResetResult {
    /// Enabled characteristics after the reset
    pub characteristics: usize,
    /// Rules whose remediation was rewritten
    pub rules_updated: usize,
}

impl<'a> DebtModelBackup<'a> {
    pub fn new(
        storage: &'a Storage,
        plugins: &'a dyn DebtModelPluginRepository,
        rule_definitions: &'a dyn RuleDefinitionsLoader,
    ) -> Self {
        Self {
            storage,
            plugins,
            rule_definitions,
            default_plugin_key: DEFAULT_MODEL_PLUGIN.to_string(),
            default_unit: DurationUnit::default(),
        }
    }

    /// Take the default plugin and duration unit from the user settings
    pub fn with_settings(mut self, settings: &Settings) -> Self {
        self.default_plugin_key = settings.default_plugin_key.clone();
        self.default_unit = settings.default_duration_unit;
        self
    }

    /// Export the current model as XML
    ///
    /// Only rules of `language` are exported when a language is given.
    pub fn backup(&self, language: Option<&str>) -> DebtResult<String> {
        let session = self.storage.open_session()?;

        let characteristics = session.select_enabled_characteristics();
        let model = tree_model(&characteristics);

        let by_id: HashMap<CharacteristicId, &Characteristic> =
            characteristics.iter().map(|c| (c.id, c)).collect();

        let mut rules = session.select_enabled_and_non_manual_rules(language);
        rules.sort_by(|a, b| a.key.cmp(&b.key));

        let rule_debts: Vec<RuleDebt> = rules
            .iter()
            .filter_map(|rule| {
                let remediation = rule.effective_remediation()?;
                let sub = by_id.get(&remediation.sub_characteristic_id)?;
                Some(RuleDebt {
                    rule_key: rule.key.clone(),
                    sub_characteristic_key: sub.key.clone(),
                    function: remediation.function,
                    coefficient: remediation.coefficient,
                    offset: remediation.offset,
                })
            })
            .collect();

        tracing::info!(
            characteristics = characteristics.len(),
            rules = rule_debts.len(),
            "debt model backup"
        );
        Ok(export_xml(&model, &rule_debts))
    }

    /// Write a backup to a timestamped file of `dir`
    ///
    /// Returns the path to the created file.
    pub fn backup_to_file(&self, dir: &Path, language: Option<&str>) -> DebtResult<PathBuf> {
        fs::create_dir_all(dir)
            .map_err(|e| DebtError::Io(format!("Failed to create backup directory: {}", e)))?;

        let xml = self.backup(language)?;

        let now = Utc::now();
        let filename = format!(
            "debt-model-{}-{:03}.xml",
            now.format("%Y%m%d-%H%M%S"),
            now.timestamp_subsec_millis()
        );
        let path = dir.join(filename);

        fs::write(&path, xml)
            .map_err(|e| DebtError::Io(format!("Failed to write backup file: {}", e)))?;

        Ok(path)
    }

    /// Reset characteristics and rule remediation to what plugins declare
    ///
    /// Administrator overrides are cleared on every enabled rule.
    pub fn reset(&self) -> DebtResult<ResetResult> {
        let now = Utc::now();
        let model = self.load_plugin_model()?;

        let mut session = self.storage.open_session()?;
        let characteristics = self.restore_characteristics(&model, now, &mut session)?;

        let rules = session.select_enabled_and_non_manual_rules(None);
        let rules_updated = if rules.is_empty() {
            0
        } else {
            let definitions = self.rule_definitions.load()?;
            reset_rules(&characteristics, rules, &definitions, now, &mut session)?
        };

        session.commit(ChangeSource::Reset)?;

        tracing::info!(
            characteristics = characteristics.len(),
            rules = rules_updated,
            "debt model reset"
        );
        Ok(ResetResult {
            characteristics: characteristics.len(),
            rules_updated,
        })
    }

    /// The default plugin model, completed by the contributing plugins
    fn load_plugin_model(&self) -> DebtResult<DebtModel> {
        let xml = self.plugins.read_xml(&self.default_plugin_key)?;
        let mut model = import_characteristics(&xml)?;

        for plugin_key in self.plugins.contributing_plugins()? {
            if plugin_key == self.default_plugin_key {
                continue;
            }
            let contribution = import_characteristics(&self.plugins.read_xml(&plugin_key)?)?;
            tracing::debug!(plugin = %plugin_key, "merging contributed debt model");
            model.merge(&contribution);
        }

        Ok(model)
    }
}

/// Rebuild the tree model from enabled rows
///
/// Roots are sorted by order, rows without an order last. Subs whose root
/// is not enabled are left out.
fn tree_model(characteristics: &[Characteristic]) -> DebtModel {
    let mut roots: Vec<&Characteristic> = characteristics.iter().filter(|c| c.is_root()).collect();
    roots.sort_by_key(|c| (c.order.is_none(), c.order, c.id));

    let mut model = DebtModel::new();
    for root in roots {
        model.add_root_characteristic(DebtCharacteristic {
            key: root.key.clone(),
            name: root.name.clone(),
            order: root.order,
            parent_key: None,
        });
        for sub in characteristics
            .iter()
            .filter(|c| c.parent_id == Some(root.id))
        {
            model.add_sub_characteristic(DebtCharacteristic::sub(&sub.key, &sub.name, &root.key), &root.key);
        }
    }
    model
}

fn reset_rules(
    characteristics: &[Characteristic],
    rules: Vec<Rule>,
    definitions: &RulesDefinition,
    now: DateTime<Utc>,
    session: &mut StorageSession<'_>,
) -> DebtResult<usize> {
    let subs_by_key: HashMap<&str, &Characteristic> = characteristics
        .iter()
        .filter(|c| !c.is_root())
        .map(|c| (c.key.as_str(), c))
        .collect();

    let mut updated = 0;
    for mut rule in rules {
        // Custom rules carry the debt of the template they were created from
        let definition_key = match rule.template_id {
            Some(template_id) => session.select_rule_by_id(template_id).map(|t| t.key),
            None => Some(rule.key.clone()),
        };
        let definition = definition_key.as_ref().and_then(|key| definitions.rule(key));

        if definition.is_none() && !rule.has_default() && !rule.has_override() {
            continue;
        }

        let before = rule.clone();

        let declared = definition.and_then(|d| {
            let sub = subs_by_key.get(d.debt_sub_characteristic.as_deref()?)?;
            Some((sub.id, d.debt_remediation_function?))
        });
        match declared {
            Some((sub_id, function)) => {
                let function = function.remediation_function().map_err(|e| {
                    DebtError::Plugin(format!("Rule '{}': {}", rule.key, e))
                })?;
                rule.set_default(sub_id, &function);
            }
            None => rule.clear_default(),
        }
        rule.clear_override();

        if rule != before {
            rule.updated_at = Some(now);
            session.update_rule(rule)?;
            updated += 1;
        }
    }

    Ok(updated)
}
