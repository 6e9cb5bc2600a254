//! Storage session
//!
//! A session works on a snapshot of both repositories taken when it is
//! opened. Writes are staged in the snapshot and only reach the
//! repositories, the data files and the audit log on [`StorageSession::commit`].
//! Dropping a session without committing discards everything it staged.

use std::collections::BTreeMap;

use chrono::Utc;

use crate::audit::{
    characteristic_changes, rule_changes, AuditEntry, ChangeSource, EntityType, FieldChange,
    Operation,
};
use crate::error::{DebtError, DebtResult};
use crate::models::{Characteristic, CharacteristicId, Rule, RuleId};

use super::Storage;

/// A unit of work over characteristics and rules
pub struct StorageSession<'a> {
    storage: &'a Storage,
    characteristics: BTreeMap<CharacteristicId, Characteristic>,
    rules: BTreeMap<RuleId, Rule>,
    staged: Vec<StagedChange>,
    committed: bool,
}

/// A write waiting for the commit that gives it a source and timestamp
struct StagedChange {
    operation: Operation,
    entity_type: EntityType,
    key: String,
    changes: Vec<FieldChange>,
}

impl<'a> StorageSession<'a> {
    pub(super) fn open(storage: &'a Storage) -> DebtResult<Self> {
        let characteristics = storage
            .characteristics
            .get_all()?
            .into_iter()
            .map(|c| (c.id, c))
            .collect();
        let rules = storage
            .rules
            .get_all()?
            .into_iter()
            .map(|r| (r.id, r))
            .collect();

        Ok(Self {
            storage,
            characteristics,
            rules,
            staged: Vec::new(),
            committed: false,
        })
    }

    // === Characteristics ===

    /// All characteristics, enabled or not, ordered by ID
    pub fn select_all_characteristics(&self) -> Vec<Characteristic> {
        self.characteristics.values().cloned().collect()
    }

    /// Enabled characteristics, ordered by ID
    pub fn select_enabled_characteristics(&self) -> Vec<Characteristic> {
        self.characteristics
            .values()
            .filter(|c| c.enabled)
            .cloned()
            .collect()
    }

    pub fn select_characteristic_by_id(&self, id: CharacteristicId) -> Option<Characteristic> {
        self.characteristics.get(&id).cloned()
    }

    pub fn select_characteristic_by_key(&self, key: &str) -> Option<Characteristic> {
        self.characteristics.values().find(|c| c.key == key).cloned()
    }

    /// Children of `parent_id`, enabled or not
    pub fn select_characteristics_by_parent(
        &self,
        parent_id: CharacteristicId,
    ) -> Vec<Characteristic> {
        self.characteristics
            .values()
            .filter(|c| c.parent_id == Some(parent_id))
            .cloned()
            .collect()
    }

    /// Stage a new characteristic, assigning it the next free ID
    pub fn insert_characteristic(&mut self, mut characteristic: Characteristic) -> Characteristic {
        characteristic.id = self
            .characteristics
            .keys()
            .next_back()
            .map_or(CharacteristicId::new(1), CharacteristicId::next);

        let changes = characteristic_changes(None, &characteristic, |id| self.key_of(id));
        self.staged.push(StagedChange {
            operation: Operation::Create,
            entity_type: EntityType::Characteristic,
            key: characteristic.key.clone(),
            changes,
        });
        tracing::debug!(key = %characteristic.key, id = %characteristic.id, "insert characteristic");

        self.characteristics
            .insert(characteristic.id, characteristic.clone());
        characteristic
    }

    /// Stage an update of an existing characteristic
    pub fn update_characteristic(&mut self, characteristic: Characteristic) -> DebtResult<()> {
        let before = self
            .characteristics
            .get(&characteristic.id)
            .ok_or_else(|| DebtError::characteristic_not_found(characteristic.id.to_string()))?;

        if *before == characteristic {
            return Ok(());
        }

        let operation = if before.enabled && !characteristic.enabled {
            Operation::Disable
        } else {
            Operation::Update
        };
        let changes = characteristic_changes(Some(before), &characteristic, |id| self.key_of(id));
        self.staged.push(StagedChange {
            operation,
            entity_type: EntityType::Characteristic,
            key: characteristic.key.clone(),
            changes,
        });
        tracing::debug!(key = %characteristic.key, id = %characteristic.id, "update characteristic");

        self.characteristics
            .insert(characteristic.id, characteristic);
        Ok(())
    }

    // === Rules ===

    /// Enabled rules outside the manual repository, optionally for one language
    pub fn select_enabled_and_non_manual_rules(&self, language: Option<&str>) -> Vec<Rule> {
        self.rules
            .values()
            .filter(|r| r.is_enabled() && !r.is_manual())
            .filter(|r| language.map_or(true, |l| r.language.as_deref() == Some(l)))
            .cloned()
            .collect()
    }

    pub fn select_rule_by_id(&self, id: RuleId) -> Option<Rule> {
        self.rules.get(&id).cloned()
    }

    /// Stage an update of an existing rule
    pub fn update_rule(&mut self, rule: Rule) -> DebtResult<()> {
        let before = self
            .rules
            .get(&rule.id)
            .ok_or_else(|| DebtError::rule_not_found(rule.key.to_string()))?;

        if *before == rule {
            return Ok(());
        }

        let changes = rule_changes(before, &rule, |id| self.key_of(id));
        self.staged.push(StagedChange {
            operation: Operation::Update,
            entity_type: EntityType::Rule,
            key: rule.key.to_string(),
            changes,
        });
        tracing::debug!(rule = %rule.key, "update rule");

        self.rules.insert(rule.id, rule);
        Ok(())
    }

    /// Whether anything has been staged
    pub fn has_changes(&self) -> bool {
        !self.staged.is_empty()
    }

    /// Publish staged writes, save the data files and log the changes
    ///
    /// Every audit entry of the commit carries `source` and the same
    /// timestamp. A session without changes commits without touching the
    /// disk.
    pub fn commit(mut self, source: ChangeSource) -> DebtResult<()> {
        self.committed = true;
        if !self.has_changes() {
            return Ok(());
        }

        let characteristics = std::mem::take(&mut self.characteristics);
        let rules = std::mem::take(&mut self.rules);
        let timestamp = Utc::now();
        let entries: Vec<AuditEntry> = std::mem::take(&mut self.staged)
            .into_iter()
            .map(|staged| AuditEntry {
                timestamp,
                source,
                operation: staged.operation,
                entity_type: staged.entity_type,
                key: staged.key,
                changes: staged.changes,
            })
            .collect();

        self.storage
            .characteristics
            .replace_all(characteristics.into_values())?;
        self.storage.rules.replace_all(rules.into_values())?;
        self.storage.save_all()?;
        self.storage.append_audit(&entries)?;

        tracing::debug!(%source, changes = entries.len(), "session committed");
        Ok(())
    }

    fn key_of(&self, id: CharacteristicId) -> Option<String> {
        self.characteristics.get(&id).map(|c| c.key.clone())
    }
}

impl Drop for StorageSession<'_> {
    fn drop(&mut self) {
        if !self.committed && self.has_changes() {
            tracing::debug!(
                changes = self.staged.len(),
                "session dropped, discarding staged changes"
            );
        }
    }
}
