//! Debt model restore
//!
//! Restoring reconciles the persisted characteristics with the tree of an
//! XML document, then replaces the override remediation of every enabled
//! rule with what the document declares for it. Everything happens in one
//! session; an invalid remediation function while applying the overrides
//! leaves storage untouched.

use std::collections::{HashMap, HashSet};

use chrono::{DateTime, Utc};

use crate::audit::ChangeSource;
use crate::error::{DebtError, DebtResult};
use crate::import::{import_characteristics, RulesImporter, ValidationMessages};
use crate::models::{
    Characteristic, CharacteristicId, DebtCharacteristic, DebtModel, RuleDebt, RuleKey,
};
use crate::storage::StorageSession;

use super::manager::DebtModelBackup;

impl DebtModelBackup<'_> {
    /// Restore characteristics and rule overrides from an XML document
    ///
    /// Malformed XML and an invalid tree shape are errors and nothing is
    /// written. Problems with individual entries are returned as messages.
    pub fn restore_from_xml(
        &self,
        xml: &str,
        language: Option<&str>,
    ) -> DebtResult<ValidationMessages> {
        let now = Utc::now();
        let model = import_characteristics(xml)?;

        let mut messages = ValidationMessages::new();
        let rule_debts = RulesImporter::new(self.default_unit).import_xml(xml, &mut messages)?;

        let mut session = self.storage.open_session()?;
        let characteristics = self.restore_characteristics(&model, now, &mut session)?;

        match restore_rules(
            &characteristics,
            rule_debts,
            language,
            now,
            &mut session,
            &mut messages,
        ) {
            Ok(()) => session.commit(ChangeSource::Restore)?,
            Err(e @ DebtError::InvalidRemediationFunction(_)) => {
                tracing::warn!(error = %e, "restore aborted, nothing was written");
                messages.add_error(e.to_string());
            }
            Err(e) => return Err(e),
        }

        tracing::info!(
            errors = messages.errors().len(),
            warnings = messages.warnings().len(),
            "debt model restore"
        );
        Ok(messages)
    }

    /// Reconcile persisted characteristics with `model`
    ///
    /// Unknown keys are inserted, known keys are updated when name, order,
    /// parent or enabled state differ, and enabled rows missing from the
    /// model are disabled. Root orders are renumbered from 1 following the
    /// declared orders, ties keeping document position. Returns the rows of
    /// the model, each root followed by its subs.
    pub fn restore_characteristics(
        &self,
        model: &DebtModel,
        now: DateTime<Utc>,
        session: &mut StorageSession<'_>,
    ) -> DebtResult<Vec<Characteristic>> {
        validate_tree(model)?;

        let existing: HashMap<String, Characteristic> = session
            .select_all_characteristics()
            .into_iter()
            .map(|c| (c.key.clone(), c))
            .collect();

        let root_orders = root_orders(model);
        let mut restored = Vec::new();
        for root in model.root_characteristics() {
            let order = root_orders.get(root.key.as_str()).copied();
            let root_row = restore_characteristic(root, order, None, &existing, now, session)?;
            let root_id = root_row.id;
            restored.push(root_row);

            for sub in model.sub_characteristics(&root.key) {
                restored.push(restore_characteristic(
                    sub,
                    None,
                    Some(root_id),
                    &existing,
                    now,
                    session,
                )?);
            }
        }

        let kept: HashSet<&str> = model.all_characteristics().map(|c| c.key.as_str()).collect();
        let mut stale: Vec<Characteristic> = existing
            .into_values()
            .filter(|c| c.enabled && !kept.contains(c.key.as_str()))
            .collect();
        stale.sort_by_key(|c| c.id);

        let disabled = stale.len();
        for mut characteristic in stale {
            characteristic.disable(now);
            session.update_characteristic(characteristic)?;
        }

        tracing::debug!(
            restored = restored.len(),
            disabled,
            "characteristics reconciled"
        );
        Ok(restored)
    }
}

/// Sequential orders of the roots, by declared order then by position
fn root_orders(model: &DebtModel) -> HashMap<&str, i32> {
    let mut roots: Vec<&DebtCharacteristic> = model.root_characteristics().iter().collect();
    roots.sort_by_key(|c| (c.order.is_none(), c.order));
    roots
        .into_iter()
        .zip(1..)
        .map(|(c, order)| (c.key.as_str(), order))
        .collect()
}

fn restore_characteristic(
    target: &DebtCharacteristic,
    order: Option<i32>,
    parent_id: Option<CharacteristicId>,
    existing: &HashMap<String, Characteristic>,
    now: DateTime<Utc>,
    session: &mut StorageSession<'_>,
) -> DebtResult<Characteristic> {
    let Some(current) = existing.get(&target.key) else {
        return Ok(session.insert_characteristic(Characteristic {
            id: CharacteristicId::new(0),
            key: target.key.clone(),
            name: target.name.clone(),
            order,
            parent_id,
            enabled: true,
            created_at: now,
            updated_at: None,
        }));
    };

    let mut characteristic = current.clone();
    characteristic.name = target.name.clone();
    characteristic.order = order;
    characteristic.parent_id = parent_id;
    characteristic.enabled = true;

    if characteristic != *current {
        characteristic.updated_at = Some(now);
        session.update_characteristic(characteristic.clone())?;
    }
    Ok(characteristic)
}

/// Reject trees that cannot be stored as root and sub levels
fn validate_tree(model: &DebtModel) -> DebtResult<()> {
    let mut seen = HashSet::new();
    for characteristic in model.all_characteristics() {
        if !seen.insert(characteristic.key.as_str()) {
            return Err(DebtError::Validation(format!(
                "Characteristic '{}' is declared more than once",
                characteristic.key
            )));
        }
    }

    for parent_key in model.parent_keys() {
        if model.root_characteristics().iter().any(|c| c.key == parent_key) {
            continue;
        }
        return Err(match model.characteristic_by_key(parent_key) {
            Some(_) => DebtError::Validation(format!(
                "Sub-characteristic '{}' cannot have sub-characteristics",
                parent_key
            )),
            None => DebtError::Validation(format!(
                "Parent characteristic '{}' does not exist",
                parent_key
            )),
        });
    }

    Ok(())
}

fn restore_rules(
    characteristics: &[Characteristic],
    mut rule_debts: Vec<RuleDebt>,
    language: Option<&str>,
    now: DateTime<Utc>,
    session: &mut StorageSession<'_>,
    messages: &mut ValidationMessages,
) -> DebtResult<()> {
    let subs_by_key: HashMap<&str, CharacteristicId> = characteristics
        .iter()
        .filter(|c| !c.is_root())
        .map(|c| (c.key.as_str(), c.id))
        .collect();

    let mut declared = HashSet::new();
    rule_debts.retain(|debt| {
        let first = declared.insert(debt.rule_key.clone());
        if !first {
            messages.add_warning(format!(
                "The rule '{}' is declared more than once, only its first declaration is restored.",
                debt.rule_key
            ));
        }
        first
    });

    for mut rule in session.select_enabled_and_non_manual_rules(language) {
        let before = rule.clone();

        match take_rule_debt(&mut rule_debts, &rule.key) {
            Some(debt) => match subs_by_key.get(debt.sub_characteristic_key.as_str()) {
                Some(&sub_id) => rule.set_override(sub_id, &debt.remediation_function()?),
                None => {
                    messages.add_warning(format!(
                        "The sub-characteristic '{}' of rule '{}' does not exist, its remediation is cleared.",
                        debt.sub_characteristic_key, rule.key
                    ));
                    rule.clear_override();
                }
            },
            None => rule.clear_override(),
        }

        if rule != before {
            rule.updated_at = Some(now);
            session.update_rule(rule)?;
        }
    }

    for debt in rule_debts {
        messages.add_warning(format!("The rule '{}' does not exist.", debt.rule_key));
    }

    Ok(())
}

/// Remove and return the declaration for `rule_key`
fn take_rule_debt(rule_debts: &mut Vec<RuleDebt>, rule_key: &RuleKey) -> Option<RuleDebt> {
    let position = rule_debts.iter().position(|d| d.rule_key == *rule_key)?;
    Some(rule_debts.remove(position))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::audit::{AuditLogger, Operation};
    use crate::backup::test_support::*;
    use crate::models::{Duration, FunctionType, RemediationFunction, Rule, RuleId};
    use crate::storage::Storage;
    use chrono::TimeZone;

    const MODEL: &str = r#"<sqale>
  <chc>
    <key>PORTABILITY</key>
    <name>Portability</name>
    <chc>
      <key>COMPILER</key>
      <name>Compiler</name>
      <chc>
        <rule-repo>squid</rule-repo>
        <rule-key>S1</rule-key>
        <prop><key>remediationFunction</key><txt>LINEAR_OFFSET</txt></prop>
        <prop><key>remediationFactor</key><val>2</val><txt>h</txt></prop>
        <prop><key>offset</key><val>15</val><txt>min</txt></prop>
      </chc>
    </chc>
    <chc>
      <key>HARDWARE</key>
      <name>Hardware</name>
    </chc>
  </chc>
  <chc>
    <key>USABILITY</key>
    <name>Usability</name>
  </chc>
</sqale>"#;

    fn backup<'a>(
        storage: &'a Storage,
        plugins: &'a TestPlugins,
        loader: &'a TestLoader,
    ) -> DebtModelBackup<'a> {
        DebtModelBackup::new(storage, plugins, loader)
    }

    #[test]
    fn test_restore_characteristics_into_empty_storage() {
        let (_temp, storage) = create_test_storage();
        let (plugins, loader) = (TestPlugins::default(), TestLoader::default());

        let messages = backup(&storage, &plugins, &loader)
            .restore_from_xml(MODEL, None)
            .unwrap();
        assert!(!messages.has_errors());
        assert_eq!(messages.warnings(), &["The rule 'squid:S1' does not exist.".to_string()]);

        let session = storage.open_session().unwrap();
        let portability = session.select_characteristic_by_key("PORTABILITY").unwrap();
        assert_eq!(portability.order, Some(1));
        assert!(portability.updated_at.is_none());

        let compiler = session.select_characteristic_by_key("COMPILER").unwrap();
        assert_eq!(compiler.parent_id, Some(portability.id));
        assert_eq!(compiler.order, None);
        assert!(compiler.enabled);

        assert_eq!(
            session.select_characteristic_by_key("USABILITY").unwrap().order,
            Some(2)
        );
        assert_eq!(session.select_characteristics_by_parent(portability.id).len(), 2);
    }

    #[test]
    fn test_empty_model_disables_existing_rows() {
        let (temp, storage) = create_test_storage();
        let mut session = storage.open_session().unwrap();
        let portability = session.insert_characteristic(root_row("PORTABILITY", "Portability", 1));
        session.insert_characteristic(sub_row("COMPILER", "Compiler", portability.id));
        session.commit(ChangeSource::Restore).unwrap();
        let logged_before = AuditLogger::new(temp.path().join("audit.log"))
            .read_all()
            .unwrap()
            .len();

        let (plugins, loader) = (TestPlugins::default(), TestLoader::default());
        let now = Utc::now();
        let mut session = storage.open_session().unwrap();
        let restored = backup(&storage, &plugins, &loader)
            .restore_characteristics(&DebtModel::new(), now, &mut session)
            .unwrap();
        session.commit(ChangeSource::Restore).unwrap();

        assert!(restored.is_empty());
        for characteristic in storage.characteristics.get_all().unwrap() {
            assert!(!characteristic.enabled);
            assert_eq!(characteristic.updated_at, Some(now));
        }

        let entries = AuditLogger::new(temp.path().join("audit.log"))
            .read_all()
            .unwrap();
        let operations: Vec<_> = entries[logged_before..].iter().map(|e| e.operation).collect();
        assert_eq!(operations, vec![Operation::Disable, Operation::Disable]);
    }

    #[test]
    fn test_existing_rows_are_updated_reenabled_and_reparented() {
        let (_temp, storage) = create_test_storage();
        let mut session = storage.open_session().unwrap();
        let usability = session.insert_characteristic(root_row("USABILITY", "Usability", 1));
        let mut hardware = session.insert_characteristic(sub_row("HARDWARE", "Old name", usability.id));
        hardware.enabled = false;
        session.update_characteristic(hardware.clone()).unwrap();
        let portability = session.insert_characteristic(root_row("PORTABILITY", "Portability", 7));
        session.commit(ChangeSource::Restore).unwrap();

        let (plugins, loader) = (TestPlugins::default(), TestLoader::default());
        backup(&storage, &plugins, &loader)
            .restore_from_xml(MODEL, None)
            .unwrap();

        let session = storage.open_session().unwrap();
        let restored_hardware = session.select_characteristic_by_id(hardware.id).unwrap();
        assert_eq!(restored_hardware.name, "Hardware");
        assert_eq!(restored_hardware.parent_id, Some(portability.id));
        assert!(restored_hardware.enabled);
        assert!(restored_hardware.updated_at.is_some());

        let restored_portability = session.select_characteristic_by_id(portability.id).unwrap();
        assert_eq!(restored_portability.order, Some(1));

        let restored_usability = session.select_characteristic_by_id(usability.id).unwrap();
        assert_eq!(restored_usability.order, Some(2));
        assert!(restored_usability.enabled);
    }

    #[test]
    fn test_unchanged_rows_are_not_written() {
        let (_temp, storage) = create_test_storage();
        let (plugins, loader) = (TestPlugins::default(), TestLoader::default());
        let model = import_characteristics(MODEL).unwrap();

        let mut session = storage.open_session().unwrap();
        backup(&storage, &plugins, &loader)
            .restore_characteristics(&model, Utc::now(), &mut session)
            .unwrap();
        session.commit(ChangeSource::Restore).unwrap();

        let mut session = storage.open_session().unwrap();
        let restored = backup(&storage, &plugins, &loader)
            .restore_characteristics(&model, Utc::now(), &mut session)
            .unwrap();

        assert_eq!(restored.len(), 4);
        assert!(!session.has_changes());
        assert!(restored.iter().all(|c| c.updated_at.is_none()));
    }

    #[test]
    fn test_root_orders_are_renumbered_sequentially() {
        let (_temp, storage) = create_test_storage();
        let (plugins, loader) = (TestPlugins::default(), TestLoader::default());
        // D has no order and takes its position, 4
        let xml = "<sqale>\
                   <chc><key>A</key><name>A</name><order>1</order></chc>\
                   <chc><key>B</key><name>B</name><order>1</order></chc>\
                   <chc><key>C</key><name>C</name><order>7</order></chc>\
                   <chc><key>D</key><name>D</name></chc>\
                   </sqale>";

        backup(&storage, &plugins, &loader)
            .restore_from_xml(xml, None)
            .unwrap();

        let mut orders: Vec<_> = storage
            .open_session()
            .unwrap()
            .select_enabled_characteristics()
            .into_iter()
            .map(|c| (c.key, c.order))
            .collect();
        orders.sort();
        assert_eq!(
            orders,
            vec![
                ("A".to_string(), Some(1)),
                ("B".to_string(), Some(2)),
                ("C".to_string(), Some(4)),
                ("D".to_string(), Some(3)),
            ]
        );
    }

    #[test]
    fn test_disabled_rows_missing_from_model_are_left_alone() {
        let (temp, storage) = create_test_storage();
        let disabled_at = Utc.with_ymd_and_hms(2023, 6, 1, 12, 0, 0).unwrap();
        let mut session = storage.open_session().unwrap();
        session.insert_characteristic(root_row("PORTABILITY", "Portability", 1));
        let mut obsolete = session.insert_characteristic(root_row("OBSOLETE", "Obsolete", 2));
        obsolete.disable(disabled_at);
        session.update_characteristic(obsolete.clone()).unwrap();
        session.commit(ChangeSource::Restore).unwrap();
        let logged_before = AuditLogger::new(temp.path().join("audit.log"))
            .read_all()
            .unwrap()
            .len();

        let (plugins, loader) = (TestPlugins::default(), TestLoader::default());
        backup(&storage, &plugins, &loader)
            .restore_from_xml(MODEL, None)
            .unwrap();

        let after = storage.characteristics.get(obsolete.id).unwrap().unwrap();
        assert_eq!(after, obsolete);
        assert_eq!(after.updated_at, Some(disabled_at));

        let entries = AuditLogger::new(temp.path().join("audit.log"))
            .read_all()
            .unwrap();
        assert!(entries.len() > logged_before);
        assert!(entries[logged_before..].iter().all(|e| e.key != "OBSOLETE"));
    }

    #[test]
    fn test_repeated_rule_entry_is_reported_as_duplicate() {
        let (_temp, storage) = create_test_storage();
        storage
            .rules
            .upsert(Rule::new(RuleId::new(1), RuleKey::of("squid", "S1")))
            .unwrap();
        let xml = "<sqale><chc><key>PORTABILITY</key><name>Portability</name>\
                   <chc><key>COMPILER</key><name>Compiler</name>\
                   <chc><rule-repo>squid</rule-repo><rule-key>S1</rule-key>\
                   <prop><key>remediationFunction</key><txt>LINEAR</txt></prop>\
                   <prop><key>remediationFactor</key><val>1</val><txt>h</txt></prop>\
                   </chc>\
                   <chc><rule-repo>squid</rule-repo><rule-key>S1</rule-key>\
                   <prop><key>remediationFunction</key><txt>LINEAR</txt></prop>\
                   <prop><key>remediationFactor</key><val>3</val><txt>d</txt></prop>\
                   </chc></chc></chc></sqale>";

        let (plugins, loader) = (TestPlugins::default(), TestLoader::default());
        let messages = backup(&storage, &plugins, &loader)
            .restore_from_xml(xml, None)
            .unwrap();

        assert_eq!(
            messages.warnings(),
            &["The rule 'squid:S1' is declared more than once, only its first declaration is restored."
                .to_string()]
        );
        let s1 = storage.rules.get(RuleId::new(1)).unwrap().unwrap();
        assert_eq!(s1.coefficient, Some(Duration::hours(1)));
    }

    #[test]
    fn test_sub_under_sub_is_rejected_before_any_write() {
        let (_temp, storage) = create_test_storage();
        let (plugins, loader) = (TestPlugins::default(), TestLoader::default());

        let mut model = DebtModel::new();
        model
            .add_root_characteristic(DebtCharacteristic::root("PORTABILITY", "Portability", 1))
            .add_sub_characteristic(
                DebtCharacteristic::sub("COMPILER", "Compiler", "PORTABILITY"),
                "PORTABILITY",
            )
            .add_sub_characteristic(
                DebtCharacteristic::sub("GCC", "Gcc", "COMPILER"),
                "COMPILER",
            );

        let mut session = storage.open_session().unwrap();
        let result = backup(&storage, &plugins, &loader).restore_characteristics(
            &model,
            Utc::now(),
            &mut session,
        );

        assert!(matches!(result, Err(DebtError::Validation(_))));
        assert!(!session.has_changes());
    }

    #[test]
    fn test_duplicate_key_is_rejected() {
        let (_temp, storage) = create_test_storage();
        let (plugins, loader) = (TestPlugins::default(), TestLoader::default());
        let xml = "<sqale><chc><key>A</key><name>A</name></chc>\
                   <chc><key>A</key><name>Again</name></chc></sqale>";

        let result = backup(&storage, &plugins, &loader).restore_from_xml(xml, None);

        assert!(matches!(result, Err(DebtError::Validation(_))));
        assert_eq!(storage.characteristics.count().unwrap(), 0);
    }

    #[test]
    fn test_malformed_xml_writes_nothing() {
        let (_temp, storage) = create_test_storage();
        let (plugins, loader) = (TestPlugins::default(), TestLoader::default());

        let result = backup(&storage, &plugins, &loader).restore_from_xml("<sqale><chc>", None);

        assert!(matches!(result, Err(DebtError::Xml(_))));
        assert_eq!(storage.characteristics.count().unwrap(), 0);
    }

    #[test]
    fn test_restore_sets_and_clears_overrides() {
        let (_temp, storage) = create_test_storage();
        let mut cleared = Rule::new(RuleId::new(2), RuleKey::of("squid", "S2"));
        cleared.set_override(
            CharacteristicId::new(40),
            &RemediationFunction::linear(Duration::days(1)),
        );
        storage
            .rules
            .upsert(Rule::new(RuleId::new(1), RuleKey::of("squid", "S1")))
            .unwrap();
        storage.rules.upsert(cleared).unwrap();

        let (plugins, loader) = (TestPlugins::default(), TestLoader::default());
        let messages = backup(&storage, &plugins, &loader)
            .restore_from_xml(MODEL, None)
            .unwrap();
        assert!(messages.is_empty());

        let compiler = storage
            .open_session()
            .unwrap()
            .select_characteristic_by_key("COMPILER")
            .unwrap();
        let s1 = storage.rules.get(RuleId::new(1)).unwrap().unwrap();
        assert_eq!(s1.sub_characteristic_id, Some(compiler.id));
        assert_eq!(s1.function, Some(FunctionType::LinearOffset));
        assert_eq!(s1.coefficient, Some(Duration::hours(2)));
        assert_eq!(s1.offset, Some(Duration::minutes(15)));
        assert!(s1.updated_at.is_some());

        let s2 = storage.rules.get(RuleId::new(2)).unwrap().unwrap();
        assert!(!s2.has_override());
    }

    #[test]
    fn test_unknown_rule_is_a_warning() {
        let (_temp, storage) = create_test_storage();
        let (plugins, loader) = (TestPlugins::default(), TestLoader::default());

        let messages = backup(&storage, &plugins, &loader)
            .restore_from_xml(MODEL, None)
            .unwrap();

        assert!(!messages.has_errors());
        assert_eq!(messages.warnings(), &["The rule 'squid:S1' does not exist.".to_string()]);
        assert!(storage.characteristics.count().unwrap() > 0);
    }

    #[test]
    fn test_language_filter_leaves_other_rules_alone() {
        let (_temp, storage) = create_test_storage();
        let mut python = Rule::new(RuleId::new(1), RuleKey::of("squid", "S1"));
        python.language = Some("py".to_string());
        storage.rules.upsert(python.clone()).unwrap();

        let (plugins, loader) = (TestPlugins::default(), TestLoader::default());
        let messages = backup(&storage, &plugins, &loader)
            .restore_from_xml(MODEL, Some("java"))
            .unwrap();

        assert_eq!(messages.warnings().len(), 1);
        assert_eq!(storage.rules.get(RuleId::new(1)).unwrap().unwrap(), python);
    }

    #[test]
    fn test_unknown_sub_characteristic_clears_override_with_warning() {
        let (_temp, storage) = create_test_storage();
        let mut rule = Rule::new(RuleId::new(1), RuleKey::of("squid", "S1"));
        rule.set_override(
            CharacteristicId::new(40),
            &RemediationFunction::linear(Duration::days(1)),
        );
        storage.rules.upsert(rule).unwrap();

        // GHOST is declared in the document but missing from the restored tree
        let xml = "<sqale><chc><key>USABILITY</key><name>Usability</name>\
                   <chc><key>GHOST</key><name>Ghost</name>\
                   <chc><rule-repo>squid</rule-repo><rule-key>S1</rule-key>\
                   <prop><key>remediationFunction</key><txt>LINEAR</txt></prop>\
                   <prop><key>remediationFactor</key><val>1</val><txt>h</txt></prop>\
                   </chc></chc></chc></sqale>";
        let mut model = DebtModel::new();
        model.add_root_characteristic(DebtCharacteristic::root("PORTABILITY", "Portability", 1));

        let (plugins, loader) = (TestPlugins::default(), TestLoader::default());
        let mut session = storage.open_session().unwrap();
        let characteristics = backup(&storage, &plugins, &loader)
            .restore_characteristics(&model, Utc::now(), &mut session)
            .unwrap();
        let mut messages = ValidationMessages::new();
        let debts = RulesImporter::default().import_xml(xml, &mut messages).unwrap();
        restore_rules(&characteristics, debts, None, Utc::now(), &mut session, &mut messages)
            .unwrap();
        session.commit(ChangeSource::Restore).unwrap();

        assert_eq!(messages.warnings().len(), 1);
        assert!(messages.warnings()[0].contains("GHOST"));
        assert!(!storage.rules.get(RuleId::new(1)).unwrap().unwrap().has_override());
    }

    #[test]
    fn test_invalid_function_rolls_back_everything() {
        let (temp, storage) = create_test_storage();
        storage
            .rules
            .upsert(Rule::new(RuleId::new(1), RuleKey::of("squid", "S1")))
            .unwrap();

        // LINEAR with an offset is not a valid combination
        let xml = "<sqale><chc><key>PORTABILITY</key><name>Portability</name>\
                   <chc><key>COMPILER</key><name>Compiler</name>\
                   <chc><rule-repo>squid</rule-repo><rule-key>S1</rule-key>\
                   <prop><key>remediationFunction</key><txt>LINEAR</txt></prop>\
                   <prop><key>remediationFactor</key><val>1</val><txt>h</txt></prop>\
                   <prop><key>offset</key><val>5</val><txt>min</txt></prop>\
                   </chc></chc></chc></sqale>";

        let (plugins, loader) = (TestPlugins::default(), TestLoader::default());
        let messages = backup(&storage, &plugins, &loader)
            .restore_from_xml(xml, None)
            .unwrap();

        assert_eq!(messages.errors().len(), 1);
        assert!(messages.errors()[0].contains("squid:S1"));
        assert_eq!(storage.characteristics.count().unwrap(), 0);
        assert!(!storage.rules.get(RuleId::new(1)).unwrap().unwrap().has_override());
        assert!(!temp.path().join("audit.log").exists());
    }

    #[test]
    fn test_restore_then_backup_round_trip() {
        let (_temp, storage) = create_test_storage();
        storage
            .rules
            .upsert(Rule::new(RuleId::new(1), RuleKey::of("squid", "S1")))
            .unwrap();

        let (plugins, loader) = (TestPlugins::default(), TestLoader::default());
        let backup = backup(&storage, &plugins, &loader);
        backup.restore_from_xml(MODEL, None).unwrap();
        let exported = backup.backup(None).unwrap();

        assert_eq!(
            import_characteristics(&exported).unwrap(),
            import_characteristics(MODEL).unwrap()
        );
        assert_eq!(import_rule_debts(&exported), import_rule_debts(MODEL));
    }
}
