//! Field-level changes of characteristics and rules
//!
//! Parent and sub-characteristic references are logged by key. Callers pass
//! a lookup from id to key; ids the lookup does not know are logged as is.

use crate::models::{Characteristic, CharacteristicId, Rule};

use super::entry::FieldChange;

/// Fields of a characteristic that differ between `before` and `after`
///
/// `before` is `None` for a new row, which then reports every field it sets.
pub fn characteristic_changes<F>(
    before: Option<&Characteristic>,
    after: &Characteristic,
    key_of: F,
) -> Vec<FieldChange>
where
    F: Fn(CharacteristicId) -> Option<String>,
{
    let parent = |c: &Characteristic| {
        c.parent_id
            .map(|id| key_of(id).unwrap_or_else(|| id.to_string()))
    };

    let mut changes = Vec::new();
    push_change(
        &mut changes,
        "name",
        before.map(|c| c.name.clone()),
        Some(after.name.clone()),
    );
    push_change(
        &mut changes,
        "order",
        shown(before.and_then(|c| c.order)),
        shown(after.order),
    );
    push_change(&mut changes, "parent", before.and_then(parent), parent(after));
    // A new row counts as previously enabled
    let was_enabled = before.map_or(true, |c| c.enabled);
    if was_enabled != after.enabled {
        push_change(
            &mut changes,
            "enabled",
            Some(was_enabled.to_string()),
            Some(after.enabled.to_string()),
        );
    }
    changes
}

/// Remediation fields of a rule that differ between `before` and `after`
pub fn rule_changes<F>(before: &Rule, after: &Rule, key_of: F) -> Vec<FieldChange>
where
    F: Fn(CharacteristicId) -> Option<String>,
{
    let sub = |id: Option<CharacteristicId>| {
        id.map(|id| key_of(id).unwrap_or_else(|| id.to_string()))
    };

    let mut changes = Vec::new();
    push_change(
        &mut changes,
        "default_sub_characteristic",
        sub(before.default_sub_characteristic_id),
        sub(after.default_sub_characteristic_id),
    );
    push_change(
        &mut changes,
        "default_function",
        shown(before.default_function),
        shown(after.default_function),
    );
    push_change(
        &mut changes,
        "default_coefficient",
        shown(before.default_coefficient),
        shown(after.default_coefficient),
    );
    push_change(
        &mut changes,
        "default_offset",
        shown(before.default_offset),
        shown(after.default_offset),
    );
    push_change(
        &mut changes,
        "sub_characteristic",
        sub(before.sub_characteristic_id),
        sub(after.sub_characteristic_id),
    );
    push_change(
        &mut changes,
        "function",
        shown(before.function),
        shown(after.function),
    );
    push_change(
        &mut changes,
        "coefficient",
        shown(before.coefficient),
        shown(after.coefficient),
    );
    push_change(&mut changes, "offset", shown(before.offset), shown(after.offset));
    changes
}

fn shown<T: ToString>(value: Option<T>) -> Option<String> {
    value.map(|v| v.to_string())
}

fn push_change(
    changes: &mut Vec<FieldChange>,
    field: &str,
    from: Option<String>,
    to: Option<String>,
) {
    if from != to {
        changes.push(FieldChange::new(field, from, to));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{Duration, FunctionType, RemediationFunction, RuleId, RuleKey};
    use chrono::Utc;

    fn characteristic(key: &str, order: Option<i32>, parent: Option<i64>) -> Characteristic {
        Characteristic {
            id: CharacteristicId::new(5),
            key: key.to_string(),
            name: key.to_lowercase(),
            order,
            parent_id: parent.map(CharacteristicId::new),
            enabled: true,
            created_at: Utc::now(),
            updated_at: None,
        }
    }

    fn key_of(id: CharacteristicId) -> Option<String> {
        (id == CharacteristicId::new(1)).then(|| "PORTABILITY".to_string())
    }

    #[test]
    fn test_new_characteristic_reports_what_it_sets() {
        let compiler = characteristic("COMPILER", None, Some(1));

        let changes = characteristic_changes(None, &compiler, key_of);

        assert_eq!(
            changes,
            vec![
                FieldChange::new("name", None, Some("compiler".to_string())),
                FieldChange::new("parent", None, Some("PORTABILITY".to_string())),
            ]
        );
    }

    #[test]
    fn test_reparent_and_disable() {
        let before = characteristic("COMPILER", None, Some(1));
        let mut after = characteristic("COMPILER", None, Some(9));
        after.enabled = false;

        let changes = characteristic_changes(Some(&before), &after, key_of);

        assert_eq!(
            changes,
            vec![
                FieldChange::new(
                    "parent",
                    Some("PORTABILITY".to_string()),
                    Some("chc-9".to_string())
                ),
                FieldChange::new("enabled", Some("true".to_string()), Some("false".to_string())),
            ]
        );
    }

    #[test]
    fn test_unchanged_characteristic_has_no_changes() {
        let row = characteristic("PORTABILITY", Some(1), None);
        assert!(characteristic_changes(Some(&row), &row, key_of).is_empty());
    }

    #[test]
    fn test_rule_override_changes() {
        let before = Rule::new(RuleId::new(1), RuleKey::of("squid", "S1"));
        let mut after = before.clone();
        after.set_override(
            CharacteristicId::new(1),
            &RemediationFunction::linear(Duration::hours(2)),
        );

        let changes = rule_changes(&before, &after, key_of);

        let fields: Vec<_> = changes.iter().map(|c| c.field.as_str()).collect();
        assert_eq!(fields, vec!["sub_characteristic", "function", "coefficient"]);
        assert_eq!(changes[0].to.as_deref(), Some("PORTABILITY"));
        assert_eq!(
            changes[1].to.as_deref(),
            Some(FunctionType::Linear.to_string().as_str())
        );
        assert_eq!(changes[2].to.as_deref(), Some("2h"));
    }
}
