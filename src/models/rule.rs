//! Rule model
//!
//! Rules are owned by the rule registry; the debt model only reads them and
//! sets or clears their remediation fields. Each rule carries two parallel
//! sets of remediation fields: the plugin-declared *default* and an
//! administrator *override*. The override wins when present.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::duration::Duration;
use super::ids::{CharacteristicId, RuleId};
use super::remediation::{FunctionType, RemediationFunction, RuleKey};

/// Repository key of manually created rules, which carry no remediation
pub const MANUAL_REPOSITORY_KEY: &str = "manual";

/// Lifecycle status of a rule
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum RuleStatus {
    #[default]
    Ready,
    Beta,
    Deprecated,
    Removed,
}

/// A persisted rule
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Rule {
    pub id: RuleId,

    pub key: RuleKey,

    #[serde(default)]
    pub name: String,

    /// Language the rule applies to, if any
    #[serde(default)]
    pub language: Option<String>,

    #[serde(default)]
    pub status: RuleStatus,

    /// Template this custom rule was instantiated from
    #[serde(default)]
    pub template_id: Option<RuleId>,

    // Plugin-declared remediation
    #[serde(default)]
    pub default_sub_characteristic_id: Option<CharacteristicId>,
    #[serde(default)]
    pub default_function: Option<FunctionType>,
    #[serde(default)]
    pub default_coefficient: Option<Duration>,
    #[serde(default)]
    pub default_offset: Option<Duration>,

    // Administrator override
    #[serde(default)]
    pub sub_characteristic_id: Option<CharacteristicId>,
    #[serde(default)]
    pub function: Option<FunctionType>,
    #[serde(default)]
    pub coefficient: Option<Duration>,
    #[serde(default)]
    pub offset: Option<Duration>,

    pub created_at: DateTime<Utc>,

    #[serde(default)]
    pub updated_at: Option<DateTime<Utc>>,
}

/// The remediation that applies to a rule once override and default are merged
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EffectiveRemediation {
    pub sub_characteristic_id: CharacteristicId,
    pub function: FunctionType,
    pub coefficient: Option<Duration>,
    pub offset: Option<Duration>,
}

impl Rule {
    /// Create a new rule with no remediation at all
    pub fn new(id: RuleId, key: RuleKey) -> Self {
        Self {
            id,
            name: key.rule.clone(),
            key,
            language: None,
            status: RuleStatus::Ready,
            template_id: None,
            default_sub_characteristic_id: None,
            default_function: None,
            default_coefficient: None,
            default_offset: None,
            sub_characteristic_id: None,
            function: None,
            coefficient: None,
            offset: None,
            created_at: Utc::now(),
            updated_at: None,
        }
    }

    pub fn is_enabled(&self) -> bool {
        self.status != RuleStatus::Removed
    }

    pub fn is_manual(&self) -> bool {
        self.key.repository == MANUAL_REPOSITORY_KEY
    }

    pub fn has_default(&self) -> bool {
        self.default_sub_characteristic_id.is_some() || self.default_function.is_some()
    }

    pub fn has_override(&self) -> bool {
        self.sub_characteristic_id.is_some()
            || self.function.is_some()
            || self.coefficient.is_some()
            || self.offset.is_some()
    }

    /// Resolve the remediation that applies: override if present, else default
    pub fn effective_remediation(&self) -> Option<EffectiveRemediation> {
        let sub_characteristic_id = self
            .sub_characteristic_id
            .or(self.default_sub_characteristic_id)?;

        let (function, coefficient, offset) = match self.function {
            Some(function) => (function, self.coefficient, self.offset),
            None => (
                self.default_function?,
                self.default_coefficient,
                self.default_offset,
            ),
        };

        Some(EffectiveRemediation {
            sub_characteristic_id,
            function,
            coefficient,
            offset,
        })
    }

    pub fn set_override(&mut self, sub_characteristic_id: CharacteristicId, function: &RemediationFunction) {
        self.sub_characteristic_id = Some(sub_characteristic_id);
        self.function = Some(function.function());
        self.coefficient = function.coefficient();
        self.offset = function.offset();
    }

    pub fn clear_override(&mut self) {
        self.sub_characteristic_id = None;
        self.function = None;
        self.coefficient = None;
        self.offset = None;
    }

    pub fn set_default(&mut self, sub_characteristic_id: CharacteristicId, function: &RemediationFunction) {
        self.default_sub_characteristic_id = Some(sub_characteristic_id);
        self.default_function = Some(function.function());
        self.default_coefficient = function.coefficient();
        self.default_offset = function.offset();
    }

    pub fn clear_default(&mut self) {
        self.default_sub_characteristic_id = None;
        self.default_function = None;
        self.default_coefficient = None;
        self.default_offset = None;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn rule() -> Rule {
        Rule::new(RuleId::new(1), RuleKey::of("squid", "S100"))
    }

    #[test]
    fn test_manual_and_enabled() {
        let mut r = rule();
        assert!(r.is_enabled());
        assert!(!r.is_manual());

        r.status = RuleStatus::Removed;
        assert!(!r.is_enabled());

        let manual = Rule::new(RuleId::new(2), RuleKey::of("manual", "Review"));
        assert!(manual.is_manual());
    }

    #[test]
    fn test_effective_uses_override_first() {
        let mut r = rule();
        r.set_default(
            CharacteristicId::new(2),
            &RemediationFunction::linear(Duration::hours(2)),
        );
        r.set_override(
            CharacteristicId::new(3),
            &RemediationFunction::constant_per_issue(Duration::minutes(10)),
        );

        let effective = r.effective_remediation().unwrap();
        assert_eq!(effective.sub_characteristic_id, CharacteristicId::new(3));
        assert_eq!(effective.function, FunctionType::ConstantIssue);
        assert_eq!(effective.coefficient, None);
        assert_eq!(effective.offset, Some(Duration::minutes(10)));
    }

    #[test]
    fn test_effective_falls_back_to_default() {
        let mut r = rule();
        r.set_default(
            CharacteristicId::new(2),
            &RemediationFunction::linear(Duration::hours(2)),
        );

        let effective = r.effective_remediation().unwrap();
        assert_eq!(effective.sub_characteristic_id, CharacteristicId::new(2));
        assert_eq!(effective.function, FunctionType::Linear);
        assert_eq!(effective.coefficient, Some(Duration::hours(2)));
    }

    #[test]
    fn test_no_remediation() {
        assert!(rule().effective_remediation().is_none());
        assert!(!rule().has_default());
        assert!(!rule().has_override());
    }

    #[test]
    fn test_clear_override() {
        let mut r = rule();
        r.set_override(
            CharacteristicId::new(3),
            &RemediationFunction::linear(Duration::hours(1)),
        );
        assert!(r.has_override());

        r.clear_override();
        assert!(!r.has_override());
    }

    #[test]
    fn test_deserialize_minimal_rule() {
        let json = r#"{
            "id": 4,
            "key": {"repository": "squid", "rule": "S200"},
            "created_at": "2024-01-01T00:00:00Z"
        }"#;
        let r: Rule = serde_json::from_str(json).unwrap();
        assert_eq!(r.id, RuleId::new(4));
        assert_eq!(r.status, RuleStatus::Ready);
        assert!(r.effective_remediation().is_none());
    }
}
