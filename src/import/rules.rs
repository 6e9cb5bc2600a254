//! Rules importer
//!
//! Reads per-rule remediation declarations out of a debt model document.
//! Rule entries are innermost `<chc>` elements carrying a `<rule-repo>`,
//! nested under the sub-characteristic they belong to:
//!
//! ```xml
//! <sqale>
//!   <chc>
//!     <key>USABILITY</key>
//!     <chc>
//!       <key>ERRORS</key>
//!       <chc>
//!         <rule-repo>checkstyle</rule-repo>
//!         <rule-key>Regexp</rule-key>
//!         <prop><key>remediationFunction</key><txt>LINEAR</txt></prop>
//!         <prop><key>remediationFactor</key><val>3.0</val><txt>h</txt></prop>
//!       </chc>
//!     </chc>
//!   </chc>
//! </sqale>
//! ```
//!
//! Problems with individual entries never abort the import; they are
//! recorded in the [`ValidationMessages`] and the entry is dropped or
//! converted.

use roxmltree::Node;

use super::document::{
    child_elements, child_text, has_child, parse_document, CHARACTERISTIC, CHARACTERISTIC_KEY,
    CHARACTERISTIC_NAME, PROPERTY, PROPERTY_COEFFICIENT, PROPERTY_FUNCTION, PROPERTY_KEY,
    PROPERTY_OFFSET, PROPERTY_TEXT_VALUE, PROPERTY_VALUE, REPOSITORY_KEY, RULE_KEY,
};
use super::legacy::{convert_characteristic_key, convert_function, key_from_name, FunctionConversion};
use super::messages::ValidationMessages;
use crate::error::DebtResult;
use crate::models::{Duration, DurationUnit, RuleDebt, RuleKey};

/// Imports rule remediation declarations
#[derive(Debug, Clone, Copy, Default)]
pub struct RulesImporter {
    /// Unit given to durations declared without one
    default_unit: DurationUnit,
}

/// Properties read from the `<prop>` elements of one rule entry
#[derive(Debug, Default)]
struct RuleProperties {
    function: Option<String>,
    coefficient: Option<Duration>,
    offset: Option<Duration>,
    invalid: bool,
}

impl RulesImporter {
    pub fn new(default_unit: DurationUnit) -> Self {
        Self { default_unit }
    }

    /// Import every valid rule declaration of `xml`
    ///
    /// Only malformed XML is an error; everything else ends up in `messages`.
    pub fn import_xml(
        &self,
        xml: &str,
        messages: &mut ValidationMessages,
    ) -> DebtResult<Vec<RuleDebt>> {
        let document = parse_document(xml)?;
        let mut rule_debts = Vec::new();

        for root_node in child_elements(document.root_element(), CHARACTERISTIC) {
            for node in child_elements(root_node, CHARACTERISTIC) {
                if has_child(node, REPOSITORY_KEY) {
                    if let Some(rule_key) = read_rule_key(node) {
                        messages.add_warning(format!(
                            "Rule '{}' is ignored because it is defined directly under a root characteristic",
                            rule_key
                        ));
                    }
                    continue;
                }

                let sub_characteristic_key = characteristic_key(node);
                for rule_node in child_elements(node, CHARACTERISTIC) {
                    if !has_child(rule_node, REPOSITORY_KEY) {
                        continue;
                    }
                    let Some(rule_key) = read_rule_key(rule_node) else {
                        continue;
                    };
                    let Some(sub_characteristic_key) = sub_characteristic_key.clone() else {
                        messages.add_warning(format!(
                            "Rule '{}' is ignored because its sub-characteristic has no key",
                            rule_key
                        ));
                        continue;
                    };

                    if let Some(rule_debt) =
                        self.read_rule(rule_node, rule_key, sub_characteristic_key, messages)
                    {
                        rule_debts.push(rule_debt);
                    }
                }
            }
        }

        tracing::debug!(rules = rule_debts.len(), "imported rule debts");
        Ok(rule_debts)
    }

    fn read_rule(
        &self,
        node: Node<'_, '_>,
        rule_key: RuleKey,
        sub_characteristic_key: String,
        messages: &mut ValidationMessages,
    ) -> Option<RuleDebt> {
        let properties = self.read_properties(node, &rule_key, messages);
        if properties.invalid {
            return None;
        }
        let token = properties.function?;

        let (function, coefficient, offset) =
            match convert_function(&token, properties.coefficient, properties.offset) {
                FunctionConversion::Kept {
                    function,
                    coefficient,
                    offset,
                } => (function, coefficient, offset),
                FunctionConversion::Converted {
                    function,
                    coefficient,
                    offset,
                    reason,
                } => {
                    messages.add_warning(format!("Rule '{}': {}", rule_key, reason));
                    (function, coefficient, offset)
                }
                FunctionConversion::Unsupported { reason } => {
                    messages.add_warning(format!("Rule '{}': {}", rule_key, reason));
                    return None;
                }
                FunctionConversion::Unknown => {
                    messages.add_error(format!(
                        "Rule '{}': unknown remediation function '{}'",
                        rule_key, token
                    ));
                    return None;
                }
            };

        Some(RuleDebt {
            rule_key,
            sub_characteristic_key,
            function,
            coefficient,
            offset,
        })
    }

    fn read_properties(
        &self,
        node: Node<'_, '_>,
        rule_key: &RuleKey,
        messages: &mut ValidationMessages,
    ) -> RuleProperties {
        let mut properties = RuleProperties::default();

        for prop in child_elements(node, PROPERTY) {
            let Some(key) = child_text(prop, PROPERTY_KEY) else {
                continue;
            };
            let value = child_text(prop, PROPERTY_VALUE);
            let text = child_text(prop, PROPERTY_TEXT_VALUE);

            match key.as_str() {
                PROPERTY_FUNCTION => properties.function = text,
                PROPERTY_COEFFICIENT | PROPERTY_OFFSET => {
                    match self.to_duration(value.as_deref(), text.as_deref()) {
                        Ok(duration) if key == PROPERTY_COEFFICIENT => {
                            properties.coefficient = Some(duration)
                        }
                        Ok(duration) => properties.offset = Some(duration),
                        Err(reason) => {
                            messages.add_error(format!(
                                "Rule '{}': cannot import {}, {}",
                                rule_key, key, reason
                            ));
                            properties.invalid = true;
                        }
                    }
                }
                _ => {}
            }
        }

        properties
    }

    /// Normalize a `<val>`/`<txt>` pair into a duration
    ///
    /// The value may carry a fractional part, which is truncated. A missing
    /// unit falls back to the importer's default unit.
    fn to_duration(&self, value: Option<&str>, unit: Option<&str>) -> Result<Duration, String> {
        let value = value.ok_or_else(|| "a numeric value is expected".to_string())?;
        let number = value
            .parse::<f64>()
            .ok()
            .filter(|n| n.is_finite() && *n >= 0.0 && *n <= f64::from(u32::MAX))
            .ok_or_else(|| format!("'{}' is not a valid numeric value", value))?;

        let unit = match unit {
            Some(token) => DurationUnit::parse(token)
                .ok_or_else(|| format!("'{}' is not a valid duration unit", token))?,
            None => self.default_unit,
        };

        Ok(Duration::new(number.trunc() as u32, unit))
    }
}

fn read_rule_key(node: Node<'_, '_>) -> Option<RuleKey> {
    let repository = child_text(node, REPOSITORY_KEY)?;
    let rule = child_text(node, RULE_KEY)?;
    Some(RuleKey::of(repository, rule))
}

fn characteristic_key(node: Node<'_, '_>) -> Option<String> {
    child_text(node, CHARACTERISTIC_KEY)
        .or_else(|| child_text(node, CHARACTERISTIC_NAME).map(|name| key_from_name(&name)))
        .map(|key| convert_characteristic_key(&key))
}
