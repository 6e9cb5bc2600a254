//! Debt model XML export
//!
//! Produces the canonical document exchanged between installations:
//! two-space indentation, one element per line, platform line separator.
//! Root characteristics are sorted by order, sub-characteristics by name,
//! and rule entries are nested in their sub-characteristic.

use std::collections::HashSet;

use crate::import::document::{
    CHARACTERISTIC, CHARACTERISTIC_KEY, CHARACTERISTIC_NAME, PROPERTY, PROPERTY_COEFFICIENT,
    PROPERTY_FUNCTION, PROPERTY_KEY, PROPERTY_OFFSET, PROPERTY_TEXT_VALUE, PROPERTY_VALUE,
    REPOSITORY_KEY, ROOT, RULE_KEY,
};
use crate::models::{DebtCharacteristic, DebtModel, Duration, RuleDebt};

/// Native line separator of the platform
#[cfg(windows)]
pub const LINE_SEPARATOR: &str = "\r\n";
/// Native line separator of the platform
#[cfg(not(windows))]
pub const LINE_SEPARATOR: &str = "\n";

const INDENT: &str = "  ";

/// Serialize a characteristic tree and its rule declarations
///
/// Rules are written inside their sub-characteristic; a rule attached to
/// anything else cannot be written and is logged as a warning.
pub fn export_xml(model: &DebtModel, rules: &[RuleDebt]) -> String {
    for rule in rules_outside_subs(model, rules) {
        tracing::warn!(
            rule = %rule.rule_key,
            characteristic = %rule.sub_characteristic_key,
            "rule left out of the backup, it is not attached to a sub-characteristic"
        );
    }

    let mut roots: Vec<&DebtCharacteristic> = model.root_characteristics().iter().collect();
    if roots.is_empty() {
        return format!("<{}/>{}", ROOT, LINE_SEPARATOR);
    }
    // Stable: roots without an order keep their relative position, last
    roots.sort_by_key(|root| (root.order.is_none(), root.order));

    let mut writer = XmlWriter::default();
    writer.open(ROOT);

    for root in roots {
        writer.open(CHARACTERISTIC);
        writer.text_element(CHARACTERISTIC_KEY, &root.key);
        writer.text_element(CHARACTERISTIC_NAME, &root.name);

        let mut subs: Vec<&DebtCharacteristic> = model.sub_characteristics(&root.key).iter().collect();
        subs.sort_by(|a, b| a.name.cmp(&b.name));

        for sub in subs {
            writer.open(CHARACTERISTIC);
            writer.text_element(CHARACTERISTIC_KEY, &sub.key);
            writer.text_element(CHARACTERISTIC_NAME, &sub.name);

            for rule in rules.iter().filter(|r| r.sub_characteristic_key == sub.key) {
                write_rule(&mut writer, rule);
            }

            writer.close(CHARACTERISTIC);
        }

        writer.close(CHARACTERISTIC);
    }

    writer.close(ROOT);
    writer.finish()
}

/// Rules whose characteristic is not a sub-characteristic of `model`
fn rules_outside_subs<'a>(model: &DebtModel, rules: &'a [RuleDebt]) -> Vec<&'a RuleDebt> {
    let subs: HashSet<&str> = model
        .root_characteristics()
        .iter()
        .flat_map(|root| model.sub_characteristics(&root.key))
        .map(|sub| sub.key.as_str())
        .collect();

    rules
        .iter()
        .filter(|rule| !subs.contains(rule.sub_characteristic_key.as_str()))
        .collect()
}

fn write_rule(writer: &mut XmlWriter, rule: &RuleDebt) {
    writer.open(CHARACTERISTIC);
    writer.text_element(REPOSITORY_KEY, &rule.rule_key.repository);
    writer.text_element(RULE_KEY, &rule.rule_key.rule);

    writer.open(PROPERTY);
    writer.text_element(PROPERTY_KEY, PROPERTY_FUNCTION);
    writer.text_element(PROPERTY_TEXT_VALUE, rule.function.as_str());
    writer.close(PROPERTY);

    if let Some(coefficient) = rule.coefficient {
        write_duration(writer, PROPERTY_COEFFICIENT, coefficient);
    }
    if let Some(offset) = rule.offset {
        write_duration(writer, PROPERTY_OFFSET, offset);
    }

    writer.close(CHARACTERISTIC);
}

fn write_duration(writer: &mut XmlWriter, key: &str, duration: Duration) {
    writer.open(PROPERTY);
    writer.text_element(PROPERTY_KEY, key);
    writer.text_element(PROPERTY_VALUE, &duration.value().to_string());
    writer.text_element(PROPERTY_TEXT_VALUE, duration.unit().as_str());
    writer.close(PROPERTY);
}

/// Minimal pretty-printing element writer
#[derive(Default)]
struct XmlWriter {
    buffer: String,
    depth: usize,
}

impl XmlWriter {
    fn open(&mut self, tag: &str) {
        self.indent();
        self.buffer.push('<');
        self.buffer.push_str(tag);
        self.buffer.push('>');
        self.buffer.push_str(LINE_SEPARATOR);
        self.depth += 1;
    }

    fn close(&mut self, tag: &str) {
        self.depth = self.depth.saturating_sub(1);
        self.indent();
        self.buffer.push_str("</");
        self.buffer.push_str(tag);
        self.buffer.push('>');
        self.buffer.push_str(LINE_SEPARATOR);
    }

    fn text_element(&mut self, tag: &str, text: &str) {
        self.indent();
        if text.is_empty() {
            self.buffer.push_str(&format!("<{}/>", tag));
        } else {
            self.buffer
                .push_str(&format!("<{tag}>{}</{tag}>", escape(text), tag = tag));
        }
        self.buffer.push_str(LINE_SEPARATOR);
    }

    fn indent(&mut self) {
        for _ in 0..self.depth {
            self.buffer.push_str(INDENT);
        }
    }

    fn finish(self) -> String {
        self.buffer
    }
}

fn escape(text: &str) -> String {
    let mut escaped = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            _ => escaped.push(c),
        }
    }
    escaped
}
