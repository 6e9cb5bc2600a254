//! Audit log entries
//!
//! An entry records one write to a characteristic or a rule, keyed by the
//! characteristic key or rule key rather than by storage id. Entries from
//! the same session share a timestamp and a [`ChangeSource`].

use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// What a change did to its row
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Operation {
    Create,
    Update,
    /// The row left the model; rows are never deleted
    Disable,
}

impl fmt::Display for Operation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            Operation::Create => "CREATE",
            Operation::Update => "UPDATE",
            Operation::Disable => "DISABLE",
        };
        f.write_str(label)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EntityType {
    Characteristic,
    Rule,
}

impl fmt::Display for EntityType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            EntityType::Characteristic => f.write_str("Characteristic"),
            EntityType::Rule => f.write_str("Rule"),
        }
    }
}

/// The command whose session produced a change
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ChangeSource {
    /// Restore from an XML backup
    Restore,
    /// Reset to the plugin-declared model
    Reset,
    /// Characteristic rename
    Rename,
    /// Root characteristic move up or down
    Reorder,
}

impl fmt::Display for ChangeSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            ChangeSource::Restore => "restore",
            ChangeSource::Reset => "reset",
            ChangeSource::Rename => "rename",
            ChangeSource::Reorder => "reorder",
        };
        f.write_str(label)
    }
}

/// One field of a row before and after a change; `None` means unset
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FieldChange {
    pub field: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub from: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub to: Option<String>,
}

impl FieldChange {
    pub fn new(field: impl Into<String>, from: Option<String>, to: Option<String>) -> Self {
        Self {
            field: field.into(),
            from,
            to,
        }
    }
}

impl fmt::Display for FieldChange {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}: {} -> {}",
            self.field,
            self.from.as_deref().unwrap_or("-"),
            self.to.as_deref().unwrap_or("-")
        )
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AuditEntry {
    /// Commit time of the session that made the change
    pub timestamp: DateTime<Utc>,

    pub source: ChangeSource,

    pub operation: Operation,

    pub entity_type: EntityType,

    /// Characteristic key or rule key (`repository:rule`)
    pub key: String,

    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub changes: Vec<FieldChange>,
}

impl AuditEntry {
    /// One line per entry, followed by an indented line of changed fields
    pub fn format_human_readable(&self) -> String {
        let mut output = format!(
            "[{}] {} {} {} {}",
            self.timestamp.format("%Y-%m-%d %H:%M:%S UTC"),
            self.source,
            self.operation,
            self.entity_type,
            self.key
        );

        if !self.changes.is_empty() {
            let changes: Vec<String> = self.changes.iter().map(ToString::to_string).collect();
            output.push_str("\n  ");
            output.push_str(&changes.join(", "));
        }

        output
    }
}
