//! Characteristic models
//!
//! Characteristics form a two-level tree: root characteristics (e.g.
//! "Portability") ordered by `order`, and sub-characteristics nested one
//! level below a root. Remediation declarations always attach to a
//! sub-characteristic.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

use super::ids::CharacteristicId;

/// A persisted characteristic row
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Characteristic {
    /// Assigned by storage on insert
    pub id: CharacteristicId,

    /// Stable upper-snake key
    pub key: String,

    pub name: String,

    /// Display order, only set on root characteristics
    pub order: Option<i32>,

    /// Parent root, `None` for root characteristics
    pub parent_id: Option<CharacteristicId>,

    /// Soft-delete flag
    pub enabled: bool,

    pub created_at: DateTime<Utc>,

    /// `None` until the first modification after creation
    pub updated_at: Option<DateTime<Utc>>,
}

impl Characteristic {
    pub fn is_root(&self) -> bool {
        self.parent_id.is_none()
    }

    /// Mark the characteristic as disabled
    ///
    /// Returns `false` without touching anything when it was already disabled.
    pub fn disable(&mut self, now: DateTime<Utc>) -> bool {
        if !self.enabled {
            return false;
        }
        self.enabled = false;
        self.updated_at = Some(now);
        true
    }
}

impl fmt::Display for Characteristic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ({})", self.name, self.key)
    }
}

/// A characteristic as carried by a [`DebtModel`](super::DebtModel)
///
/// This is the transient, XML-side shape: no id, no timestamps.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DebtCharacteristic {
    pub key: String,
    pub name: String,
    pub order: Option<i32>,
    pub parent_key: Option<String>,
}

impl DebtCharacteristic {
    pub fn root(key: impl Into<String>, name: impl Into<String>, order: i32) -> Self {
        Self {
            key: key.into(),
            name: name.into(),
            order: Some(order),
            parent_key: None,
        }
    }

    pub fn sub(
        key: impl Into<String>,
        name: impl Into<String>,
        parent_key: impl Into<String>,
    ) -> Self {
        Self {
            key: key.into(),
            name: name.into(),
            order: None,
            parent_key: Some(parent_key.into()),
        }
    }

    pub fn is_sub(&self) -> bool {
        self.parent_key.is_some()
    }
}
