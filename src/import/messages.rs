//! Validation message collector
//!
//! Per-entry problems found while importing are accumulated here and
//! returned to the caller as data, so a full report can be shown instead of
//! stopping at the first problem.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Errors and warnings gathered during an import or restore
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ValidationMessages {
    errors: Vec<String>,
    warnings: Vec<String>,
}

impl ValidationMessages {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add_error(&mut self, message: impl Into<String>) {
        let message = message.into();
        tracing::debug!(%message, "validation error");
        self.errors.push(message);
    }

    pub fn add_warning(&mut self, message: impl Into<String>) {
        let message = message.into();
        tracing::debug!(%message, "validation warning");
        self.warnings.push(message);
    }

    pub fn errors(&self) -> &[String] {
        &self.errors
    }

    pub fn warnings(&self) -> &[String] {
        &self.warnings
    }

    pub fn has_errors(&self) -> bool {
        !self.errors.is_empty()
    }

    pub fn has_warnings(&self) -> bool {
        !self.warnings.is_empty()
    }

    pub fn is_empty(&self) -> bool {
        self.errors.is_empty() && self.warnings.is_empty()
    }

    /// Append every message of `other`
    pub fn merge(&mut self, other: ValidationMessages) {
        self.errors.extend(other.errors);
        self.warnings.extend(other.warnings);
    }
}

impl fmt::Display for ValidationMessages {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for error in &self.errors {
            writeln!(f, "ERROR: {}", error)?;
        }
        for warning in &self.warnings {
            writeln!(f, "WARNING: {}", warning)?;
        }
        Ok(())
    }
}
