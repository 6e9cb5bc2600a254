//! Custom error types for the debt model
//!
//! Only genuinely fatal problems are errors. Per-entry validation problems
//! found while importing XML are collected in
//! [`ValidationMessages`](crate::import::ValidationMessages) instead.

use thiserror::Error;

/// The main error type for debt model operations
#[derive(Error, Debug)]
pub enum DebtError {
    /// Configuration-related errors
    #[error("Configuration error: {0}")]
    Config(String),

    /// File I/O errors
    #[error("I/O error: {0}")]
    Io(String),

    /// JSON serialization/deserialization errors
    #[error("JSON error: {0}")]
    Json(String),

    /// XML is not well-formed or does not have the expected shape
    #[error("XML error: {0}")]
    Xml(String),

    /// Structural validation errors (e.g. a sub-characteristic nested under another sub)
    #[error("Validation error: {0}")]
    Validation(String),

    /// A remediation function with an invalid argument combination
    #[error("Invalid remediation function: {0}")]
    InvalidRemediationFunction(String),

    /// A duration value that cannot be parsed
    #[error("Invalid duration '{0}'")]
    InvalidDuration(String),

    /// Entity not found errors
    #[error("{entity_type} not found: {identifier}")]
    NotFound {
        entity_type: &'static str,
        identifier: String,
    },

    /// Plugin registry or rule definition loading errors
    #[error("Plugin error: {0}")]
    Plugin(String),

    /// Storage errors
    #[error("Storage error: {0}")]
    Storage(String),
}

impl DebtError {
    /// Create a "not found" error for characteristics
    pub fn characteristic_not_found(identifier: impl Into<String>) -> Self {
        Self::NotFound {
            entity_type: "Characteristic",
            identifier: identifier.into(),
        }
    }

    /// Create a "not found" error for rules
    pub fn rule_not_found(identifier: impl Into<String>) -> Self {
        Self::NotFound {
            entity_type: "Rule",
            identifier: identifier.into(),
        }
    }

    /// Check if this is a "not found" error
    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::NotFound { .. })
    }

    /// Check if this error aborts the whole operation before anything is written
    pub fn is_structural(&self) -> bool {
        matches!(self, Self::Xml(_) | Self::Validation(_))
    }
}

impl From<std::io::Error> for DebtError {
    fn from(err: std::io::Error) -> Self {
        Self::Io(err.to_string())
    }
}

impl From<serde_json::Error> for DebtError {
    fn from(err: serde_json::Error) -> Self {
        Self::Json(err.to_string())
    }
}

impl From<roxmltree::Error> for DebtError {
    fn from(err: roxmltree::Error) -> Self {
        Self::Xml(err.to_string())
    }
}

/// Result type alias for debt model operations
pub type DebtResult<T> = Result<T, DebtError>;
