//! Rule definitions declared by plugins
//!
//! Each plugin repository declares its rules and, optionally, the debt of
//! each rule: a sub-characteristic key and a remediation function. Reset
//! copies these declarations into the rules' default remediation fields.
//!
//! The JSON loader reads one repository per `*.json` file:
//!
//! ```json
//! {
//!   "key": "squid",
//!   "language": "java",
//!   "rules": [
//!     {
//!       "key": "S1067",
//!       "debt_sub_characteristic": "READABILITY",
//!       "debt_remediation_function": { "function": "LINEAR", "coefficient": "5min" }
//!     }
//!   ]
//! }
//! ```

use std::fs;
use std::path::PathBuf;

use serde::{Deserialize, Serialize};

use crate::error::{DebtError, DebtResult};
use crate::models::{Duration, FunctionType, RemediationFunction, RuleKey};
use crate::storage::read_json_file;

/// Remediation function as declared by a plugin
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct DebtRemediationDefinition {
    pub function: FunctionType,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub coefficient: Option<Duration>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub offset: Option<Duration>,
}

impl DebtRemediationDefinition {
    pub fn remediation_function(&self) -> DebtResult<RemediationFunction> {
        RemediationFunction::new(self.function, self.coefficient, self.offset)
    }
}

/// A rule as declared by its repository
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RuleDefinition {
    pub key: String,
    #[serde(default)]
    pub debt_sub_characteristic: Option<String>,
    #[serde(default)]
    pub debt_remediation_function: Option<DebtRemediationDefinition>,
}

/// A rule repository with its rules
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RepositoryDefinition {
    pub key: String,
    #[serde(default)]
    pub language: Option<String>,
    #[serde(default)]
    pub rules: Vec<RuleDefinition>,
}

/// Every rule repository declared by the installed plugins
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RulesDefinition {
    repositories: Vec<RepositoryDefinition>,
}

impl RulesDefinition {
    pub fn new(repositories: Vec<RepositoryDefinition>) -> Self {
        Self { repositories }
    }

    pub fn repositories(&self) -> &[RepositoryDefinition] {
        &self.repositories
    }

    pub fn repository(&self, key: &str) -> Option<&RepositoryDefinition> {
        self.repositories.iter().find(|r| r.key == key)
    }

    /// Find the definition of a rule
    pub fn rule(&self, rule_key: &RuleKey) -> Option<&RuleDefinition> {
        self.repository(&rule_key.repository)?
            .rules
            .iter()
            .find(|r| r.key == rule_key.rule)
    }
}

/// Source of rule definitions
pub trait RuleDefinitionsLoader {
    fn load(&self) -> DebtResult<RulesDefinition>;
}

/// Loads one [`RepositoryDefinition`] per JSON file of a directory
pub struct JsonRuleDefinitionsLoader {
    dir: PathBuf,
}

impl JsonRuleDefinitionsLoader {
    pub fn new(dir: PathBuf) -> Self {
        Self { dir }
    }
}

impl RuleDefinitionsLoader for JsonRuleDefinitionsLoader {
    fn load(&self) -> DebtResult<RulesDefinition> {
        if !self.dir.exists() {
            return Ok(RulesDefinition::default());
        }

        let entries = fs::read_dir(&self.dir).map_err(|e| {
            DebtError::Plugin(format!(
                "Failed to read rule definitions directory {}: {}",
                self.dir.display(),
                e
            ))
        })?;

        let mut files = Vec::new();
        for entry in entries {
            let path = entry
                .map_err(|e| DebtError::Plugin(format!("Failed to read directory entry: {}", e)))?
                .path();
            if path.extension().map_or(false, |ext| ext == "json") {
                files.push(path);
            }
        }
        files.sort();

        let mut repositories = Vec::new();
        for path in files {
            let repository: RepositoryDefinition = read_json_file(&path)
                .map_err(|e| DebtError::Plugin(e.to_string()))?;
            validate(&repository)
                .map_err(|e| DebtError::Plugin(format!("{}: {}", path.display(), e)))?;
            repositories.push(repository);
        }

        tracing::debug!(repositories = repositories.len(), "loaded rule definitions");
        Ok(RulesDefinition::new(repositories))
    }
}

fn validate(repository: &RepositoryDefinition) -> DebtResult<()> {
    if repository.key.trim().is_empty() {
        return Err(DebtError::Validation("repository key cannot be empty".into()));
    }
    for rule in &repository.rules {
        if let Some(function) = &rule.debt_remediation_function {
            function.remediation_function().map_err(|e| {
                DebtError::Validation(format!("rule '{}:{}': {}", repository.key, rule.key, e))
            })?;
        }
    }
    Ok(())
}
