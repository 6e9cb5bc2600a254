//! Remediation functions and per-rule debt declarations
//!
//! A remediation function is the cost model for fixing a violation of a
//! rule. Only three shapes are valid:
//!
//! | Function         | coefficient | offset |
//! |------------------|-------------|--------|
//! | `LINEAR`         | set         | unset  |
//! | `LINEAR_OFFSET`  | set         | set    |
//! | `CONSTANT_ISSUE` | unset       | set    |

use serde::{Deserialize, Serialize};
use std::fmt;

use super::duration::Duration;
use crate::error::{DebtError, DebtResult};

/// Kind of remediation function
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum FunctionType {
    /// Cost per occurrence
    Linear,
    /// Cost per occurrence plus a fixed cost
    LinearOffset,
    /// Fixed cost per issue
    ConstantIssue,
}

impl FunctionType {
    pub fn all() -> &'static [Self] {
        &[Self::Linear, Self::LinearOffset, Self::ConstantIssue]
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Linear => "LINEAR",
            Self::LinearOffset => "LINEAR_OFFSET",
            Self::ConstantIssue => "CONSTANT_ISSUE",
        }
    }

    /// Parse a function name, ignoring case
    pub fn parse(s: &str) -> Option<Self> {
        Self::all()
            .iter()
            .copied()
            .find(|f| f.as_str().eq_ignore_ascii_case(s.trim()))
    }
}

impl fmt::Display for FunctionType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A validated remediation function
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct RemediationFunction {
    function: FunctionType,
    coefficient: Option<Duration>,
    offset: Option<Duration>,
}

impl RemediationFunction {
    /// Build a remediation function, rejecting invalid argument combinations
    pub fn new(
        function: FunctionType,
        coefficient: Option<Duration>,
        offset: Option<Duration>,
    ) -> DebtResult<Self> {
        let valid = match function {
            FunctionType::Linear => coefficient.is_some() && offset.is_none(),
            FunctionType::LinearOffset => coefficient.is_some() && offset.is_some(),
            FunctionType::ConstantIssue => coefficient.is_none() && offset.is_some(),
        };

        if !valid {
            return Err(DebtError::InvalidRemediationFunction(format!(
                "{} does not accept coefficient {} and offset {}",
                function,
                describe(coefficient),
                describe(offset)
            )));
        }

        Ok(Self {
            function,
            coefficient,
            offset,
        })
    }

    pub fn linear(coefficient: Duration) -> Self {
        Self {
            function: FunctionType::Linear,
            coefficient: Some(coefficient),
            offset: None,
        }
    }

    pub fn linear_with_offset(coefficient: Duration, offset: Duration) -> Self {
        Self {
            function: FunctionType::LinearOffset,
            coefficient: Some(coefficient),
            offset: Some(offset),
        }
    }

    pub fn constant_per_issue(offset: Duration) -> Self {
        Self {
            function: FunctionType::ConstantIssue,
            coefficient: None,
            offset: Some(offset),
        }
    }

    pub fn function(&self) -> FunctionType {
        self.function
    }

    pub fn coefficient(&self) -> Option<Duration> {
        self.coefficient
    }

    pub fn offset(&self) -> Option<Duration> {
        self.offset
    }
}

fn describe(value: Option<Duration>) -> String {
    value.map_or_else(|| "(none)".to_string(), |d| d.to_string())
}

/// Identity of a rule: repository plus rule key within the repository
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct RuleKey {
    pub repository: String,
    pub rule: String,
}

impl RuleKey {
    pub fn of(repository: impl Into<String>, rule: impl Into<String>) -> Self {
        Self {
            repository: repository.into(),
            rule: rule.into(),
        }
    }
}

impl fmt::Display for RuleKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.repository, self.rule)
    }
}

/// The remediation declared for one rule, as read from or written to XML
///
/// Never persisted as such. The argument combination is not validated here;
/// that happens when the declaration is applied to a rule.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RuleDebt {
    pub rule_key: RuleKey,
    pub sub_characteristic_key: String,
    pub function: FunctionType,
    pub coefficient: Option<Duration>,
    pub offset: Option<Duration>,
}

impl RuleDebt {
    /// Validate the declaration into a remediation function
    pub fn remediation_function(&self) -> DebtResult<RemediationFunction> {
        RemediationFunction::new(self.function, self.coefficient, self.offset)
            .map_err(|e| match e {
                DebtError::InvalidRemediationFunction(reason) => {
                    DebtError::InvalidRemediationFunction(format!("{} ({})", reason, self.rule_key))
                }
                other => other,
            })
    }
}
