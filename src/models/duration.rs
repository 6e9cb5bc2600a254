//! Remediation effort durations
//!
//! A duration is a whole number followed by a unit (`"2h"`, `"15min"`,
//! `"1d"`). Values are kept exactly as declared; no conversion between
//! units takes place.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::error::DebtError;

/// Unit of a remediation duration
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
pub enum DurationUnit {
    #[default]
    #[serde(rename = "d")]
    Day,
    #[serde(rename = "h")]
    Hour,
    #[serde(rename = "min", alias = "mn")]
    Minute,
}

impl DurationUnit {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Day => "d",
            Self::Hour => "h",
            Self::Minute => "min",
        }
    }

    /// Parse a unit token; the historical `mn` token is read as minutes
    pub fn parse(token: &str) -> Option<Self> {
        match token {
            "d" => Some(Self::Day),
            "h" => Some(Self::Hour),
            "min" | "mn" => Some(Self::Minute),
            _ => None,
        }
    }
}

impl fmt::Display for DurationUnit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A remediation duration such as `2h`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Duration {
    value: u32,
    unit: DurationUnit,
}

impl Duration {
    pub fn new(value: u32, unit: DurationUnit) -> Self {
        Self { value, unit }
    }

    pub fn days(value: u32) -> Self {
        Self::new(value, DurationUnit::Day)
    }

    pub fn hours(value: u32) -> Self {
        Self::new(value, DurationUnit::Hour)
    }

    pub fn minutes(value: u32) -> Self {
        Self::new(value, DurationUnit::Minute)
    }

    pub fn value(&self) -> u32 {
        self.value
    }

    pub fn unit(&self) -> DurationUnit {
        self.unit
    }
}

impl fmt::Display for Duration {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}", self.value, self.unit)
    }
}

impl FromStr for Duration {
    type Err = DebtError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        let split = s
            .find(|c: char| !c.is_ascii_digit())
            .ok_or_else(|| DebtError::InvalidDuration(s.to_string()))?;
        let (digits, unit) = s.split_at(split);

        let value = digits
            .parse::<u32>()
            .map_err(|_| DebtError::InvalidDuration(s.to_string()))?;
        let unit =
            DurationUnit::parse(unit.trim()).ok_or_else(|| DebtError::InvalidDuration(s.to_string()))?;

        Ok(Self { value, unit })
    }
}

impl TryFrom<String> for Duration {
    type Error = DebtError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<Duration> for String {
    fn from(duration: Duration) -> Self {
        duration.to_string()
    }
}
