//! Legacy constructs still found in older debt model files
//!
//! Kept as plain lookup tables and pure functions so they can be tested
//! without any XML around them.

use crate::models::{Duration, FunctionType};

/// Historical characteristic keys and their current replacement
const LEGACY_CHARACTERISTIC_KEYS: &[(&str, &str)] = &[("NETWORK_USE_EFFICIENCY", "NETWORK_USE")];

/// "Linear with threshold", replaced by plain linear
pub const LINEAR_THRESHOLD: &str = "linear_threshold";

/// "Constant per file", no longer supported
pub const CONSTANT_RESOURCE: &str = "constant_resource";

/// Rewrite a characteristic key through the legacy rename table
pub fn convert_characteristic_key(key: &str) -> String {
    LEGACY_CHARACTERISTIC_KEYS
        .iter()
        .find(|(legacy, _)| *legacy == key)
        .map_or_else(|| key.to_string(), |(_, current)| (*current).to_string())
}

/// Derive a key from a characteristic name
///
/// Keys are ASCII upper-snake: ASCII letters and digits are upper-cased,
/// every run of other characters becomes a single `_`, and separators at
/// either end are dropped.
pub fn key_from_name(name: &str) -> String {
    let mut key = String::with_capacity(name.len());
    let mut in_separator = false;

    for c in name.trim().chars() {
        if c.is_ascii_alphanumeric() {
            key.push(c.to_ascii_uppercase());
            in_separator = false;
        } else if !in_separator {
            key.push('_');
            in_separator = true;
        }
    }

    key.trim_matches('_').to_string()
}

/// Outcome of reading a remediation function token with its arguments
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FunctionConversion {
    /// A current function, kept as declared
    Kept {
        function: FunctionType,
        coefficient: Option<Duration>,
        offset: Option<Duration>,
    },
    /// A deprecated shape rewritten to a current one
    Converted {
        function: FunctionType,
        coefficient: Option<Duration>,
        offset: Option<Duration>,
        reason: &'static str,
    },
    /// A deprecated function with no current equivalent
    Unsupported { reason: &'static str },
    /// Not a function name at all
    Unknown,
}

/// Map a function token and its arguments to a current remediation function
///
/// * `linear_threshold` with a coefficient becomes `LINEAR`, the threshold
///   (offset) is dropped.
/// * `constant_issue` with a coefficient and no offset becomes
///   `CONSTANT_ISSUE` with the coefficient moved to the offset.
/// * `constant_resource` is unsupported.
pub fn convert_function(
    token: &str,
    coefficient: Option<Duration>,
    offset: Option<Duration>,
) -> FunctionConversion {
    let token = token.trim();

    if token.eq_ignore_ascii_case(LINEAR_THRESHOLD) {
        return match coefficient {
            Some(coefficient) => FunctionConversion::Converted {
                function: FunctionType::Linear,
                coefficient: Some(coefficient),
                offset: None,
                reason: "linear with threshold function is no longer used, replaced by linear",
            },
            None => FunctionConversion::Unsupported {
                reason: "linear with threshold function without coefficient is no longer supported",
            },
        };
    }

    if token.eq_ignore_ascii_case(CONSTANT_RESOURCE) {
        return FunctionConversion::Unsupported {
            reason: "constant per file function is no longer used, its debt is ignored",
        };
    }

    let Some(function) = FunctionType::parse(token) else {
        return FunctionConversion::Unknown;
    };

    match (function, coefficient, offset) {
        (FunctionType::ConstantIssue, Some(coefficient), None) => FunctionConversion::Converted {
            function: FunctionType::ConstantIssue,
            coefficient: None,
            offset: Some(coefficient),
            reason: "constant per issue with a coefficient is no longer used, the coefficient becomes the offset",
        },
        _ => FunctionConversion::Kept {
            function,
            coefficient,
            offset,
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_legacy_key_rename() {
        assert_eq!(convert_characteristic_key("NETWORK_USE_EFFICIENCY"), "NETWORK_USE");
        assert_eq!(convert_characteristic_key("NETWORK_USE"), "NETWORK_USE");
        assert_eq!(convert_characteristic_key("PORTABILITY"), "PORTABILITY");
    }

    #[test]
    fn test_key_from_name() {
        assert_eq!(
            key_from_name("Compiler related portability"),
            "COMPILER_RELATED_PORTABILITY"
        );
        assert_eq!(key_from_name("  Memory   use "), "MEMORY_USE");
        assert_eq!(key_from_name("I/O - efficiency"), "I_O_EFFICIENCY");
        assert_eq!(key_from_name("Readability"), "READABILITY");
    }

    #[test]
    fn test_key_from_name_is_ascii() {
        assert_eq!(key_from_name("Qualité du code"), "QUALIT_DU_CODE");
        assert_eq!(key_from_name("(Legacy) naming"), "LEGACY_NAMING");
    }

    #[test]
    fn test_linear_threshold_becomes_linear() {
        let conversion = convert_function(
            "linear_threshold",
            Some(Duration::hours(1)),
            Some(Duration::minutes(30)),
        );
        assert!(matches!(
            conversion,
            FunctionConversion::Converted {
                function: FunctionType::Linear,
                coefficient: Some(c),
                offset: None,
                ..
            } if c == Duration::hours(1)
        ));
    }

    #[test]
    fn test_constant_issue_with_coefficient_moves_to_offset() {
        let conversion = convert_function("constant_issue", Some(Duration::minutes(5)), None);
        assert!(matches!(
            conversion,
            FunctionConversion::Converted {
                function: FunctionType::ConstantIssue,
                coefficient: None,
                offset: Some(o),
                ..
            } if o == Duration::minutes(5)
        ));
    }

    #[test]
    fn test_constant_issue_with_offset_is_kept() {
        let conversion = convert_function("CONSTANT_ISSUE", None, Some(Duration::minutes(5)));
        assert_eq!(
            conversion,
            FunctionConversion::Kept {
                function: FunctionType::ConstantIssue,
                coefficient: None,
                offset: Some(Duration::minutes(5)),
            }
        );
    }

    #[test]
    fn test_constant_resource_is_unsupported() {
        assert!(matches!(
            convert_function("constant_resource", Some(Duration::hours(1)), None),
            FunctionConversion::Unsupported { .. }
        ));
    }

    #[test]
    fn test_unknown_function() {
        assert_eq!(
            convert_function("exponential", None, None),
            FunctionConversion::Unknown
        );
    }

    #[test]
    fn test_current_functions_kept_case_insensitive() {
        assert!(matches!(
            convert_function("linear_offset", Some(Duration::hours(1)), Some(Duration::days(1))),
            FunctionConversion::Kept {
                function: FunctionType::LinearOffset,
                ..
            }
        ));
    }
}
