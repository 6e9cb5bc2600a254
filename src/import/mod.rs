//! XML import for the debt model
//!
//! Two independent passes read the same `<sqale>` document:
//!
//! - [`import_characteristics`]: the characteristic tree, as a [`DebtModel`](crate::models::DebtModel)
//! - [`RulesImporter`]: per-rule remediation declarations, as [`RuleDebt`](crate::models::RuleDebt)s
//!
//! Malformed XML is fatal for both. Problems with single entries are
//! collected in [`ValidationMessages`].

pub mod characteristics;
pub mod document;
pub mod legacy;
pub mod messages;
pub mod rules;

pub use characteristics::import_characteristics;
pub use messages::ValidationMessages;
pub use rules::RulesImporter;
