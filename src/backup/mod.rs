//! Backup, restore and reset of the debt model
//!
//! [`DebtModelBackup`] synchronizes the persisted characteristics and rule
//! remediation with three sources:
//!
//! - `backup`: the current model is exported as a `<sqale>` XML document
//! - `restore_from_xml`: a document replaces the characteristics and the
//!   administrator overrides of the rules
//! - `reset`: the plugin models and rule definitions replace everything the
//!   administrator changed
//!
//! Restore and reset stage their writes in a
//! [`StorageSession`](crate::storage::StorageSession), so a failure leaves
//! storage as it was.
//!
//! # Example
//!
//! ```rust,ignore
//! use debtmodel::backup::DebtModelBackup;
//! use debtmodel::plugins::{FsDebtModelPluginRepository, JsonRuleDefinitionsLoader};
//!
//! let plugins = FsDebtModelPluginRepository::new(paths.plugins_dir());
//! let loader = JsonRuleDefinitionsLoader::new(paths.rule_definitions_dir());
//! let backup = DebtModelBackup::new(&storage, &plugins, &loader);
//!
//! let xml = backup.backup(None)?;
//! let messages = backup.restore_from_xml(&xml, None)?;
//! println!("{}", messages);
//! ```

mod manager;
mod restore;
#[cfg(test)]
mod test_support;

pub use manager::{DebtModelBackup, ResetResult};
