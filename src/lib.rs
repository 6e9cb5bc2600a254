//! debtmodel - technical debt model synchronizer
//!
//! This library keeps the persisted technical debt model in sync with XML
//! documents and plugins. The model is a two-level tree of characteristics
//! (roots such as "Portability", sub-characteristics such as "Compiler")
//! plus, for every rule, the sub-characteristic it belongs to and the
//! remediation function estimating the cost of fixing one of its issues.
//!
//! # Architecture
//!
//! The crate is organized into the following modules:
//!
//! - `config`: Configuration and path management
//! - `error`: Custom error types
//! - `models`: Characteristics, rules and remediation functions
//! - `import`: XML import of the characteristic tree and rule debts
//! - `export`: XML export
//! - `plugins`: Plugin models and rule definitions
//! - `storage`: JSON file storage layer and sessions
//! - `audit`: Audit logging system
//! - `backup`: Backup, restore and reset
//! - `services`: Characteristic administration
//!
//! # Example
//!
//! ```rust,ignore
//! use debtmodel::backup::DebtModelBackup;
//! use debtmodel::config::{paths::DebtPaths, settings::Settings};
//! use debtmodel::plugins::{FsDebtModelPluginRepository, JsonRuleDefinitionsLoader};
//! use debtmodel::storage::Storage;
//!
//! let paths = DebtPaths::new()?;
//! let settings = Settings::load_or_create(&paths)?;
//! let storage = Storage::new(paths.clone())?;
//! storage.load_all()?;
//!
//! let plugins = FsDebtModelPluginRepository::new(paths.plugins_dir());
//! let loader = JsonRuleDefinitionsLoader::new(paths.rule_definitions_dir());
//! let xml = DebtModelBackup::new(&storage, &plugins, &loader)
//!     .with_settings(&settings)
//!     .backup(None)?;
//! ```

pub mod audit;
pub mod backup;
pub mod cli;
pub mod config;
pub mod display;
pub mod error;
pub mod export;
pub mod import;
pub mod models;
pub mod plugins;
pub mod services;
pub mod storage;

pub use error::{DebtError, DebtResult};
