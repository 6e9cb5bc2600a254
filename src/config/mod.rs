//! Configuration module for the debt model
//!
//! This module provides:
//! - Path resolution for data, plugins and backups
//! - User settings persistence

pub mod paths;
pub mod settings;

pub use paths::DebtPaths;
pub use settings::Settings;
