//! CLI command handlers
//!
//! This module contains the implementation of CLI commands,
//! bridging the clap argument parsing with the backup and service layers.

pub mod characteristic;
pub mod debt;

pub use characteristic::{handle_characteristic_command, CharacteristicCommands};
pub use debt::{
    handle_backup_command, handle_history_command, handle_reset_command, handle_restore_command,
};
