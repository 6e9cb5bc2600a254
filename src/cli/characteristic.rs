//! Characteristic CLI commands
//!
//! Implements CLI commands for browsing and editing the characteristic tree.

use clap::Subcommand;

use crate::display::format_characteristic_tree;
use crate::error::DebtResult;
use crate::services::CharacteristicService;
use crate::storage::Storage;

/// Characteristic subcommands
#[derive(Subcommand)]
pub enum CharacteristicCommands {
    /// List enabled characteristics as a tree
    List,

    /// Rename a characteristic
    Rename {
        /// Characteristic key
        key: String,
        /// New name
        name: String,
    },

    /// Move a root characteristic one position up
    #[command(name = "move-up")]
    MoveUp {
        /// Root characteristic key
        key: String,
    },

    /// Move a root characteristic one position down
    #[command(name = "move-down")]
    MoveDown {
        /// Root characteristic key
        key: String,
    },
}

/// Handle a characteristic command
pub fn handle_characteristic_command(
    storage: &Storage,
    cmd: CharacteristicCommands,
) -> DebtResult<()> {
    let service = CharacteristicService::new(storage);

    match cmd {
        CharacteristicCommands::List => {
            print!("{}", format_characteristic_tree(&service.list_tree()?));
        }

        CharacteristicCommands::Rename { key, name } => {
            let characteristic = service.rename(&key, &name)?;
            println!("Renamed: {}", characteristic);
        }

        CharacteristicCommands::MoveUp { key } => {
            if service.move_up(&key)? {
                println!("Moved up: {}", key);
            } else {
                println!("{} is already first", key);
            }
        }

        CharacteristicCommands::MoveDown { key } => {
            if service.move_down(&key)? {
                println!("Moved down: {}", key);
            } else {
                println!("{} is already last", key);
            }
        }
    }

    Ok(())
}
