//! Service layer for the debt model
//!
//! Administrator operations on top of the storage layer. Backup, restore
//! and reset live in [`crate::backup`].

pub mod characteristic;

pub use characteristic::{CharacteristicService, CharacteristicTree};
