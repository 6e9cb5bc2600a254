//! Display formatting for terminal output

pub mod characteristic;

pub use characteristic::format_characteristic_tree;
