//! Export module for the debt model
//!
//! Serializes the characteristic tree and rule remediation declarations to
//! the XML format read back by [`crate::import`].

pub mod xml;

pub use xml::{export_xml, LINE_SEPARATOR};
