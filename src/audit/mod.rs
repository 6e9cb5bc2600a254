//! Audit logging for debt model changes
//!
//! Every characteristic and rule write staged by a
//! [`StorageSession`](crate::storage::StorageSession) becomes an
//! [`AuditEntry`] naming the row by key and listing the fields that changed.
//! Entries are appended to a line-delimited JSON log by the [`AuditLogger`]
//! once the session commits, so a rolled-back restore leaves no trace in
//! the log.

mod changes;
mod entry;
mod logger;

pub use changes::{characteristic_changes, rule_changes};
pub use entry::{AuditEntry, ChangeSource, EntityType, FieldChange, Operation};
pub use logger::AuditLogger;
