//! Append-only JSONL audit log
//!
//! One [`AuditEntry`] per line. A storage session appends all of its entries
//! with a single write once its data files are saved.

use std::fs::{self, OpenOptions};
use std::io::{ErrorKind, Write};
use std::path::PathBuf;

use crate::error::{DebtError, DebtResult};

use super::entry::AuditEntry;

pub struct AuditLogger {
    log_path: PathBuf,
}

impl AuditLogger {
    pub fn new(log_path: PathBuf) -> Self {
        Self { log_path }
    }

    /// Append `entries` in order; an empty slice leaves the log untouched
    pub fn append(&self, entries: &[AuditEntry]) -> DebtResult<()> {
        if entries.is_empty() {
            return Ok(());
        }

        let mut lines = String::new();
        for entry in entries {
            lines.push_str(&serde_json::to_string(entry)?);
            lines.push('\n');
        }

        OpenOptions::new()
            .create(true)
            .append(true)
            .open(&self.log_path)
            .and_then(|mut file| file.write_all(lines.as_bytes()))
            .map_err(|e| {
                DebtError::Io(format!(
                    "Failed to append to audit log {}: {}",
                    self.log_path.display(),
                    e
                ))
            })
    }

    /// Every entry of the log, oldest first
    pub fn read_all(&self) -> DebtResult<Vec<AuditEntry>> {
        let contents = match fs::read_to_string(&self.log_path) {
            Ok(contents) => contents,
            Err(e) if e.kind() == ErrorKind::NotFound => return Ok(Vec::new()),
            Err(e) => {
                return Err(DebtError::Io(format!(
                    "Failed to read audit log {}: {}",
                    self.log_path.display(),
                    e
                )))
            }
        };

        serde_json::Deserializer::from_str(&contents)
            .into_iter::<AuditEntry>()
            .collect::<Result<Vec<_>, _>>()
            .map_err(|e| {
                DebtError::Json(format!(
                    "Corrupt audit log {}: {}",
                    self.log_path.display(),
                    e
                ))
            })
    }

    /// The last `count` entries, oldest first
    pub fn read_recent(&self, count: usize) -> DebtResult<Vec<AuditEntry>> {
        let mut entries = self.read_all()?;
        let skipped = entries.len().saturating_sub(count);
        entries.drain(..skipped);
        Ok(entries)
    }
}
