//! Storage layer for the debt model
//!
//! JSON file repositories with atomic writes. Reconciliation work goes
//! through a [`StorageSession`], which stages writes and commits them at once.

pub mod characteristics;
pub mod file_io;
pub mod init;
pub mod rules;
pub mod session;

pub use characteristics::CharacteristicRepository;
pub use file_io::{read_data_file, read_json_file, write_data_file};
pub use init::initialize_storage;
pub use rules::RuleRepository;
pub use session::StorageSession;

use crate::audit::{AuditEntry, AuditLogger};
use crate::config::paths::DebtPaths;
use crate::error::DebtError;

/// Main storage coordinator that provides access to all repositories
pub struct Storage {
    paths: DebtPaths,
    pub characteristics: CharacteristicRepository,
    pub rules: RuleRepository,
    audit: Option<AuditLogger>,
}

impl Storage {
    /// Create a new Storage instance with audit logging enabled
    pub fn new(paths: DebtPaths) -> Result<Self, DebtError> {
        paths.ensure_directories()?;

        Ok(Self {
            characteristics: CharacteristicRepository::new(paths.characteristics_file()),
            rules: RuleRepository::new(paths.rules_file()),
            audit: Some(AuditLogger::new(paths.audit_log())),
            paths,
        })
    }

    /// Turn audit logging on or off
    pub fn with_audit(mut self, enabled: bool) -> Self {
        self.audit = enabled.then(|| AuditLogger::new(self.paths.audit_log()));
        self
    }

    /// Get the paths configuration
    pub fn paths(&self) -> &DebtPaths {
        &self.paths
    }

    /// Load all data from disk
    pub fn load_all(&self) -> Result<(), DebtError> {
        self.characteristics.load()?;
        self.rules.load()?;
        Ok(())
    }

    /// Save all data to disk
    pub fn save_all(&self) -> Result<(), DebtError> {
        self.characteristics.save()?;
        self.rules.save()?;
        Ok(())
    }

    /// Open a session on a snapshot of the current data
    pub fn open_session(&self) -> Result<StorageSession<'_>, DebtError> {
        StorageSession::open(self)
    }

    /// Append audit entries, if audit logging is enabled
    pub fn append_audit(&self, entries: &[AuditEntry]) -> Result<(), DebtError> {
        match &self.audit {
            Some(logger) => logger.append(entries),
            None => Ok(()),
        }
    }
}
