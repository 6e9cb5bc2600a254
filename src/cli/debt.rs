//! Backup, restore and reset CLI commands

use std::fs;
use std::path::Path;

use crate::audit::AuditLogger;
use crate::backup::DebtModelBackup;
use crate::config::paths::DebtPaths;
use crate::config::settings::Settings;
use crate::error::{DebtError, DebtResult};
use crate::plugins::{FsDebtModelPluginRepository, JsonRuleDefinitionsLoader};
use crate::storage::Storage;

/// Plugin collaborators read from the data directory
struct Collaborators {
    plugins: FsDebtModelPluginRepository,
    rule_definitions: JsonRuleDefinitionsLoader,
}

impl Collaborators {
    fn new(paths: &DebtPaths) -> Self {
        Self {
            plugins: FsDebtModelPluginRepository::new(paths.plugins_dir()),
            rule_definitions: JsonRuleDefinitionsLoader::new(paths.rule_definitions_dir()),
        }
    }

    fn backup<'a>(&'a self, storage: &'a Storage, settings: &Settings) -> DebtModelBackup<'a> {
        DebtModelBackup::new(storage, &self.plugins, &self.rule_definitions).with_settings(settings)
    }
}

/// Export the model
///
/// The XML goes to `output` when given, to a new file of the backups
/// directory when `save` is set, and to stdout otherwise.
pub fn handle_backup_command(
    storage: &Storage,
    settings: &Settings,
    language: Option<&str>,
    output: Option<&Path>,
    save: bool,
) -> DebtResult<()> {
    let collaborators = Collaborators::new(storage.paths());
    let backup = collaborators.backup(storage, settings);

    if let Some(output) = output {
        let xml = backup.backup(language)?;
        fs::write(output, xml).map_err(|e| {
            DebtError::Io(format!("Failed to write {}: {}", output.display(), e))
        })?;
        eprintln!("Backup written to {}", output.display());
    } else if save {
        let path = backup.backup_to_file(&storage.paths().backup_dir(), language)?;
        eprintln!("Backup written to {}", path.display());
    } else {
        print!("{}", backup.backup(language)?);
    }

    Ok(())
}

/// Restore the model from an XML file
///
/// Warnings and errors are printed. Any error makes the command fail, even
/// when the restore itself was committed.
pub fn handle_restore_command(
    storage: &Storage,
    settings: &Settings,
    file: &Path,
    language: Option<&str>,
) -> DebtResult<()> {
    let xml = fs::read_to_string(file)
        .map_err(|e| DebtError::Io(format!("Failed to read {}: {}", file.display(), e)))?;

    let collaborators = Collaborators::new(storage.paths());
    let messages = collaborators
        .backup(storage, settings)
        .restore_from_xml(&xml, language)
        .map_err(|e| {
            if e.is_structural() {
                eprintln!("Nothing was restored from {}", file.display());
            }
            e
        })?;

    if !messages.is_empty() {
        eprint!("{}", messages);
    }

    if messages.has_errors() {
        return Err(DebtError::Validation(format!(
            "Restore of {} reported {} error(s)",
            file.display(),
            messages.errors().len()
        )));
    }

    println!("Debt model restored from {}", file.display());
    if messages.has_warnings() {
        println!("{} warning(s) reported", messages.warnings().len());
    }
    Ok(())
}

/// Reset the model to what the plugins declare
pub fn handle_reset_command(storage: &Storage, settings: &Settings) -> DebtResult<()> {
    let collaborators = Collaborators::new(storage.paths());
    let result = collaborators.backup(storage, settings).reset()?;

    println!("Debt model reset");
    println!("  Characteristics: {}", result.characteristics);
    println!("  Rules updated:   {}", result.rules_updated);
    Ok(())
}

/// Print the most recent audit log entries, oldest first
pub fn handle_history_command(storage: &Storage, limit: usize) -> DebtResult<()> {
    let entries = AuditLogger::new(storage.paths().audit_log()).read_recent(limit)?;

    if entries.is_empty() {
        println!("No changes recorded.");
        return Ok(());
    }

    for entry in entries {
        println!("{}", entry.format_human_readable());
    }
    Ok(())
}
