//! Backup CLI commands
//!
//! Implements CLI commands for snapshot management. These work on paths
//! only, so a restore never runs while the catalog store is open.

use clap::Subcommand;
use std::path::PathBuf;

use crate::audit::{AuditEntry, AuditLogger};
use crate::backup::{BackupManager, RestoreManager, SNAPSHOT_EXTENSION};
use crate::config::paths::LivrariaPaths;
use crate::config::settings::Settings;
use crate::display::backup::{format_snapshot_details, format_snapshot_list};
use crate::error::{LivrariaError, LivrariaResult};

/// Backup subcommands
#[derive(Subcommand)]
pub enum BackupCommands {
    /// Create a new snapshot of the catalog
    Create,

    /// List all available snapshots
    List {
        /// Show detailed information
        #[arg(short, long)]
        verbose: bool,
    },

    /// Restore the catalog from a snapshot
    Restore {
        /// Snapshot filename or path (use 'latest' for most recent)
        backup: String,

        /// Skip confirmation prompt
        #[arg(short, long)]
        force: bool,
    },

    /// Show information about a specific snapshot
    Info {
        /// Snapshot filename or path
        backup: String,
    },

    /// Delete old snapshots according to the retention policy
    Prune {
        /// Number of snapshots to keep (defaults to the configured retention)
        #[arg(short, long)]
        keep: Option<usize>,

        /// Skip confirmation prompt
        #[arg(short, long)]
        force: bool,
    },
}

/// Handle a backup command
pub fn handle_backup_command(
    paths: &LivrariaPaths,
    settings: &Settings,
    cmd: BackupCommands,
) -> LivrariaResult<()> {
    let manager = BackupManager::new(
        paths.backup_dir(),
        paths.catalog_file(),
        settings.backup_retention.clone(),
    );

    match cmd {
        BackupCommands::Create => {
            let (snapshot, pruned) = manager.create_snapshot_with_retention()?;
            println!("Snapshot created: {}", file_name(&snapshot));
            println!("Location: {}", snapshot.display());
            if !pruned.is_empty() {
                println!("Pruned {} old snapshot(s)", pruned.len());
            }
        }

        BackupCommands::List { verbose } => {
            let snapshots = manager.list_snapshots()?;
            println!("{}", format_snapshot_list(&snapshots, verbose));
        }

        BackupCommands::Restore { backup, force } => {
            let snapshot_path = resolve_snapshot_path(&manager, &backup)?;

            let restore_manager = RestoreManager::new(paths.catalog_file());
            let validation = restore_manager.validate_snapshot(&snapshot_path)?;

            println!("{}", format_snapshot_details(&snapshot_path, &validation));
            println!();

            if !force {
                println!("WARNING: This will overwrite the current catalog!");
                println!("To proceed, run again with --force flag:");
                println!("  livraria backup restore {} --force", backup);
                return Ok(());
            }

            if paths.is_initialized() {
                println!("Creating snapshot of the current catalog before restore...");
                let (pre_restore, pruned) = manager.create_snapshot_with_retention()?;
                println!("Pre-restore snapshot saved: {}", file_name(&pre_restore));
                if !pruned.is_empty() {
                    println!("Pruned {} old snapshot(s)", pruned.len());
                }
            }

            let result = restore_manager.restore_from_file(&snapshot_path)?;
            AuditLogger::new(paths.audit_log())
                .log(&AuditEntry::restore(&file_name(&snapshot_path)))?;

            println!("Restore complete!");
            println!("{}", result.summary());
        }

        BackupCommands::Info { backup } => {
            let snapshot_path = resolve_snapshot_path(&manager, &backup)?;
            let validation = RestoreManager::new(paths.catalog_file())
                .validate_snapshot(&snapshot_path)?;

            println!("{}", format_snapshot_details(&snapshot_path, &validation));
        }

        BackupCommands::Prune { keep, force } => {
            let keep = keep.unwrap_or(manager.retention().keep);
            let snapshots = manager.list_snapshots()?;
            let to_delete = snapshots.len().saturating_sub(keep);

            if to_delete == 0 {
                println!("No snapshots to prune.");
                println!(
                    "Keeping the {} most recent; you have {}.",
                    keep,
                    snapshots.len()
                );
                return Ok(());
            }

            println!("Prune Summary");
            println!("=============");
            println!("Keep: {} most recent", keep);
            println!("Current snapshots: {}", snapshots.len());
            println!("To be deleted:");
            for snapshot in snapshots.iter().skip(keep) {
                println!("  {}", snapshot.filename);
            }
            println!();

            if !force {
                println!("To delete old snapshots, run again with --force flag:");
                println!("  livraria backup prune --keep {} --force", keep);
                return Ok(());
            }

            let deleted = manager.prune_snapshots(keep)?;
            println!("Deleted {} snapshot(s).", deleted.len());
        }
    }

    Ok(())
}

/// Resolve a snapshot identifier to a full path
fn resolve_snapshot_path(manager: &BackupManager, backup: &str) -> LivrariaResult<PathBuf> {
    if backup.eq_ignore_ascii_case("latest") {
        return manager
            .latest_snapshot()?
            .map(|s| s.path)
            .ok_or_else(|| LivrariaError::snapshot_not_found("latest"));
    }

    let path = PathBuf::from(backup);
    if path.is_file() {
        return Ok(path);
    }

    let in_backup_dir = manager.backup_dir().join(backup);
    if in_backup_dir.is_file() {
        return Ok(in_backup_dir);
    }

    let with_ext = manager
        .backup_dir()
        .join(format!("{}.{}", backup, SNAPSHOT_EXTENSION));
    if with_ext.is_file() {
        return Ok(with_ext);
    }

    Err(LivrariaError::snapshot_not_found(backup))
}

fn file_name(path: &std::path::Path) -> String {
    path.file_name()
        .map(|s| s.to_string_lossy().to_string())
        .unwrap_or_else(|| path.display().to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::BackupRetention;
    use std::fs;
    use tempfile::TempDir;

    fn manager_with(names: &[&str]) -> (TempDir, BackupManager) {
        let temp_dir = TempDir::new().unwrap();
        let backup_dir = temp_dir.path().join("backups");
        fs::create_dir_all(&backup_dir).unwrap();
        for name in names {
            fs::write(backup_dir.join(name), b"x").unwrap();
        }
        let manager = BackupManager::new(
            backup_dir,
            temp_dir.path().join("livraria.db"),
            BackupRetention::default(),
        );
        (temp_dir, manager)
    }

    #[test]
    fn test_resolve_by_name_and_stem() {
        let (_temp, manager) = manager_with(&["backup_livraria_2024-01-01-10-00-00.db"]);

        let by_name =
            resolve_snapshot_path(&manager, "backup_livraria_2024-01-01-10-00-00.db").unwrap();
        let by_stem =
            resolve_snapshot_path(&manager, "backup_livraria_2024-01-01-10-00-00").unwrap();

        assert_eq!(by_name, by_stem);
        assert!(by_name.starts_with(manager.backup_dir()));
    }

    #[test]
    fn test_resolve_latest() {
        let (_temp, manager) = manager_with(&[]);
        assert!(resolve_snapshot_path(&manager, "latest")
            .unwrap_err()
            .is_not_found());

        let (_temp, manager) = manager_with(&["backup_livraria_2024-01-01-10-00-00.db"]);
        assert!(resolve_snapshot_path(&manager, "LATEST").is_ok());
    }

    #[test]
    fn test_resolve_unknown() {
        let (_temp, manager) = manager_with(&[]);
        let err = resolve_snapshot_path(&manager, "nope").unwrap_err();
        assert!(err.is_not_found());
    }
}
