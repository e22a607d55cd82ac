//! Backup manager for Livraria
//!
//! Snapshots are byte-identical copies of the catalog database named
//! `backup_livraria_<YYYY-MM-DD-HH-MM-SS>.db`. Retention keeps the most
//! recently modified snapshots and deletes the rest.

use std::fs;
use std::path::{Path, PathBuf};
use std::time::SystemTime;

use chrono::{DateTime, Local, NaiveDateTime};
use tracing::{info, warn};

use crate::config::settings::BackupRetention;
use crate::error::{LivrariaError, LivrariaResult};
use crate::storage::file_io::copy_atomic;

/// File name prefix shared by every snapshot
pub const SNAPSHOT_PREFIX: &str = "backup_livraria_";

/// File extension of every snapshot
pub const SNAPSHOT_EXTENSION: &str = "db";

const TIMESTAMP_FORMAT: &str = "%Y-%m-%d-%H-%M-%S";

/// Metadata about a snapshot
#[derive(Debug, Clone)]
pub struct SnapshotInfo {
    /// Snapshot filename
    pub filename: String,
    /// Full path to the snapshot
    pub path: PathBuf,
    /// Last modification time; this is what retention orders by
    pub modified: SystemTime,
    /// Creation time encoded in the filename, if it parses
    pub created_at: Option<NaiveDateTime>,
    /// Size in bytes
    pub size_bytes: u64,
}

/// Manages snapshot creation and retention
pub struct BackupManager {
    /// Directory holding the snapshots
    backup_dir: PathBuf,
    /// The catalog database that gets copied
    catalog_file: PathBuf,
    /// Retention policy
    retention: BackupRetention,
}

impl BackupManager {
    /// Create a new BackupManager
    pub fn new(backup_dir: PathBuf, catalog_file: PathBuf, retention: BackupRetention) -> Self {
        Self {
            backup_dir,
            catalog_file,
            retention,
        }
    }

    /// Copy the catalog file into a new snapshot
    ///
    /// The backup directory must already exist. Returns the path of the
    /// created snapshot; no existing snapshot is modified.
    pub fn create_snapshot(&self) -> LivrariaResult<PathBuf> {
        self.create_snapshot_at(Local::now())
    }

    /// Create a snapshot named after `now`
    ///
    /// If a snapshot for the same second already exists, a `_2`, `_3`, ...
    /// suffix is appended instead of overwriting it.
    pub(crate) fn create_snapshot_at(&self, now: DateTime<Local>) -> LivrariaResult<PathBuf> {
        if !self.catalog_file.is_file() {
            return Err(LivrariaError::Io(format!(
                "Catalog file not found: {}",
                self.catalog_file.display()
            )));
        }

        if !self.backup_dir.is_dir() {
            return Err(LivrariaError::Io(format!(
                "Backup directory not found: {}",
                self.backup_dir.display()
            )));
        }

        let stamp = now.format(TIMESTAMP_FORMAT).to_string();
        let snapshot_path = self.unused_snapshot_path(&stamp);

        let bytes = copy_atomic(&self.catalog_file, &snapshot_path)?;
        info!(snapshot = %snapshot_path.display(), bytes, "created snapshot");

        Ok(snapshot_path)
    }

    fn unused_snapshot_path(&self, stamp: &str) -> PathBuf {
        let base = self
            .backup_dir
            .join(format!("{SNAPSHOT_PREFIX}{stamp}.{SNAPSHOT_EXTENSION}"));
        if !base.exists() {
            return base;
        }

        (2u32..)
            .map(|n| {
                self.backup_dir
                    .join(format!("{SNAPSHOT_PREFIX}{stamp}_{n}.{SNAPSHOT_EXTENSION}"))
            })
            .find(|candidate| !candidate.exists())
            .unwrap_or(base)
    }

    /// List all snapshots, most recently modified first
    pub fn list_snapshots(&self) -> LivrariaResult<Vec<SnapshotInfo>> {
        if !self.backup_dir.exists() {
            return Ok(Vec::new());
        }

        let mut snapshots = Vec::new();

        for entry in fs::read_dir(&self.backup_dir).map_err(|e| {
            LivrariaError::Io(format!("Failed to read backup directory: {}", e))
        })? {
            let entry = entry.map_err(|e| {
                LivrariaError::Io(format!("Failed to read directory entry: {}", e))
            })?;

            let filename = entry.file_name().to_string_lossy().to_string();
            if !is_snapshot_name(&filename) {
                continue;
            }

            // A snapshot deleted between read_dir and metadata is simply gone
            let Ok(metadata) = entry.metadata() else {
                continue;
            };

            snapshots.push(SnapshotInfo {
                created_at: parse_snapshot_timestamp(&filename),
                path: entry.path(),
                modified: metadata.modified()?,
                size_bytes: metadata.len(),
                filename,
            });
        }

        snapshots.sort_by(|a, b| {
            b.modified
                .cmp(&a.modified)
                .then_with(|| b.created_at.cmp(&a.created_at))
                .then_with(|| snapshot_sequence(&b.filename).cmp(&snapshot_sequence(&a.filename)))
                .then_with(|| b.filename.cmp(&a.filename))
        });

        Ok(snapshots)
    }

    /// Delete all but the `keep` most recently modified snapshots
    ///
    /// Deletion continues past individual failures. Returns the deleted
    /// paths; if any deletion failed, returns `Prune` once every candidate
    /// has been attempted.
    pub fn prune_snapshots(&self, keep: usize) -> LivrariaResult<Vec<PathBuf>> {
        let snapshots = self.list_snapshots()?;
        let mut deleted = Vec::new();
        let mut failed = Vec::new();

        for snapshot in snapshots.into_iter().skip(keep) {
            match fs::remove_file(&snapshot.path) {
                Ok(()) => {
                    info!(snapshot = %snapshot.filename, "deleted old snapshot");
                    deleted.push(snapshot.path);
                }
                Err(e) => {
                    warn!(snapshot = %snapshot.filename, error = %e, "failed to delete old snapshot");
                    failed.push(format!("{}: {}", snapshot.filename, e));
                }
            }
        }

        if failed.is_empty() {
            Ok(deleted)
        } else {
            Err(LivrariaError::Prune {
                deleted: deleted.len(),
                failed,
            })
        }
    }

    /// Enforce the configured retention policy
    pub fn enforce_retention(&self) -> LivrariaResult<Vec<PathBuf>> {
        self.prune_snapshots(self.retention.keep)
    }

    /// Create a snapshot and then enforce the retention policy
    ///
    /// Nothing is pruned if the snapshot could not be created.
    pub fn create_snapshot_with_retention(&self) -> LivrariaResult<(PathBuf, Vec<PathBuf>)> {
        let snapshot = self.create_snapshot()?;
        let pruned = self.enforce_retention()?;
        Ok((snapshot, pruned))
    }

    /// Get backup directory path
    pub fn backup_dir(&self) -> &Path {
        &self.backup_dir
    }

    /// Get the retention policy
    pub fn retention(&self) -> &BackupRetention {
        &self.retention
    }

    /// Get a specific snapshot by filename
    pub fn get_snapshot(&self, filename: &str) -> LivrariaResult<Option<SnapshotInfo>> {
        Ok(self
            .list_snapshots()?
            .into_iter()
            .find(|s| s.filename == filename))
    }

    /// Get the most recent snapshot
    pub fn latest_snapshot(&self) -> LivrariaResult<Option<SnapshotInfo>> {
        Ok(self.list_snapshots()?.into_iter().next())
    }
}

/// Whether a file name follows the snapshot naming pattern
pub fn is_snapshot_name(filename: &str) -> bool {
    filename.starts_with(SNAPSHOT_PREFIX)
        && Path::new(filename)
            .extension()
            .is_some_and(|ext| ext == SNAPSHOT_EXTENSION)
}

/// Parse the creation time from a snapshot filename
///
/// Accepts both `backup_livraria_<stamp>.db` and the collision form
/// `backup_livraria_<stamp>_<n>.db`.
pub fn parse_snapshot_timestamp(filename: &str) -> Option<NaiveDateTime> {
    let stem = filename
        .strip_prefix(SNAPSHOT_PREFIX)?
        .strip_suffix(SNAPSHOT_EXTENSION)?
        .strip_suffix('.')?;
    let stamp = stem.split('_').next()?;
    NaiveDateTime::parse_from_str(stamp, TIMESTAMP_FORMAT).ok()
}

/// Position of a snapshot among those created in the same second
///
/// The plain name is 1; the collision form `_<n>` is n.
fn snapshot_sequence(filename: &str) -> u32 {
    filename
        .strip_prefix(SNAPSHOT_PREFIX)
        .and_then(|rest| rest.strip_suffix(SNAPSHOT_EXTENSION))
        .and_then(|rest| rest.strip_suffix('.'))
        .and_then(|stem| stem.split_once('_'))
        .and_then(|(_, n)| n.parse().ok())
        .unwrap_or(1)
}
