//! Snapshot restoration for Livraria
//!
//! Validates that a snapshot is a readable catalog and copies it back over
//! the catalog database.

use std::path::{Path, PathBuf};
use std::time::SystemTime;

use rusqlite::{Connection, OpenFlags};
use tracing::info;

use crate::error::{LivrariaError, LivrariaResult};
use crate::storage::file_io::copy_atomic;

/// Handles restoring the catalog from snapshots
pub struct RestoreManager {
    catalog_file: PathBuf,
}

impl RestoreManager {
    /// Create a new RestoreManager for the given catalog database
    pub fn new(catalog_file: PathBuf) -> Self {
        Self { catalog_file }
    }

    /// Replace the catalog database with the snapshot at `snapshot_path`
    ///
    /// The snapshot is validated first. The catalog store must not be open
    /// while restoring. It's recommended to take a snapshot of the current
    /// catalog before restoring.
    pub fn restore_from_file(&self, snapshot_path: &Path) -> LivrariaResult<RestoreResult> {
        let validation = self.validate_snapshot(snapshot_path)?;

        copy_atomic(snapshot_path, &self.catalog_file)?;
        info!(
            snapshot = %snapshot_path.display(),
            books = validation.book_count,
            "restored catalog from snapshot"
        );

        Ok(RestoreResult {
            snapshot: snapshot_path.to_path_buf(),
            book_count: validation.book_count,
        })
    }

    /// Validate a snapshot without restoring it
    pub fn validate_snapshot(&self, snapshot_path: &Path) -> LivrariaResult<ValidationResult> {
        let metadata = std::fs::metadata(snapshot_path).map_err(|e| {
            LivrariaError::Io(format!(
                "Failed to read snapshot {}: {}",
                snapshot_path.display(),
                e
            ))
        })?;

        let conn = Connection::open_with_flags(
            snapshot_path,
            OpenFlags::SQLITE_OPEN_READ_ONLY | OpenFlags::SQLITE_OPEN_NO_MUTEX,
        )?;

        let book_count: i64 = conn
            .query_row("SELECT COUNT(*) FROM books", [], |row| row.get(0))
            .map_err(|e| {
                LivrariaError::Validation(format!(
                    "{} is not a catalog snapshot: {}",
                    snapshot_path.display(),
                    e
                ))
            })?;

        Ok(ValidationResult {
            book_count: book_count as usize,
            size_bytes: metadata.len(),
            modified: metadata.modified()?,
        })
    }
}

/// Result of a restore operation
#[derive(Debug)]
pub struct RestoreResult {
    /// The snapshot that was restored
    pub snapshot: PathBuf,
    /// Number of books in the restored catalog
    pub book_count: usize,
}

impl RestoreResult {
    /// Get a summary of what was restored
    pub fn summary(&self) -> String {
        format!(
            "Restored {} book(s) from {}",
            self.book_count,
            self.snapshot
                .file_name()
                .map(|n| n.to_string_lossy().to_string())
                .unwrap_or_else(|| self.snapshot.display().to_string())
        )
    }
}

/// Result of validating a snapshot
#[derive(Debug)]
pub struct ValidationResult {
    /// Number of books in the snapshot
    pub book_count: usize,
    /// Size in bytes
    pub size_bytes: u64,
    /// Last modification time
    pub modified: SystemTime,
}
