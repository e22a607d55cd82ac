//! Custom error types for Livraria
//!
//! This module defines the error hierarchy for the application using thiserror
//! for ergonomic error definitions.

use thiserror::Error;

/// The main error type for Livraria operations
#[derive(Error, Debug)]
pub enum LivrariaError {
    /// Configuration-related errors
    #[error("Configuration error: {0}")]
    Config(String),

    /// File I/O errors
    #[error("I/O error: {0}")]
    Io(String),

    /// JSON serialization/deserialization errors
    #[error("JSON error: {0}")]
    Json(String),

    /// SQLite errors from the catalog store
    #[error("Database error: {0}")]
    Database(String),

    /// Validation errors for book records
    #[error("Validation error: {0}")]
    Validation(String),

    /// Malformed field in an imported row (row numbers are 1-based, header excluded)
    #[error("Parse error on row {row}: {message}")]
    Parse { row: usize, message: String },

    /// Entity not found errors
    #[error("{entity_type} not found: {identifier}")]
    NotFound {
        entity_type: &'static str,
        identifier: String,
    },

    /// Import errors
    #[error("Import error: {0}")]
    Import(String),

    /// Export errors
    #[error("Export error: {0}")]
    Export(String),

    /// Some old snapshots could not be deleted; the others were
    #[error("Failed to delete {} old snapshot(s) ({deleted} deleted): {}", failed.len(), failed.join("; "))]
    Prune { deleted: usize, failed: Vec<String> },

    /// The catalog change was committed but the backup that follows it failed
    #[error("Change saved, but backup failed: {source}")]
    BackupAfterCommit {
        #[source]
        source: Box<LivrariaError>,
    },

    /// The catalog change was committed but its audit entry could not be written
    #[error("Change saved, but audit log failed: {source}")]
    AuditAfterCommit {
        /// Snapshot taken after the change, if one was
        snapshot: Option<std::path::PathBuf>,
        #[source]
        source: Box<LivrariaError>,
    },
}

impl LivrariaError {
    /// Create a "not found" error for books
    pub fn book_not_found(identifier: impl Into<String>) -> Self {
        Self::NotFound {
            entity_type: "Book",
            identifier: identifier.into(),
        }
    }

    /// Create a "not found" error for snapshots
    pub fn snapshot_not_found(identifier: impl Into<String>) -> Self {
        Self::NotFound {
            entity_type: "Snapshot",
            identifier: identifier.into(),
        }
    }

    /// Wrap an error raised by the snapshot/prune step of a committed mutation
    pub fn after_commit(source: LivrariaError) -> Self {
        Self::BackupAfterCommit {
            source: Box::new(source),
        }
    }

    /// Wrap an error raised while auditing a committed mutation
    pub fn audit_after_commit(snapshot: Option<std::path::PathBuf>, source: LivrariaError) -> Self {
        Self::AuditAfterCommit {
            snapshot,
            source: Box::new(source),
        }
    }

    /// Check if the change this error belongs to was committed anyway
    pub fn is_after_commit(&self) -> bool {
        matches!(
            self,
            Self::BackupAfterCommit { .. } | Self::AuditAfterCommit { .. }
        )
    }

    /// Check if this is a "not found" error
    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::NotFound { .. })
    }

    /// Check if this is a filesystem error (including partial prunes)
    pub fn is_io(&self) -> bool {
        matches!(self, Self::Io(_) | Self::Prune { .. })
    }

    /// Check if this is a parse error
    pub fn is_parse(&self) -> bool {
        matches!(self, Self::Parse { .. })
    }

    /// Check if this is a validation error
    pub fn is_validation(&self) -> bool {
        matches!(self, Self::Validation(_))
    }
}

// Implement From traits for common error types

impl From<std::io::Error> for LivrariaError {
    fn from(err: std::io::Error) -> Self {
        Self::Io(err.to_string())
    }
}

impl From<serde_json::Error> for LivrariaError {
    fn from(err: serde_json::Error) -> Self {
        Self::Json(err.to_string())
    }
}

impl From<rusqlite::Error> for LivrariaError {
    fn from(err: rusqlite::Error) -> Self {
        Self::Database(err.to_string())
    }
}

impl From<csv::Error> for LivrariaError {
    fn from(err: csv::Error) -> Self {
        if err.is_io_error() {
            Self::Io(err.to_string())
        } else {
            Self::Import(err.to_string())
        }
    }
}

/// Result type alias for Livraria operations
pub type LivrariaResult<T> = Result<T, LivrariaError>;
