//! Storage layer for Livraria
//!
//! Provides the SQLite catalog store, atomic file copies, and the `Storage`
//! coordinator that owns the store together with the backup manager and
//! audit log for one session.

pub mod catalog;
pub mod file_io;

pub use catalog::CatalogStore;
pub use file_io::copy_atomic;

use crate::audit::{AuditEntry, AuditLogger};
use crate::backup::BackupManager;
use crate::config::paths::LivrariaPaths;
use crate::config::settings::Settings;
use crate::error::LivrariaError;

/// Main storage coordinator
pub struct Storage {
    paths: LivrariaPaths,
    settings: Settings,
    pub catalog: CatalogStore,
    pub backups: BackupManager,
    pub audit: AuditLogger,
}

impl Storage {
    /// Open the catalog for a session, creating the directory layout first
    pub fn open(paths: LivrariaPaths, settings: Settings) -> Result<Self, LivrariaError> {
        paths.ensure_directories()?;

        Ok(Self {
            catalog: CatalogStore::open(paths.catalog_file())?,
            backups: BackupManager::new(
                paths.backup_dir(),
                paths.catalog_file(),
                settings.backup_retention.clone(),
            ),
            audit: AuditLogger::new(paths.audit_log()),
            paths,
            settings,
        })
    }

    /// Get the paths configuration
    pub fn paths(&self) -> &LivrariaPaths {
        &self.paths
    }

    /// Get the session settings
    pub fn settings(&self) -> &Settings {
        &self.settings
    }

    /// Append an entry to the audit log
    pub fn log(&self, entry: AuditEntry) -> Result<(), LivrariaError> {
        self.audit.log(&entry)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_storage_creation() {
        let temp_dir = TempDir::new().unwrap();
        let paths = LivrariaPaths::with_base_dir(temp_dir.path().to_path_buf());
        let storage = Storage::open(paths, Settings::default()).unwrap();

        assert!(temp_dir.path().join("data").join("livraria.db").exists());
        assert!(temp_dir.path().join("backups").exists());
        assert!(temp_dir.path().join("exports").exists());
        assert_eq!(storage.catalog.count().unwrap(), 0);
        assert_eq!(storage.backups.retention().keep, 5);
    }
}
