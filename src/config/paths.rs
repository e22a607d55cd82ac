//! Path management for Livraria
//!
//! Provides path resolution for the catalog database, snapshots, exports and
//! settings.
//!
//! ## Path Resolution Order
//!
//! 1. `LIVRARIA_HOME` environment variable (if set)
//! 2. The platform data directory (`~/.local/share/livraria` on Linux)

use std::path::PathBuf;

use crate::error::LivrariaError;

/// Environment variable overriding the base directory
pub const HOME_ENV_VAR: &str = "LIVRARIA_HOME";

/// Manages all paths used by Livraria
#[derive(Debug, Clone)]
pub struct LivrariaPaths {
    /// Base directory for all Livraria data
    base_dir: PathBuf,
}

impl LivrariaPaths {
    /// Create a new LivrariaPaths instance
    ///
    /// # Errors
    ///
    /// Returns an error if no platform data directory can be determined.
    pub fn new() -> Result<Self, LivrariaError> {
        let base_dir = if let Ok(custom) = std::env::var(HOME_ENV_VAR) {
            PathBuf::from(custom)
        } else {
            resolve_default_path()?
        };

        Ok(Self { base_dir })
    }

    /// Create LivrariaPaths with a custom base directory
    pub fn with_base_dir(base_dir: PathBuf) -> Self {
        Self { base_dir }
    }

    /// Get the base directory
    pub fn base_dir(&self) -> &PathBuf {
        &self.base_dir
    }

    /// Get the data directory (<base>/data/)
    pub fn data_dir(&self) -> PathBuf {
        self.base_dir.join("data")
    }

    /// Get the backup directory (<base>/backups/)
    pub fn backup_dir(&self) -> PathBuf {
        self.base_dir.join("backups")
    }

    /// Get the export directory (<base>/exports/)
    pub fn export_dir(&self) -> PathBuf {
        self.base_dir.join("exports")
    }

    /// Get the path to the catalog database
    pub fn catalog_file(&self) -> PathBuf {
        self.data_dir().join("livraria.db")
    }

    /// Get the path of the default CSV export
    pub fn export_file(&self) -> PathBuf {
        self.export_dir().join("livros_exportados.csv")
    }

    /// Resolve a user-supplied import file name
    ///
    /// Relative names are looked up in the export directory.
    pub fn resolve_import_file(&self, name: &str) -> PathBuf {
        let path = PathBuf::from(name);
        if path.is_absolute() {
            path
        } else {
            self.export_dir().join(path)
        }
    }

    /// Get the path to the settings file
    pub fn settings_file(&self) -> PathBuf {
        self.base_dir.join("config.json")
    }

    /// Get the path to the audit log
    pub fn audit_log(&self) -> PathBuf {
        self.base_dir.join("audit.log")
    }

    /// Ensure all required directories exist
    ///
    /// Creates the base, data, backup and export directories.
    pub fn ensure_directories(&self) -> Result<(), LivrariaError> {
        std::fs::create_dir_all(&self.base_dir)
            .map_err(|e| LivrariaError::Io(format!("Failed to create base directory: {}", e)))?;

        std::fs::create_dir_all(self.data_dir())
            .map_err(|e| LivrariaError::Io(format!("Failed to create data directory: {}", e)))?;

        std::fs::create_dir_all(self.backup_dir())
            .map_err(|e| LivrariaError::Io(format!("Failed to create backup directory: {}", e)))?;

        std::fs::create_dir_all(self.export_dir())
            .map_err(|e| LivrariaError::Io(format!("Failed to create export directory: {}", e)))?;

        Ok(())
    }

    /// Check if the catalog database has been created
    pub fn is_initialized(&self) -> bool {
        self.catalog_file().exists()
    }
}

fn resolve_default_path() -> Result<PathBuf, LivrariaError> {
    let dirs = directories::ProjectDirs::from("", "", "livraria").ok_or_else(|| {
        LivrariaError::Config(format!(
            "Could not determine a data directory; set {}",
            HOME_ENV_VAR
        ))
    })?;
    Ok(dirs.data_dir().to_path_buf())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::env;
    use tempfile::TempDir;

    #[test]
    fn test_custom_base_dir() {
        let temp_dir = TempDir::new().unwrap();
        let paths = LivrariaPaths::with_base_dir(temp_dir.path().to_path_buf());

        assert_eq!(paths.base_dir(), temp_dir.path());
        assert_eq!(paths.data_dir(), temp_dir.path().join("data"));
        assert_eq!(paths.backup_dir(), temp_dir.path().join("backups"));
        assert_eq!(paths.export_dir(), temp_dir.path().join("exports"));
    }

    #[test]
    fn test_env_var_override() {
        let temp_dir = TempDir::new().unwrap();
        let custom_path = temp_dir.path().to_str().unwrap();

        env::set_var(HOME_ENV_VAR, custom_path);

        let paths = LivrariaPaths::new().unwrap();
        assert_eq!(paths.base_dir(), temp_dir.path());

        env::remove_var(HOME_ENV_VAR);
    }

    #[test]
    fn test_ensure_directories() {
        let temp_dir = TempDir::new().unwrap();
        let paths = LivrariaPaths::with_base_dir(temp_dir.path().join("meu_sistema_livraria"));

        paths.ensure_directories().unwrap();

        assert!(paths.data_dir().exists());
        assert!(paths.backup_dir().exists());
        assert!(paths.export_dir().exists());
        assert!(!paths.is_initialized());
    }

    #[test]
    fn test_file_paths() {
        let temp_dir = TempDir::new().unwrap();
        let paths = LivrariaPaths::with_base_dir(temp_dir.path().to_path_buf());

        assert_eq!(
            paths.catalog_file(),
            temp_dir.path().join("data").join("livraria.db")
        );
        assert_eq!(
            paths.export_file(),
            temp_dir.path().join("exports").join("livros_exportados.csv")
        );
        assert_eq!(paths.settings_file(), temp_dir.path().join("config.json"));
    }

    #[test]
    fn test_resolve_import_file() {
        let temp_dir = TempDir::new().unwrap();
        let paths = LivrariaPaths::with_base_dir(temp_dir.path().to_path_buf());

        assert_eq!(
            paths.resolve_import_file("novos.csv"),
            temp_dir.path().join("exports").join("novos.csv")
        );

        let absolute = temp_dir.path().join("elsewhere.csv");
        assert_eq!(
            paths.resolve_import_file(absolute.to_str().unwrap()),
            absolute
        );
    }
}
