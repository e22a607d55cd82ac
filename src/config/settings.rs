//! User settings for Livraria
//!
//! Manages user preferences including the snapshot retention policy.

use serde::{Deserialize, Serialize};

use super::paths::LivrariaPaths;
use crate::error::LivrariaError;

/// Default number of snapshots kept in the backup directory
pub const DEFAULT_KEEP: usize = 5;

/// Backup retention settings
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BackupRetention {
    /// Number of most recent snapshots to keep
    #[serde(default = "default_keep")]
    pub keep: usize,
}

impl Default for BackupRetention {
    fn default() -> Self {
        Self {
            keep: default_keep(),
        }
    }
}

/// User settings for Livraria
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Settings {
    /// Schema version for migration support
    #[serde(default = "default_schema_version")]
    pub schema_version: u32,

    /// Snapshot retention policy
    #[serde(default)]
    pub backup_retention: BackupRetention,

    /// Whether a CSV import takes one snapshot for the whole batch
    #[serde(default = "default_backup_on_import")]
    pub backup_on_import: bool,

    /// Currency symbol used when printing prices
    #[serde(default = "default_currency")]
    pub currency_symbol: String,
}

fn default_schema_version() -> u32 {
    1
}

fn default_keep() -> usize {
    DEFAULT_KEEP
}

fn default_backup_on_import() -> bool {
    true
}

fn default_currency() -> String {
    "R$".to_string()
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            schema_version: default_schema_version(),
            backup_retention: BackupRetention::default(),
            backup_on_import: default_backup_on_import(),
            currency_symbol: default_currency(),
        }
    }
}

impl Settings {
    /// Load settings from disk, or create default settings if file doesn't exist
    pub fn load_or_create(paths: &LivrariaPaths) -> Result<Self, LivrariaError> {
        let settings_path = paths.settings_file();

        if settings_path.exists() {
            let contents = std::fs::read_to_string(&settings_path).map_err(|e| {
                LivrariaError::Io(format!("Failed to read settings file: {}", e))
            })?;

            let settings: Settings = serde_json::from_str(&contents).map_err(|e| {
                LivrariaError::Config(format!("Failed to parse settings file: {}", e))
            })?;

            Ok(settings)
        } else {
            // Don't save yet - let caller decide when to persist
            Ok(Settings::default())
        }
    }

    /// Save settings to disk
    pub fn save(&self, paths: &LivrariaPaths) -> Result<(), LivrariaError> {
        paths.ensure_directories()?;

        let settings_path = paths.settings_file();
        let contents = serde_json::to_string_pretty(self).map_err(|e| {
            LivrariaError::Config(format!("Failed to serialize settings: {}", e))
        })?;

        std::fs::write(&settings_path, contents).map_err(|e| {
            LivrariaError::Io(format!("Failed to write settings file: {}", e))
        })?;

        Ok(())
    }
}
