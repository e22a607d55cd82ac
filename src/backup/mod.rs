//! Backup system for Livraria
//!
//! Provides timestamped snapshots of the catalog database with a
//! keep-the-newest-N retention policy, plus restore functionality.
//!
//! # Architecture
//!
//! - `BackupManager`: Creates snapshots and prunes old ones
//! - `RestoreManager`: Validates snapshots and restores the catalog
//!
//! # Snapshot Format
//!
//! A snapshot is a byte-for-byte copy of `data/livraria.db`, stored in the
//! backup directory as `backup_livraria_<YYYY-MM-DD-HH-MM-SS>.db`. A second
//! snapshot within the same second gets a `_2`, `_3`, ... suffix instead of
//! replacing the first.
//!
//! # Retention Policy
//!
//! By default the 5 most recently modified snapshots are kept. Ordering is by
//! filesystem modification time, not by name.
//!
//! # Example
//!
//! ```rust,ignore
//! use livraria::backup::{BackupManager, RestoreManager};
//! use livraria::config::{LivrariaPaths, BackupRetention};
//!
//! let paths = LivrariaPaths::new()?;
//! let manager = BackupManager::new(
//!     paths.backup_dir(),
//!     paths.catalog_file(),
//!     BackupRetention::default(),
//! );
//!
//! let snapshot = manager.create_snapshot()?;
//! manager.enforce_retention()?;
//!
//! // Later, restore from the snapshot
//! let restore = RestoreManager::new(paths.catalog_file());
//! println!("{}", restore.restore_from_file(&snapshot)?.summary());
//! ```

mod manager;
mod restore;

pub use manager::{
    is_snapshot_name, parse_snapshot_timestamp, BackupManager, SnapshotInfo, SNAPSHOT_EXTENSION,
    SNAPSHOT_PREFIX,
};
pub use restore::{RestoreManager, RestoreResult, ValidationResult};
