//! Configuration module for Livraria
//!
//! This module provides configuration management including:
//! - Path resolution for the catalog, snapshots and exports
//! - User settings persistence

pub mod paths;
pub mod settings;

pub use paths::LivrariaPaths;
pub use settings::{BackupRetention, Settings};
