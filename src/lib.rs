//! Livraria - bookstore catalog manager
//!
//! This library keeps a catalog of books in a local SQLite database and
//! protects it with timestamped snapshots: every committed change is
//! followed by exactly one snapshot, and only the most recent snapshots are
//! kept.
//!
//! # Architecture
//!
//! The crate is organized into the following modules:
//!
//! - `config`: Configuration and path management
//! - `error`: Custom error types
//! - `models`: Book records and ids
//! - `storage`: SQLite catalog store and atomic file copies
//! - `backup`: Snapshot creation, retention and restore
//! - `services`: Business logic (protected mutations, CSV transfer)
//! - `audit`: Audit logging of catalog changes
//! - `display`: Terminal formatting
//! - `cli`: Command handlers
//!
//! # Example
//!
//! ```rust,ignore
//! use livraria::config::{LivrariaPaths, Settings};
//! use livraria::models::NewBook;
//! use livraria::services::CatalogService;
//! use livraria::storage::Storage;
//!
//! let paths = LivrariaPaths::new()?;
//! let settings = Settings::load_or_create(&paths)?;
//! let storage = Storage::open(paths, settings)?;
//!
//! let committed = CatalogService::new(&storage)
//!     .add_book(NewBook::new("o hobbit", "tolkien", 1937, 49.90))?;
//! println!("snapshot at {}", committed.snapshot.display());
//! ```

pub mod audit;
pub mod backup;
pub mod cli;
pub mod config;
pub mod display;
pub mod error;
pub mod models;
pub mod services;
pub mod storage;

pub use error::{LivrariaError, LivrariaResult};
