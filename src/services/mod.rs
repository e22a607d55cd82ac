//! Service layer for Livraria
//!
//! The service layer provides business logic on top of the storage layer:
//! validation, the snapshot that follows every committed change, audit
//! entries, and CSV transfer.

pub mod catalog;
pub mod transfer;

pub use catalog::{CatalogService, Committed};
pub use transfer::{parse_csv, parse_price, ImportResult, TransferService};
