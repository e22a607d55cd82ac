//! Audit logging for Livraria
//!
//! Records every committed catalog change (add, price update, removal,
//! import, restore) in an append-only JSON-lines log next to the catalog.
//!
//! # Example
//!
//! ```rust,ignore
//! use livraria::audit::{AuditEntry, AuditLogger};
//!
//! let logger = AuditLogger::new(paths.audit_log());
//! logger.log(&AuditEntry::create(&book))?;
//! ```

mod entry;
mod logger;

pub use entry::{AuditEntry, Operation};
pub use logger::AuditLogger;
