//! Audit entry data structures
//!
//! One entry per committed catalog change: single-book mutations carry the
//! record before and/or after the change, batch operations carry a summary.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::models::{Book, BookId};

/// Kinds of catalog changes that are audited
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Operation {
    /// A book was added
    Create,
    /// A book's price changed
    Update,
    /// A book was removed
    Delete,
    /// A CSV batch was imported
    Import,
    /// The catalog was replaced by a snapshot
    Restore,
}

impl std::fmt::Display for Operation {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Operation::Create => write!(f, "CREATE"),
            Operation::Update => write!(f, "UPDATE"),
            Operation::Delete => write!(f, "DELETE"),
            Operation::Import => write!(f, "IMPORT"),
            Operation::Restore => write!(f, "RESTORE"),
        }
    }
}

/// A single audit log entry
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AuditEntry {
    /// When the change was committed (UTC)
    pub timestamp: DateTime<Utc>,

    /// Type of change
    pub operation: Operation,

    /// Affected book, for single-book changes
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub book_id: Option<BookId>,

    /// Title of the affected book
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,

    /// The record before the change (updates/deletes)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub before: Option<Book>,

    /// The record after the change (creates/updates)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub after: Option<Book>,

    /// Human-readable summary
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub summary: Option<String>,
}

impl AuditEntry {
    fn blank(operation: Operation) -> Self {
        Self {
            timestamp: Utc::now(),
            operation,
            book_id: None,
            title: None,
            before: None,
            after: None,
            summary: None,
        }
    }

    /// Entry for an added book
    pub fn create(book: &Book) -> Self {
        Self {
            book_id: Some(book.id),
            title: Some(book.title.clone()),
            after: Some(book.clone()),
            ..Self::blank(Operation::Create)
        }
    }

    /// Entry for a price change
    pub fn update(before: &Book, after: &Book) -> Self {
        Self {
            book_id: Some(after.id),
            title: Some(after.title.clone()),
            before: Some(before.clone()),
            after: Some(after.clone()),
            summary: Some(format!("price: {:.2} -> {:.2}", before.price, after.price)),
            ..Self::blank(Operation::Update)
        }
    }

    /// Entry for a removed book
    pub fn delete(book: &Book) -> Self {
        Self {
            book_id: Some(book.id),
            title: Some(book.title.clone()),
            before: Some(book.clone()),
            ..Self::blank(Operation::Delete)
        }
    }

    /// Entry for a CSV batch import
    pub fn import(count: usize, source: &str) -> Self {
        Self {
            summary: Some(format!("{} book(s) from {}", count, source)),
            ..Self::blank(Operation::Import)
        }
    }

    /// Entry for a restore from a snapshot
    pub fn restore(snapshot: &str) -> Self {
        Self {
            summary: Some(format!("catalog replaced by {}", snapshot)),
            ..Self::blank(Operation::Restore)
        }
    }

    /// Format the entry for human-readable output
    pub fn format_human_readable(&self) -> String {
        let mut output = format!(
            "[{}] {}",
            self.timestamp.format("%Y-%m-%d %H:%M:%S UTC"),
            self.operation
        );

        if let Some(id) = self.book_id {
            output.push_str(&format!(" #{}", id));
        }

        if let Some(title) = &self.title {
            output.push_str(&format!(" ({})", title));
        }

        if let Some(summary) = &self.summary {
            output.push_str(&format!("\n  {}", summary));
        }

        output
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn hobbit(price: f64) -> Book {
        Book {
            id: BookId::from_raw(1),
            title: "o hobbit".into(),
            author: "tolkien".into(),
            publication_year: 1937,
            price,
        }
    }

    #[test]
    fn test_operation_display() {
        assert_eq!(Operation::Create.to_string(), "CREATE");
        assert_eq!(Operation::Import.to_string(), "IMPORT");
        assert_eq!(Operation::Restore.to_string(), "RESTORE");
    }

    #[test]
    fn test_create_entry() {
        let entry = AuditEntry::create(&hobbit(49.9));

        assert_eq!(entry.operation, Operation::Create);
        assert_eq!(entry.book_id, Some(BookId::from_raw(1)));
        assert!(entry.before.is_none());
        assert!(entry.after.is_some());
    }

    #[test]
    fn test_update_entry() {
        let entry = AuditEntry::update(&hobbit(49.9), &hobbit(39.9));

        assert_eq!(entry.operation, Operation::Update);
        assert_eq!(entry.summary.as_deref(), Some("price: 49.90 -> 39.90"));
    }

    #[test]
    fn test_batch_entry_has_no_book() {
        let entry = AuditEntry::import(3, "livros.csv");

        let json = serde_json::to_string(&entry).unwrap();
        assert!(!json.contains("book_id"));

        let deserialized: AuditEntry = serde_json::from_str(&json).unwrap();
        assert_eq!(deserialized.operation, Operation::Import);
        assert_eq!(deserialized.summary.as_deref(), Some("3 book(s) from livros.csv"));
    }

    #[test]
    fn test_human_readable_format() {
        let formatted = AuditEntry::delete(&hobbit(49.9)).format_human_readable();
        assert!(formatted.contains("DELETE"));
        assert!(formatted.contains("#1"));
        assert!(formatted.contains("o hobbit"));
    }
}
