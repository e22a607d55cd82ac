//! Book model
//!
//! A catalog record and its id-less draft form.

use serde::{Deserialize, Serialize};
use std::fmt;

use super::ids::BookId;

/// A stored book
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Book {
    /// Unique identifier, assigned by the catalog store
    pub id: BookId,

    /// Title (used as the lookup key for price updates and removal)
    pub title: String,

    /// Author name
    pub author: String,

    /// Year of publication
    pub publication_year: i32,

    /// Price, never negative
    pub price: f64,
}

impl fmt::Display for Book {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} - {} - {} - {:.2}",
            self.title, self.author, self.publication_year, self.price
        )
    }
}

/// A book that has not been stored yet
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NewBook {
    pub title: String,
    pub author: String,
    pub publication_year: i32,
    pub price: f64,
}

impl NewBook {
    /// Create a new draft, trimming surrounding whitespace from the text fields
    pub fn new(
        title: impl Into<String>,
        author: impl Into<String>,
        publication_year: i32,
        price: f64,
    ) -> Self {
        Self {
            title: title.into().trim().to_string(),
            author: author.into().trim().to_string(),
            publication_year,
            price,
        }
    }

    /// Validate the draft
    pub fn validate(&self) -> Result<(), BookValidationError> {
        if self.title.trim().is_empty() {
            return Err(BookValidationError::EmptyTitle);
        }

        if self.author.trim().is_empty() {
            return Err(BookValidationError::EmptyAuthor);
        }

        validate_price(self.price)
    }
}

/// Check that a price is a finite, non-negative number
pub fn validate_price(price: f64) -> Result<(), BookValidationError> {
    if !price.is_finite() || price < 0.0 {
        return Err(BookValidationError::InvalidPrice(price));
    }
    Ok(())
}

/// Validation errors for books
#[derive(Debug, Clone, PartialEq)]
pub enum BookValidationError {
    EmptyTitle,
    EmptyAuthor,
    InvalidPrice(f64),
}

impl fmt::Display for BookValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::EmptyTitle => write!(f, "Book title cannot be empty"),
            Self::EmptyAuthor => write!(f, "Book author cannot be empty"),
            Self::InvalidPrice(price) => {
                write!(f, "Price must be a non-negative number, got {}", price)
            }
        }
    }
}

impl std::error::Error for BookValidationError {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_trims_text_fields() {
        let book = NewBook::new("  o hobbit ", " tolkien", 1937, 49.90);
        assert_eq!(book.title, "o hobbit");
        assert_eq!(book.author, "tolkien");
        assert!(book.validate().is_ok());
    }

    #[test]
    fn test_validation() {
        let book = NewBook::new("", "tolkien", 1937, 49.90);
        assert_eq!(book.validate(), Err(BookValidationError::EmptyTitle));

        let book = NewBook::new("o hobbit", "   ", 1937, 49.90);
        assert_eq!(book.validate(), Err(BookValidationError::EmptyAuthor));

        let book = NewBook::new("o hobbit", "tolkien", 1937, -1.0);
        assert!(matches!(
            book.validate(),
            Err(BookValidationError::InvalidPrice(_))
        ));

        let book = NewBook::new("o hobbit", "tolkien", 1937, f64::NAN);
        assert!(book.validate().is_err());
    }

    #[test]
    fn test_free_book_is_valid() {
        assert!(validate_price(0.0).is_ok());
    }

    #[test]
    fn test_display() {
        let book = Book {
            id: BookId::from_raw(1),
            title: "o hobbit".into(),
            author: "tolkien".into(),
            publication_year: 1937,
            price: 49.9,
        };
        assert_eq!(book.to_string(), "o hobbit - tolkien - 1937 - 49.90");
    }
}
