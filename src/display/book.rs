//! Book display formatting
//!
//! Formats books for terminal output in table and detail views.

use tabled::settings::Style;
use tabled::{Table, Tabled};

use crate::models::Book;

#[derive(Tabled)]
struct BookRow {
    #[tabled(rename = "Id")]
    id: String,
    #[tabled(rename = "Título")]
    title: String,
    #[tabled(rename = "Autor")]
    author: String,
    #[tabled(rename = "Ano")]
    year: i32,
    #[tabled(rename = "Preço")]
    price: String,
}

/// Format a price with the configured currency symbol
pub fn format_price(price: f64, currency_symbol: &str) -> String {
    format!("{} {:.2}", currency_symbol, price)
}

/// Format a list of books as a table
pub fn format_book_list(books: &[Book], currency_symbol: &str) -> String {
    if books.is_empty() {
        return "No books found.".to_string();
    }

    let rows = books.iter().map(|book| BookRow {
        id: book.id.to_string(),
        title: book.title.clone(),
        author: book.author.clone(),
        year: book.publication_year,
        price: format_price(book.price, currency_symbol),
    });

    let mut table = Table::new(rows);
    table.with(Style::modern());

    format!("{}\n{} book(s)", table, books.len())
}

/// Format a single book
pub fn format_book_details(book: &Book, currency_symbol: &str) -> String {
    format!(
        "Book #{}\n  Title:  {}\n  Author: {}\n  Year:   {}\n  Price:  {}",
        book.id,
        book.title,
        book.author,
        book.publication_year,
        format_price(book.price, currency_symbol)
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::BookId;

    fn hobbit() -> Book {
        Book {
            id: BookId::from_raw(1),
            title: "o hobbit".into(),
            author: "tolkien".into(),
            publication_year: 1937,
            price: 49.9,
        }
    }

    #[test]
    fn test_empty_list() {
        assert_eq!(format_book_list(&[], "R$"), "No books found.");
    }

    #[test]
    fn test_book_list_contains_fields() {
        let output = format_book_list(&[hobbit()], "R$");

        assert!(output.contains("Título"));
        assert!(output.contains("o hobbit"));
        assert!(output.contains("tolkien"));
        assert!(output.contains("1937"));
        assert!(output.contains("R$ 49.90"));
        assert!(output.ends_with("1 book(s)"));
    }

    #[test]
    fn test_book_details() {
        let output = format_book_details(&hobbit(), "€");
        assert!(output.starts_with("Book #1"));
        assert!(output.contains("Price:  € 49.90"));
    }
}
