//! Book CLI commands
//!
//! Implements CLI commands for catalog management.

use clap::Subcommand;

use crate::display::book::{format_book_details, format_book_list, format_price};
use crate::error::{LivrariaError, LivrariaResult};
use crate::models::{BookId, NewBook};
use crate::services::{parse_price, CatalogService, Committed};
use crate::storage::Storage;

/// Book subcommands
#[derive(Subcommand)]
pub enum BookCommands {
    /// Add a book to the catalog
    Add {
        /// Title
        title: String,
        /// Author
        author: String,
        /// Year of publication
        year: i32,
        /// Price (e.g., "49.90" or "49,90")
        #[arg(value_parser = parse_price_arg)]
        price: f64,
    },
    /// List all books
    List,
    /// Show one book
    Show {
        /// Book ID
        id: BookId,
    },
    /// Change the price of the book(s) with a title
    UpdatePrice {
        /// Title of the book
        title: String,
        /// New price
        #[arg(value_parser = parse_price_arg)]
        price: f64,
    },
    /// Remove the book(s) with a title
    Remove {
        /// Title of the book
        title: String,
    },
    /// List the books of one author
    ByAuthor {
        /// Author name
        author: String,
    },
}

/// Handle a book command
pub fn handle_book_command(storage: &Storage, cmd: BookCommands) -> LivrariaResult<()> {
    let service = CatalogService::new(storage);
    let currency = storage.settings().currency_symbol.as_str();

    match cmd {
        BookCommands::Add {
            title,
            author,
            year,
            price,
        } => {
            let committed = service.add_book(NewBook::new(title, author, year, price))?;
            println!("Added book #{}: {}", committed.value.id, committed.value);
            report_backup(&committed);
        }

        BookCommands::List => {
            let books = service.list_books()?;
            println!("{}", format_book_list(&books, currency));
        }

        BookCommands::Show { id } => match service.get_book(id)? {
            Some(book) => println!("{}", format_book_details(&book, currency)),
            None => return Err(LivrariaError::book_not_found(format!("#{}", id))),
        },

        BookCommands::UpdatePrice { title, price } => {
            let committed = service.update_price(&title, price)?;
            println!(
                "Updated price of {} book(s) titled '{}' to {}",
                committed.value,
                title,
                format_price(price, currency)
            );
            report_backup(&committed);
        }

        BookCommands::Remove { title } => {
            let committed = service.remove_book(&title)?;
            println!("Removed {} book(s) titled '{}'", committed.value, title);
            report_backup(&committed);
        }

        BookCommands::ByAuthor { author } => {
            let books = service.find_by_author(&author)?;
            if books.is_empty() {
                println!("No books by '{}' found.", author.trim());
            } else {
                println!("{}", format_book_list(&books, currency));
            }
        }
    }

    Ok(())
}

/// Print the snapshot taken after a committed change
pub fn report_backup<T>(committed: &Committed<T>) {
    println!("Snapshot: {}", committed.snapshot.display());
    if !committed.pruned.is_empty() {
        println!("Pruned {} old snapshot(s)", committed.pruned.len());
    }
}

fn parse_price_arg(s: &str) -> Result<f64, String> {
    parse_price(s).ok_or_else(|| format!("invalid price '{}'", s))
}
