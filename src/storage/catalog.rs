//! Catalog store backed by SQLite
//!
//! Owns the single connection to `data/livraria.db`. The database runs in
//! rollback-journal mode so that every committed change is contained in the
//! catalog file itself, which is what the backup manager copies.

use std::path::{Path, PathBuf};

use rusqlite::{params, Connection, Row};
use tracing::debug;

use crate::error::LivrariaResult;
use crate::models::{Book, BookId, NewBook};

const BOOK_COLUMNS: &str = "id, title, author, publication_year, price";

fn init_schema(conn: &Connection) -> rusqlite::Result<()> {
    conn.execute_batch(
        "CREATE TABLE IF NOT EXISTS books (
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            title TEXT NOT NULL,
            author TEXT NOT NULL,
            publication_year INTEGER NOT NULL,
            price REAL NOT NULL
        );
        CREATE INDEX IF NOT EXISTS idx_books_title ON books(title);
        CREATE INDEX IF NOT EXISTS idx_books_author ON books(author);",
    )
}

fn book_from_row(row: &Row<'_>) -> rusqlite::Result<Book> {
    Ok(Book {
        id: BookId::from_raw(row.get(0)?),
        title: row.get(1)?,
        author: row.get(2)?,
        publication_year: row.get(3)?,
        price: row.get(4)?,
    })
}

/// Database handle. Open once per session, reuse across all operations;
/// the connection is closed when the store is dropped.
pub struct CatalogStore {
    conn: Connection,
    path: PathBuf,
}

impl CatalogStore {
    /// Open (or create) the catalog database at `path`
    pub fn open(path: impl AsRef<Path>) -> LivrariaResult<Self> {
        let path = path.as_ref().to_path_buf();
        let conn = Connection::open(&path)?;
        let mode: String =
            conn.pragma_update_and_check(None, "journal_mode", "DELETE", |row| row.get(0))?;
        debug!(path = %path.display(), journal_mode = %mode, "opened catalog");
        init_schema(&conn)?;
        Ok(Self { conn, path })
    }

    /// Path of the persisted catalog file
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Insert a book and return it with its assigned id
    pub fn add(&self, book: &NewBook) -> LivrariaResult<Book> {
        self.conn.execute(
            "INSERT INTO books (title, author, publication_year, price) VALUES (?1, ?2, ?3, ?4)",
            params![book.title, book.author, book.publication_year, book.price],
        )?;
        let id = BookId::from_raw(self.conn.last_insert_rowid());
        debug!(%id, title = %book.title, "inserted book");
        Ok(stored(id, book))
    }

    /// Insert many books in a single transaction; either all rows commit or none do
    pub fn insert_batch(&self, books: &[NewBook]) -> LivrariaResult<Vec<Book>> {
        let tx = self.conn.unchecked_transaction()?;
        let mut inserted = Vec::with_capacity(books.len());

        {
            let mut stmt = tx.prepare_cached(
                "INSERT INTO books (title, author, publication_year, price) VALUES (?1, ?2, ?3, ?4)",
            )?;
            for book in books {
                stmt.execute(params![
                    book.title,
                    book.author,
                    book.publication_year,
                    book.price
                ])?;
                inserted.push(stored(BookId::from_raw(tx.last_insert_rowid()), book));
            }
        }

        tx.commit()?;
        debug!(count = inserted.len(), "inserted batch");
        Ok(inserted)
    }

    /// All books, ordered by id
    pub fn list(&self) -> LivrariaResult<Vec<Book>> {
        self.query_books(&format!("SELECT {BOOK_COLUMNS} FROM books ORDER BY id"), [])
    }

    /// Get a book by id
    pub fn get(&self, id: BookId) -> LivrariaResult<Option<Book>> {
        let mut books = self.query_books(
            &format!("SELECT {BOOK_COLUMNS} FROM books WHERE id = ?1"),
            [id.as_i64()],
        )?;
        Ok(books.pop())
    }

    /// Books whose title matches exactly
    pub fn find_by_title(&self, title: &str) -> LivrariaResult<Vec<Book>> {
        self.query_books(
            &format!("SELECT {BOOK_COLUMNS} FROM books WHERE title = ?1 ORDER BY id"),
            [title],
        )
    }

    /// Books whose author matches exactly; an empty result means no match
    pub fn find_by_author(&self, author: &str) -> LivrariaResult<Vec<Book>> {
        self.query_books(
            &format!("SELECT {BOOK_COLUMNS} FROM books WHERE author = ?1 ORDER BY id"),
            [author],
        )
    }

    /// Set the price of every book with this title; returns the rows changed
    pub fn update_price(&self, title: &str, price: f64) -> LivrariaResult<usize> {
        let changed = self.conn.execute(
            "UPDATE books SET price = ?1 WHERE title = ?2",
            params![price, title],
        )?;
        debug!(title, price, changed, "updated price");
        Ok(changed)
    }

    /// Delete every book with this title; returns the rows removed
    pub fn delete_by_title(&self, title: &str) -> LivrariaResult<usize> {
        let removed = self
            .conn
            .execute("DELETE FROM books WHERE title = ?1", params![title])?;
        debug!(title, removed, "deleted books");
        Ok(removed)
    }

    /// Number of stored books
    pub fn count(&self) -> LivrariaResult<usize> {
        let count: i64 = self
            .conn
            .query_row("SELECT COUNT(*) FROM books", [], |row| row.get(0))?;
        Ok(count as usize)
    }

    fn query_books<P: rusqlite::Params>(&self, sql: &str, params: P) -> LivrariaResult<Vec<Book>> {
        let mut stmt = self.conn.prepare(sql)?;
        let books = stmt
            .query_map(params, book_from_row)?
            .collect::<Result<Vec<_>, _>>()?;
        Ok(books)
    }
}

fn stored(id: BookId, book: &NewBook) -> Book {
    Book {
        id,
        title: book.title.clone(),
        author: book.author.clone(),
        publication_year: book.publication_year,
        price: book.price,
    }
}
