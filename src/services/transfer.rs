//! CSV transfer service
//!
//! Exports the whole catalog to a flat CSV file and imports books from one.
//! Column order is `Id, Título, Autor, Ano da Publicação, Preço`; the id
//! column is ignored on import and new ids are assigned.

use std::fs::File;
use std::io::{BufReader, BufWriter, Read, Write};
use std::path::{Path, PathBuf};

use csv::{ReaderBuilder, StringRecord, Trim, WriterBuilder};

use crate::audit::AuditEntry;
use crate::error::{LivrariaError, LivrariaResult};
use crate::models::{Book, NewBook};
use crate::services::CatalogService;
use crate::storage::Storage;

/// Header row written on export
pub const EXPORT_HEADER: [&str; 5] = ["Id", "Título", "Autor", "Ano da Publicação", "Preço"];

/// Result of a completed import
#[derive(Debug)]
pub struct ImportResult {
    /// File the books were read from
    pub source: PathBuf,
    /// The stored books, with their new ids
    pub imported: Vec<Book>,
    /// Snapshot taken after the batch, if any
    pub snapshot: Option<PathBuf>,
    /// Snapshots removed by the retention policy
    pub pruned: Vec<PathBuf>,
}

/// Service for CSV export and import
pub struct TransferService<'a> {
    storage: &'a Storage,
}

impl<'a> TransferService<'a> {
    /// Create a new transfer service
    pub fn new(storage: &'a Storage) -> Self {
        Self { storage }
    }

    /// Write every book as CSV; returns the number of rows written
    pub fn export_csv<W: Write>(&self, writer: W) -> LivrariaResult<usize> {
        let books = self.storage.catalog.list()?;
        let mut csv = WriterBuilder::new().from_writer(writer);

        csv.write_record(EXPORT_HEADER)
            .map_err(|e| LivrariaError::Export(e.to_string()))?;

        for book in &books {
            csv.write_record([
                book.id.to_string(),
                book.title.clone(),
                book.author.clone(),
                book.publication_year.to_string(),
                // Display prints the shortest string that parses back to the same f64
                book.price.to_string(),
            ])
            .map_err(|e| LivrariaError::Export(e.to_string()))?;
        }

        csv.flush()
            .map_err(|e| LivrariaError::Export(e.to_string()))?;

        Ok(books.len())
    }

    /// Export to a file; returns the number of rows written
    pub fn export_to_file(&self, path: &Path) -> LivrariaResult<usize> {
        let file = File::create(path).map_err(|e| {
            LivrariaError::Export(format!("Failed to create file {}: {}", path.display(), e))
        })?;
        self.export_csv(BufWriter::new(file))
    }

    /// Export to the default `exports/livros_exportados.csv`
    pub fn export_default(&self) -> LivrariaResult<(PathBuf, usize)> {
        let path = self.storage.paths().export_file();
        let count = self.export_to_file(&path)?;
        Ok((path, count))
    }

    /// Import books from a file
    ///
    /// `name` is resolved against the export directory unless absolute. The
    /// whole file is parsed before anything is stored, and the rows are
    /// inserted in one transaction, so a malformed row leaves the catalog
    /// unchanged. When `backup_on_import` is set, one snapshot is taken for
    /// the whole batch.
    pub fn import_file(&self, name: &str) -> LivrariaResult<ImportResult> {
        let path = self.storage.paths().resolve_import_file(name);
        let file = File::open(&path).map_err(|e| {
            LivrariaError::Io(format!("Failed to open import file {}: {}", path.display(), e))
        })?;

        let books = parse_csv(BufReader::new(file))?;

        if books.is_empty() {
            return Ok(ImportResult {
                source: path,
                imported: Vec::new(),
                snapshot: None,
                pruned: Vec::new(),
            });
        }

        let service = CatalogService::new(self.storage);
        let entry = AuditEntry::import(books.len(), &path.display().to_string());

        let (imported, snapshot, pruned) = if self.storage.settings().backup_on_import {
            let committed =
                service.protect(|catalog| catalog.insert_batch(&books), |_| vec![entry])?;
            (committed.value, Some(committed.snapshot), committed.pruned)
        } else {
            let imported = self.storage.catalog.insert_batch(&books)?;
            service
                .record(vec![entry])
                .map_err(|e| LivrariaError::audit_after_commit(None, e))?;
            (imported, None, Vec::new())
        };

        Ok(ImportResult {
            source: path,
            imported,
            snapshot,
            pruned,
        })
    }
}

/// Parse CSV rows into books
///
/// The first row is a header and is skipped. Fails at the first malformed
/// row; row numbers in errors are 1-based and exclude the header.
pub fn parse_csv<R: Read>(reader: R) -> LivrariaResult<Vec<NewBook>> {
    let mut csv = ReaderBuilder::new()
        .has_headers(true)
        .flexible(true)
        .trim(Trim::All)
        .from_reader(reader);

    let mut books = Vec::new();
    for (idx, result) in csv.records().enumerate() {
        let row = idx + 1;
        let record = result.map_err(|e| LivrariaError::Parse {
            row,
            message: format!("unreadable record: {}", e),
        })?;
        books.push(parse_record(&record, row)?);
    }

    Ok(books)
}

fn parse_record(record: &StringRecord, row: usize) -> LivrariaResult<NewBook> {
    let title = field(record, row, 1, "title")?;
    let author = field(record, row, 2, "author")?;

    let year_str = field(record, row, 3, "year")?;
    let publication_year: i32 = year_str.parse().map_err(|_| LivrariaError::Parse {
        row,
        message: format!("invalid publication year '{}'", year_str),
    })?;

    let price_str = field(record, row, 4, "price")?;
    let price = parse_price(price_str).ok_or_else(|| LivrariaError::Parse {
        row,
        message: format!("invalid price '{}'", price_str),
    })?;

    let book = NewBook::new(title, author, publication_year, price);
    book.validate()
        .map_err(|e| LivrariaError::Validation(format!("row {}: {}", row, e)))?;

    Ok(book)
}

fn field<'r>(
    record: &'r StringRecord,
    row: usize,
    index: usize,
    name: &str,
) -> LivrariaResult<&'r str> {
    record.get(index).ok_or_else(|| LivrariaError::Parse {
        row,
        message: format!("missing {} column", name),
    })
}

/// Parse a price, accepting a decimal comma ("49,90") as well as a point
pub fn parse_price(s: &str) -> Option<f64> {
    s.parse::<f64>()
        .ok()
        .or_else(|| s.replace(',', ".").parse::<f64>().ok())
        .filter(|p| !p.is_nan())
}
