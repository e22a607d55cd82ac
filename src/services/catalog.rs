//! Catalog service
//!
//! Business logic for book management. Every state-changing operation runs
//! through [`CatalogService::protect`]: the change is committed to the
//! catalog store and written to the audit log, then exactly one snapshot is
//! taken, then old snapshots are pruned. Read-only operations never touch the backup manager.

use std::path::PathBuf;

use tracing::warn;

use crate::audit::AuditEntry;
use crate::error::{LivrariaError, LivrariaResult};
use crate::models::{validate_price, Book, BookId, NewBook};
use crate::storage::{CatalogStore, Storage};

/// A committed catalog change together with the backup that followed it
#[derive(Debug)]
pub struct Committed<T> {
    /// What the mutation returned
    pub value: T,
    /// Snapshot taken right after the commit
    pub snapshot: PathBuf,
    /// Snapshots removed by the retention policy
    pub pruned: Vec<PathBuf>,
}

/// Service for book management
pub struct CatalogService<'a> {
    storage: &'a Storage,
}

impl<'a> CatalogService<'a> {
    /// Create a new catalog service
    pub fn new(storage: &'a Storage) -> Self {
        Self { storage }
    }

    /// Run a mutation, audit it, then snapshot, then prune
    ///
    /// `audit` describes the committed change; its entries are written
    /// before the snapshot is taken. If the mutation fails nothing else
    /// happens. If the snapshot fails the prune is skipped. Failures after
    /// the commit are reported as `BackupAfterCommit` or `AuditAfterCommit`;
    /// the change itself is not rolled back.
    pub fn protect<T, F, A>(&self, mutation: F, audit: A) -> LivrariaResult<Committed<T>>
    where
        F: FnOnce(&CatalogStore) -> LivrariaResult<T>,
        A: FnOnce(&T) -> Vec<AuditEntry>,
    {
        let value = mutation(&self.storage.catalog)?;

        let audited = self.record(audit(&value));

        let snapshot = self
            .storage
            .backups
            .create_snapshot()
            .map_err(LivrariaError::after_commit)?;

        let pruned = self
            .storage
            .backups
            .enforce_retention()
            .map_err(LivrariaError::after_commit)?;

        audited.map_err(|e| LivrariaError::audit_after_commit(Some(snapshot.clone()), e))?;

        Ok(Committed {
            value,
            snapshot,
            pruned,
        })
    }

    /// Write audit entries for a committed change, stopping at the first failure
    pub(crate) fn record(&self, entries: Vec<AuditEntry>) -> LivrariaResult<()> {
        for entry in entries {
            if let Err(e) = self.storage.log(entry) {
                warn!(error = %e, "failed to write audit entry");
                return Err(e);
            }
        }
        Ok(())
    }

    /// Add a new book
    pub fn add_book(&self, book: NewBook) -> LivrariaResult<Committed<Book>> {
        book.validate()
            .map_err(|e| LivrariaError::Validation(e.to_string()))?;

        self.protect(
            |catalog| catalog.add(&book),
            |stored| vec![AuditEntry::create(stored)],
        )
    }

    /// Set the price of the book(s) with this title
    ///
    /// Returns the number of books changed. Fails with `NotFound`, without
    /// taking a snapshot, when no book has this title.
    pub fn update_price(&self, title: &str, price: f64) -> LivrariaResult<Committed<usize>> {
        validate_price(price).map_err(|e| LivrariaError::Validation(e.to_string()))?;
        let title = title.trim();

        let before = self.storage.catalog.find_by_title(title)?;

        self.protect(
            |catalog| match catalog.update_price(title, price)? {
                0 => Err(LivrariaError::book_not_found(title)),
                changed => Ok(changed),
            },
            |_| {
                before
                    .iter()
                    .map(|old| {
                        let mut new = old.clone();
                        new.price = price;
                        AuditEntry::update(old, &new)
                    })
                    .collect()
            },
        )
    }

    /// Remove the book(s) with this title
    ///
    /// Returns the number of books removed. Fails with `NotFound`, without
    /// taking a snapshot, when no book has this title.
    pub fn remove_book(&self, title: &str) -> LivrariaResult<Committed<usize>> {
        let title = title.trim();
        let before = self.storage.catalog.find_by_title(title)?;

        self.protect(
            |catalog| match catalog.delete_by_title(title)? {
                0 => Err(LivrariaError::book_not_found(title)),
                removed => Ok(removed),
            },
            |_| before.iter().map(AuditEntry::delete).collect(),
        )
    }

    /// List all books
    pub fn list_books(&self) -> LivrariaResult<Vec<Book>> {
        self.storage.catalog.list()
    }

    /// Get a book by ID
    pub fn get_book(&self, id: BookId) -> LivrariaResult<Option<Book>> {
        self.storage.catalog.get(id)
    }

    /// Find books by author; an empty list means no match
    pub fn find_by_author(&self, author: &str) -> LivrariaResult<Vec<Book>> {
        self.storage.catalog.find_by_author(author.trim())
    }

    /// Take a snapshot on demand and apply the retention policy
    pub fn backup_now(&self) -> LivrariaResult<(PathBuf, Vec<PathBuf>)> {
        self.storage.backups.create_snapshot_with_retention()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::audit::Operation;
    use crate::config::{LivrariaPaths, Settings};
    use std::fs::{self, File};
    use std::time::{Duration, SystemTime};
    use tempfile::TempDir;

    fn create_test_storage() -> (TempDir, Storage) {
        let temp_dir = TempDir::new().unwrap();
        let paths = LivrariaPaths::with_base_dir(temp_dir.path().to_path_buf());
        let storage = Storage::open(paths, Settings::default()).unwrap();
        (temp_dir, storage)
    }

    fn snapshot_count(storage: &Storage) -> usize {
        storage.backups.list_snapshots().unwrap().len()
    }

    fn hobbit() -> NewBook {
        NewBook::new("o hobbit", "tolkien", 1937, 49.90)
    }

    #[test]
    fn test_add_book_creates_exactly_one_snapshot() {
        let (_temp, storage) = create_test_storage();
        let service = CatalogService::new(&storage);
        assert_eq!(snapshot_count(&storage), 0);

        let committed = service.add_book(hobbit()).unwrap();

        assert_eq!(snapshot_count(&storage), 1);
        assert!(committed.snapshot.exists());
        assert!(committed.pruned.is_empty());
        assert_eq!(committed.value.title, "o hobbit");
    }

    #[test]
    fn test_snapshot_matches_catalog_after_add() {
        let (_temp, storage) = create_test_storage();
        let service = CatalogService::new(&storage);

        let committed = service.add_book(hobbit()).unwrap();

        assert_eq!(
            fs::read(&committed.snapshot).unwrap(),
            fs::read(storage.paths().catalog_file()).unwrap()
        );
        let copy = CatalogStore::open(&committed.snapshot).unwrap();
        let books = copy.list().unwrap();
        assert_eq!(books.len(), 1);
        assert_eq!(books[0].author, "tolkien");
        assert_eq!(books[0].publication_year, 1937);
        assert_eq!(books[0].price, 49.90);
    }

    #[test]
    fn test_every_mutation_snapshots() {
        let (_temp, storage) = create_test_storage();
        let service = CatalogService::new(&storage);

        service.add_book(hobbit()).unwrap();
        let updated = service.update_price("o hobbit", 39.90).unwrap();
        let removed = service.remove_book("o hobbit").unwrap();

        assert_eq!(updated.value, 1);
        assert_eq!(removed.value, 1);
        assert_eq!(snapshot_count(&storage), 3);
    }

    #[test]
    fn test_reads_do_not_snapshot() {
        let (_temp, storage) = create_test_storage();
        let service = CatalogService::new(&storage);
        service.add_book(hobbit()).unwrap();

        service.list_books().unwrap();
        service.find_by_author("tolkien").unwrap();
        service.get_book(BookId::from_raw(1)).unwrap();

        assert_eq!(snapshot_count(&storage), 1);
    }

    #[test]
    fn test_not_found_mutations_do_not_snapshot() {
        let (_temp, storage) = create_test_storage();
        let service = CatalogService::new(&storage);

        let err = service.update_price("nao existe", 10.0).unwrap_err();
        assert!(err.is_not_found());
        let err = service.remove_book("nao existe").unwrap_err();
        assert!(err.is_not_found());

        assert_eq!(snapshot_count(&storage), 0);
    }

    #[test]
    fn test_invalid_book_is_rejected_before_commit() {
        let (_temp, storage) = create_test_storage();
        let service = CatalogService::new(&storage);

        let err = service
            .add_book(NewBook::new("o hobbit", "tolkien", 1937, -5.0))
            .unwrap_err();

        assert!(err.is_validation());
        assert_eq!(storage.catalog.count().unwrap(), 0);
        assert_eq!(snapshot_count(&storage), 0);
    }

    #[test]
    fn test_find_by_author_empty_signal() {
        let (_temp, storage) = create_test_storage();
        let service = CatalogService::new(&storage);
        service.add_book(hobbit()).unwrap();

        assert_eq!(service.find_by_author(" tolkien ").unwrap().len(), 1);
        assert!(service.find_by_author("asimov").unwrap().is_empty());
    }

    #[test]
    fn test_retention_applied_after_each_mutation() {
        let (_temp, storage) = create_test_storage();
        let service = CatalogService::new(&storage);
        let backup_dir = storage.paths().backup_dir();
        for i in 0..5u64 {
            let file = File::create(backup_dir.join(format!("backup_livraria_old{}.db", i))).unwrap();
            file.set_modified(SystemTime::now() - Duration::from_secs(100 + i))
                .unwrap();
        }

        let committed = service.add_book(hobbit()).unwrap();

        assert_eq!(committed.pruned.len(), 1);
        assert!(committed.pruned[0].ends_with("backup_livraria_old4.db"));
        assert_eq!(snapshot_count(&storage), 5);
    }

    #[test]
    fn test_failed_snapshot_keeps_commit_and_skips_prune() {
        let (_temp, storage) = create_test_storage();
        let service = CatalogService::new(&storage);
        fs::remove_dir_all(storage.paths().backup_dir()).unwrap();

        let err = service.add_book(hobbit()).unwrap_err();

        assert!(matches!(err, LivrariaError::BackupAfterCommit { .. }));
        assert_eq!(storage.catalog.count().unwrap(), 1);
        let entries = storage.audit.read_all().unwrap();
        assert_eq!(entries.len(), 1);
        assert_eq!(entries[0].operation, Operation::Create);
    }

    #[test]
    fn test_failed_audit_reports_committed_change() {
        let (_temp, storage) = create_test_storage();
        let service = CatalogService::new(&storage);
        fs::create_dir(storage.paths().audit_log()).unwrap();

        let err = service.add_book(hobbit()).unwrap_err();

        assert!(err.is_after_commit());
        match err {
            LivrariaError::AuditAfterCommit { snapshot, .. } => {
                assert!(snapshot.unwrap().exists());
            }
            other => panic!("expected AuditAfterCommit, got {:?}", other),
        }
        assert_eq!(storage.catalog.count().unwrap(), 1);
        assert_eq!(snapshot_count(&storage), 1);
    }

    #[test]
    fn test_mutations_are_audited() {
        let (_temp, storage) = create_test_storage();
        let service = CatalogService::new(&storage);

        service.add_book(hobbit()).unwrap();
        service.update_price("o hobbit", 39.90).unwrap();
        service.remove_book("o hobbit").unwrap();

        let ops: Vec<_> = storage
            .audit
            .read_all()
            .unwrap()
            .into_iter()
            .map(|e| e.operation)
            .collect();
        assert_eq!(ops, vec![Operation::Create, Operation::Update, Operation::Delete]);
    }

    #[test]
    fn test_backup_now() {
        let (_temp, storage) = create_test_storage();
        let service = CatalogService::new(&storage);

        let (snapshot, pruned) = service.backup_now().unwrap();

        assert!(snapshot.exists());
        assert!(pruned.is_empty());
    }
}
