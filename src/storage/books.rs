//! Book store with catalog queries

use std::path::Path;

use crate::error::AppResult;
use crate::models::Book;

use super::CsvStore;

#[derive(Debug, Clone)]
pub struct BookStore {
    store: CsvStore<Book>,
}

impl BookStore {
    pub fn open(data_dir: &Path) -> AppResult<Self> {
        Ok(Self {
            store: CsvStore::open(data_dir)?,
        })
    }

    pub fn load_all(&self) -> AppResult<Vec<Book>> {
        self.store.load_all()
    }

    pub fn add(&self, book: &Book) -> AppResult<()> {
        self.store.add(book)
    }

    pub fn update(&self, book: &Book) -> AppResult<()> {
        self.store.update(book)
    }

    pub fn delete(&self, isbn: &str) -> AppResult<()> {
        self.store.delete(isbn)
    }

    pub fn find_by_isbn(&self, isbn: &str) -> AppResult<Option<Book>> {
        self.store.find_by_key(isbn)
    }

    /// Case-insensitive substring match on title or author, insertion
    /// order preserved
    pub fn find_by_text(&self, keyword: &str) -> AppResult<Vec<Book>> {
        let needle = keyword.to_lowercase();
        self.store.find_all(|b| {
            b.title.to_lowercase().contains(&needle) || b.author.to_lowercase().contains(&needle)
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn seeded() -> (TempDir, BookStore) {
        let dir = TempDir::new().unwrap();
        let store = BookStore::open(dir.path()).unwrap();
        store
            .add(&Book::new("9780132350884", "Clean Code", "Robert C. Martin", 5, 5).unwrap())
            .unwrap();
        store
            .add(&Book::new("9780201616224", "The Pragmatic Programmer", "Andrew Hunt", 2, 2).unwrap())
            .unwrap();
        (dir, store)
    }

    #[test]
    fn finds_by_title_or_author_case_insensitive() {
        let (_dir, store) = seeded();
        let hits = store.find_by_text("MARTIN").unwrap();
        assert_eq!(hits.len(), 1);
        assert_eq!(hits[0].isbn, "9780132350884");

        let hits = store.find_by_text("pragmatic").unwrap();
        assert_eq!(hits.len(), 1);
        assert_eq!(hits[0].isbn, "9780201616224");
    }

    #[test]
    fn no_match_is_empty_not_error() {
        let (_dir, store) = seeded();
        assert!(store.find_by_text("zebra").unwrap().is_empty());
    }
}
