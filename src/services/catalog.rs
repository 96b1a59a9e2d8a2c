//! Catalog management service

use validator::Validate;

use crate::error::{AppError, AppResult};
use crate::models::{Book, CreateBook};
use crate::storage::Storage;

use super::Actor;

#[derive(Clone)]
pub struct CatalogService {
    storage: Storage,
}

impl CatalogService {
    pub fn new(storage: Storage) -> Self {
        Self { storage }
    }

    /// Add a new book. All copies start available.
    pub fn add_book(&self, actor: &Actor, req: CreateBook) -> AppResult<Book> {
        actor.require_librarian()?;
        req.validate()
            .map_err(|e| AppError::Validation(e.to_string()))?;

        let book = Book::new(req.isbn, req.title, req.author, req.copies, req.copies)?;
        self.storage.books.add(&book)?;
        tracing::info!(isbn = %book.isbn, title = %book.title, "added book to catalog");
        Ok(book)
    }

    /// Search by title or author keyword
    pub fn search(&self, keyword: &str) -> AppResult<Vec<Book>> {
        self.storage.books.find_by_text(keyword)
    }

    pub fn list_books(&self) -> AppResult<Vec<Book>> {
        self.storage.books.load_all()
    }

    pub fn find(&self, isbn: &str) -> AppResult<Option<Book>> {
        self.storage.books.find_by_isbn(isbn)
    }
}
