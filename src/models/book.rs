//! Book model and related types

use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::error::{AppError, AppResult};
use crate::storage::Record;

/// 10 or 13 digit ISBN, digits only
static ISBN_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"^\d{10}(\d{3})?$").unwrap());

/// A book in the catalog, keyed by ISBN
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Book {
    pub isbn: String,
    pub title: String,
    pub author: String,
    pub copies_total: u32,
    pub copies_available: u32,
}

impl Book {
    /// Build a validated book. Invalid books never reach storage.
    pub fn new(
        isbn: impl Into<String>,
        title: impl Into<String>,
        author: impl Into<String>,
        copies_total: u32,
        copies_available: u32,
    ) -> AppResult<Self> {
        let isbn = isbn.into();
        if !ISBN_RE.is_match(&isbn) {
            return Err(AppError::Validation(format!("Invalid ISBN format: {}", isbn)));
        }
        if copies_available > copies_total {
            return Err(AppError::Validation(format!(
                "Available copies ({}) cannot exceed total copies ({})",
                copies_available, copies_total
            )));
        }
        Ok(Self {
            isbn,
            title: title.into(),
            author: author.into(),
            copies_total,
            copies_available,
        })
    }
}

impl Record for Book {
    const FILE_NAME: &'static str = "books.csv";

    fn header() -> &'static [&'static str] {
        &["ISBN", "Title", "Author", "CopiesTotal", "CopiesAvailable"]
    }

    fn key(&self) -> &str {
        &self.isbn
    }

    fn from_fields(fields: &[&str]) -> AppResult<Self> {
        if fields.len() != 5 {
            return Err(AppError::Validation(format!(
                "Expected 5 book fields, got {}",
                fields.len()
            )));
        }
        let copies_total: u32 = fields[3]
            .parse()
            .map_err(|_| AppError::Validation(format!("Invalid total copies: {}", fields[3])))?;
        let copies_available: u32 = fields[4]
            .parse()
            .map_err(|_| AppError::Validation(format!("Invalid available copies: {}", fields[4])))?;
        Book::new(fields[0], fields[1], fields[2], copies_total, copies_available)
    }

    fn to_fields(&self) -> Vec<String> {
        vec![
            self.isbn.clone(),
            self.title.clone(),
            self.author.clone(),
            self.copies_total.to_string(),
            self.copies_available.to_string(),
        ]
    }
}

/// Create book request
#[derive(Debug, Deserialize, Validate)]
pub struct CreateBook {
    pub isbn: String,
    #[validate(length(min = 1, message = "Title is required"))]
    pub title: String,
    #[validate(length(min = 1, message = "Author is required"))]
    pub author: String,
    #[validate(range(min = 1, message = "Copies must be positive"))]
    pub copies: u32,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn accepts_10_and_13_digit_isbns() {
        assert!(Book::new("0132350882", "Clean Code", "Robert C. Martin", 3, 3).is_ok());
        assert!(Book::new("9780132350884", "Clean Code", "Robert C. Martin", 3, 3).is_ok());
    }

    #[test]
    fn rejects_malformed_isbn() {
        for isbn in ["", "12345", "97801323508", "978-0132350", "97801323508841"] {
            assert!(Book::new(isbn, "T", "A", 1, 1).is_err(), "accepted {:?}", isbn);
        }
    }

    #[test]
    fn rejects_available_above_total() {
        let err = Book::new("9780132350884", "T", "A", 2, 3).unwrap_err();
        assert!(matches!(err, AppError::Validation(_)));
    }

    #[test]
    fn round_trips_through_fields() {
        let book = Book::new("9780132350884", "Clean Code", "Robert C. Martin", 5, 4).unwrap();
        let fields = book.to_fields();
        let refs: Vec<&str> = fields.iter().map(String::as_str).collect();
        assert_eq!(Book::from_fields(&refs).unwrap(), book);
    }

    #[test]
    fn rejects_wrong_field_count() {
        assert!(Book::from_fields(&["9780132350884", "T", "A", "5"]).is_err());
    }

    #[test]
    fn serializes_for_display_and_parses_requests() {
        let book = Book::new("9780132350884", "Clean Code", "Robert C. Martin", 5, 4).unwrap();
        let json = serde_json::to_value(&book).unwrap();
        assert_eq!(json["isbn"], "9780132350884");
        assert_eq!(json["copies_available"], 4);

        let req: CreateBook = serde_json::from_str(
            r#"{"isbn":"9780132350884","title":"Clean Code","author":"Robert C. Martin","copies":3}"#,
        )
        .unwrap();
        assert_eq!(req.copies, 3);
    }
}
