//! Error types for the Libris core

use chrono::NaiveDate;
use thiserror::Error;

/// Main application error type
#[derive(Error, Debug)]
pub enum AppError {
    /// A field violated its invariant during construction or parse.
    /// Records carrying such fields never reach a store.
    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Duplicate key: {0}")]
    DuplicateKey(String),

    #[error("Not found: {0}")]
    NotFound(String),

    /// A persisted line failed to parse. Surfaced to the caller, never
    /// silently skipped.
    #[error("Corrupt record in {file} at line {line}: {reason}")]
    CorruptRecord {
        file: String,
        line: u64,
        reason: String,
    },

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Internal error: {0}")]
    Internal(String),

    #[error("Authentication failed: {0}")]
    Authentication(String),

    #[error("Authorization failed: {0}")]
    Authorization(String),

    #[error("Book with ISBN {0} not found")]
    BookNotFound(String),

    #[error("Member with ID {0} not found")]
    MemberNotFound(String),

    #[error("Loan with ID {0} not found")]
    LoanNotFound(String),

    #[error("No copies of '{0}' available")]
    NoCopiesAvailable(String),

    #[error("Loan {loan_id} was already returned on {returned_on}")]
    AlreadyReturned {
        loan_id: String,
        returned_on: NaiveDate,
    },

    #[error("Book {isbn} has {active} active loan(s)")]
    BookHasActiveLoans { isbn: String, active: usize },
}

impl From<csv::Error> for AppError {
    fn from(e: csv::Error) -> Self {
        match e.into_kind() {
            csv::ErrorKind::Io(io) => AppError::Io(io),
            kind => AppError::Io(std::io::Error::new(
                std::io::ErrorKind::InvalidData,
                format!("{:?}", kind),
            )),
        }
    }
}

/// Result type alias for application operations
pub type AppResult<T> = Result<T, AppError>;
