//! CSV-backed record stores
//!
//! One flat file per record type under a shared data directory. Every
//! mutating operation is a full load-mutate-save cycle over the whole
//! collection; the file always holds either the previous or the new
//! complete image, never a mix.

pub mod books;
pub mod loans;
pub mod members;
pub mod store;

use std::path::Path;

use crate::error::AppResult;

pub use books::BookStore;
pub use loans::LoanStore;
pub use members::MemberStore;
pub use store::CsvStore;

/// Capability contract a persisted record type implements: its backing
/// file name, column header, identifying key, and the field conversion
/// pair. `from_fields` validates eagerly; `to_fields` is its exact
/// inverse for well-formed records.
pub trait Record: Clone {
    const FILE_NAME: &'static str;

    fn header() -> &'static [&'static str];

    /// Identifying key used for duplicate detection, update and delete
    fn key(&self) -> &str;

    fn from_fields(fields: &[&str]) -> AppResult<Self>;

    fn to_fields(&self) -> Vec<String>;
}

/// All three stores over one data directory
#[derive(Debug, Clone)]
pub struct Storage {
    pub books: BookStore,
    pub members: MemberStore,
    pub loans: LoanStore,
}

impl Storage {
    /// Open the stores, creating the directory and header-only files as
    /// needed.
    pub fn open(data_dir: impl AsRef<Path>) -> AppResult<Self> {
        let dir = data_dir.as_ref();
        Ok(Self {
            books: BookStore::open(dir)?,
            members: MemberStore::open(dir)?,
            loans: LoanStore::open(dir)?,
        })
    }
}
