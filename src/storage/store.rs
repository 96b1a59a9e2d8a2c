//! Generic CSV record store

use std::fs;
use std::io::ErrorKind;
use std::marker::PhantomData;
use std::path::{Path, PathBuf};

use csv::{ReaderBuilder, WriterBuilder};

use crate::error::{AppError, AppResult};

use super::Record;

/// Persistence for one record type, backed by one CSV file with a
/// mandatory header line.
#[derive(Debug, Clone)]
pub struct CsvStore<R: Record> {
    path: PathBuf,
    _record: PhantomData<R>,
}

impl<R: Record> CsvStore<R> {
    /// Open the store, creating the data directory and a header-only
    /// file when missing.
    pub fn open(data_dir: &Path) -> AppResult<Self> {
        fs::create_dir_all(data_dir)?;
        let store = Self {
            path: data_dir.join(R::FILE_NAME),
            _record: PhantomData,
        };
        if !store.path.exists() {
            store.save_all(&[])?;
        }
        Ok(store)
    }

    /// Read the whole backing file. A missing file is an empty store;
    /// an unparsable line is a `CorruptRecord` error, never skipped.
    pub fn load_all(&self) -> AppResult<Vec<R>> {
        let file = match fs::File::open(&self.path) {
            Ok(file) => file,
            Err(e) if e.kind() == ErrorKind::NotFound => return Ok(Vec::new()),
            Err(e) => return Err(e.into()),
        };

        let mut reader = ReaderBuilder::new()
            .has_headers(true)
            .flexible(true)
            .from_reader(file);

        let mut records = Vec::new();
        for row in reader.records() {
            let row = row.map_err(|e| {
                let line = e.position().map(|p| p.line()).unwrap_or(0);
                self.corrupt(line, e.to_string())
            })?;
            let line = row.position().map(|p| p.line()).unwrap_or(0);
            let fields: Vec<&str> = row.iter().collect();
            let record = R::from_fields(&fields).map_err(|e| self.corrupt(line, e.to_string()))?;
            records.push(record);
        }
        Ok(records)
    }

    /// Rewrite the whole backing file: header plus every record, written
    /// to a fresh sibling file and renamed over the old one so readers
    /// never observe a partial image.
    pub fn save_all(&self, records: &[R]) -> AppResult<()> {
        let tmp = self.path.with_extension("csv.tmp");
        {
            let file = fs::File::create(&tmp)?;
            let mut writer = WriterBuilder::new().from_writer(file);
            writer.write_record(R::header())?;
            for record in records {
                writer.write_record(record.to_fields())?;
            }
            writer.flush()?;
        }
        fs::rename(&tmp, &self.path)?;
        tracing::debug!(file = R::FILE_NAME, records = records.len(), "rewrote store");
        Ok(())
    }

    pub fn add(&self, record: &R) -> AppResult<()> {
        let mut records = self.load_all()?;
        if records.iter().any(|r| r.key() == record.key()) {
            return Err(AppError::DuplicateKey(format!(
                "{} already holds key {}",
                R::FILE_NAME,
                record.key()
            )));
        }
        records.push(record.clone());
        self.save_all(&records)
    }

    /// Replace the first record sharing the given record's key
    pub fn update(&self, record: &R) -> AppResult<()> {
        let mut records = self.load_all()?;
        match records.iter_mut().find(|r| r.key() == record.key()) {
            Some(slot) => *slot = record.clone(),
            None => {
                return Err(AppError::NotFound(format!(
                    "No record with key {} in {}",
                    record.key(),
                    R::FILE_NAME
                )))
            }
        }
        self.save_all(&records)
    }

    /// Remove every record matching the key
    pub fn delete(&self, key: &str) -> AppResult<()> {
        let mut records = self.load_all()?;
        let before = records.len();
        records.retain(|r| r.key() != key);
        if records.len() == before {
            return Err(AppError::NotFound(format!(
                "No record with key {} in {}",
                key,
                R::FILE_NAME
            )));
        }
        self.save_all(&records)
    }

    pub fn find_by_key(&self, key: &str) -> AppResult<Option<R>> {
        Ok(self.load_all()?.into_iter().find(|r| r.key() == key))
    }

    pub fn find_all(&self, predicate: impl Fn(&R) -> bool) -> AppResult<Vec<R>> {
        Ok(self.load_all()?.into_iter().filter(|r| predicate(r)).collect())
    }

    fn corrupt(&self, line: u64, reason: String) -> AppError {
        AppError::CorruptRecord {
            file: self.path.display().to_string(),
            line,
            reason,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Book;
    use std::io::Write;
    use tempfile::TempDir;

    fn store() -> (TempDir, CsvStore<Book>) {
        let dir = TempDir::new().unwrap();
        let store = CsvStore::open(dir.path()).unwrap();
        (dir, store)
    }

    fn book(isbn: &str, available: u32) -> Book {
        Book::new(isbn, "Clean Code", "Robert C. Martin", 5, available).unwrap()
    }

    #[test]
    fn open_writes_header_only_file() {
        let (dir, store) = store();
        let contents = fs::read_to_string(dir.path().join("books.csv")).unwrap();
        assert_eq!(contents.trim(), "ISBN,Title,Author,CopiesTotal,CopiesAvailable");
        assert!(store.load_all().unwrap().is_empty());
    }

    #[test]
    fn add_then_load_round_trips() {
        let (_dir, store) = store();
        let b = book("9780132350884", 5);
        store.add(&b).unwrap();
        assert_eq!(store.load_all().unwrap(), vec![b]);
    }

    #[test]
    fn add_rejects_duplicate_key() {
        let (_dir, store) = store();
        store.add(&book("9780132350884", 5)).unwrap();
        let err = store.add(&book("9780132350884", 3)).unwrap_err();
        assert!(matches!(err, AppError::DuplicateKey(_)));
    }

    #[test]
    fn update_replaces_matching_record() {
        let (_dir, store) = store();
        store.add(&book("9780132350884", 5)).unwrap();
        store.update(&book("9780132350884", 4)).unwrap();
        let loaded = store.find_by_key("9780132350884").unwrap().unwrap();
        assert_eq!(loaded.copies_available, 4);
    }

    #[test]
    fn update_unknown_key_is_not_found() {
        let (_dir, store) = store();
        let err = store.update(&book("9780132350884", 5)).unwrap_err();
        assert!(matches!(err, AppError::NotFound(_)));
    }

    #[test]
    fn delete_removes_record_and_errors_on_missing() {
        let (_dir, store) = store();
        store.add(&book("9780132350884", 5)).unwrap();
        store.delete("9780132350884").unwrap();
        assert!(store.load_all().unwrap().is_empty());
        assert!(matches!(
            store.delete("9780132350884").unwrap_err(),
            AppError::NotFound(_)
        ));
    }

    #[test]
    fn load_missing_file_is_empty() {
        let (dir, store) = store();
        fs::remove_file(dir.path().join("books.csv")).unwrap();
        assert!(store.load_all().unwrap().is_empty());
    }

    #[test]
    fn corrupt_line_is_surfaced_with_position() {
        let (dir, store) = store();
        let path = dir.path().join("books.csv");
        let mut file = fs::OpenOptions::new().append(true).open(&path).unwrap();
        writeln!(file, "9780132350884,Clean Code,Robert C. Martin,5,nine").unwrap();
        match store.load_all().unwrap_err() {
            AppError::CorruptRecord { line, .. } => assert_eq!(line, 2),
            other => panic!("expected CorruptRecord, got {:?}", other),
        }
    }

    #[test]
    fn quoted_commas_survive_round_trip() {
        let (_dir, store) = store();
        let b = Book::new("9780132350884", "Code, Clean", "Martin, Robert C.", 2, 2).unwrap();
        store.add(&b).unwrap();
        assert_eq!(store.load_all().unwrap(), vec![b]);
    }
}
