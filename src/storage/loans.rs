//! Loan store with lifecycle queries

use std::path::Path;

use chrono::NaiveDate;

use crate::error::AppResult;
use crate::models::Loan;

use super::CsvStore;

#[derive(Debug, Clone)]
pub struct LoanStore {
    store: CsvStore<Loan>,
}

impl LoanStore {
    pub fn open(data_dir: &Path) -> AppResult<Self> {
        Ok(Self {
            store: CsvStore::open(data_dir)?,
        })
    }

    pub fn load_all(&self) -> AppResult<Vec<Loan>> {
        self.store.load_all()
    }

    pub fn add(&self, loan: &Loan) -> AppResult<()> {
        self.store.add(loan)
    }

    pub fn update(&self, loan: &Loan) -> AppResult<()> {
        self.store.update(loan)
    }

    pub fn find_by_id(&self, loan_id: &str) -> AppResult<Option<Loan>> {
        self.store.find_by_key(loan_id)
    }

    pub fn find_active_for_member(&self, member_id: &str) -> AppResult<Vec<Loan>> {
        self.store
            .find_all(|l| l.member_id == member_id && l.is_active())
    }

    pub fn find_for_member(&self, member_id: &str) -> AppResult<Vec<Loan>> {
        self.store.find_all(|l| l.member_id == member_id)
    }

    pub fn find_for_book(&self, isbn: &str) -> AppResult<Vec<Loan>> {
        self.store.find_all(|l| l.isbn == isbn)
    }

    /// Active loans past due as of `today`
    pub fn find_overdue(&self, today: NaiveDate) -> AppResult<Vec<Loan>> {
        self.store.find_all(|l| l.is_overdue(today))
    }

    /// Highest existing ID plus one, or 1 for an empty store.
    /// Monotonic regardless of deletion gaps.
    pub fn next_loan_id(&self) -> AppResult<String> {
        let max = self
            .store
            .load_all()?
            .iter()
            .filter_map(|l| l.loan_id.parse::<u64>().ok())
            .max();
        Ok(match max {
            Some(id) => (id + 1).to_string(),
            None => 1.to_string(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn loan(id: &str, member_id: &str, returned: Option<NaiveDate>) -> Loan {
        Loan::new(
            id,
            member_id,
            "9780132350884",
            date(2024, 3, 1),
            date(2024, 3, 15),
            returned,
        )
        .unwrap()
    }

    fn store() -> (TempDir, LoanStore) {
        let dir = TempDir::new().unwrap();
        let store = LoanStore::open(dir.path()).unwrap();
        (dir, store)
    }

    #[test]
    fn first_loan_id_is_1() {
        let (_dir, store) = store();
        assert_eq!(store.next_loan_id().unwrap(), "1");
    }

    #[test]
    fn next_id_survives_gaps() {
        let (_dir, store) = store();
        store.add(&loan("3", "1001", None)).unwrap();
        store.add(&loan("7", "1002", None)).unwrap();
        assert_eq!(store.next_loan_id().unwrap(), "8");
    }

    #[test]
    fn active_filter_excludes_returned() {
        let (_dir, store) = store();
        store.add(&loan("1", "1001", None)).unwrap();
        store.add(&loan("2", "1001", Some(date(2024, 3, 10)))).unwrap();
        store.add(&loan("3", "1002", None)).unwrap();
        let active = store.find_active_for_member("1001").unwrap();
        assert_eq!(active.len(), 1);
        assert_eq!(active[0].loan_id, "1");
    }

    #[test]
    fn overdue_excludes_returned_and_not_yet_due() {
        let (_dir, store) = store();
        store.add(&loan("1", "1001", None)).unwrap();
        store.add(&loan("2", "1001", Some(date(2024, 3, 20)))).unwrap();
        let overdue = store.find_overdue(date(2024, 3, 16)).unwrap();
        assert_eq!(overdue.len(), 1);
        assert_eq!(overdue[0].loan_id, "1");
        assert!(store.find_overdue(date(2024, 3, 15)).unwrap().is_empty());
    }
}
