//! Member store with lookup and ID assignment

use std::path::Path;

use crate::error::AppResult;
use crate::models::Member;

use super::CsvStore;

/// First ID handed out when the store is empty
const FIRST_MEMBER_ID: u64 = 1001;

#[derive(Debug, Clone)]
pub struct MemberStore {
    store: CsvStore<Member>,
}

impl MemberStore {
    pub fn open(data_dir: &Path) -> AppResult<Self> {
        Ok(Self {
            store: CsvStore::open(data_dir)?,
        })
    }

    pub fn load_all(&self) -> AppResult<Vec<Member>> {
        self.store.load_all()
    }

    pub fn add(&self, member: &Member) -> AppResult<()> {
        self.store.add(member)
    }

    pub fn update(&self, member: &Member) -> AppResult<()> {
        self.store.update(member)
    }

    pub fn find_by_id(&self, member_id: &str) -> AppResult<Option<Member>> {
        self.store.find_by_key(member_id)
    }

    /// Case-insensitive exact email match
    pub fn find_by_email(&self, email: &str) -> AppResult<Option<Member>> {
        let needle = email.to_lowercase();
        Ok(self
            .store
            .load_all()?
            .into_iter()
            .find(|m| m.email.to_lowercase() == needle))
    }

    /// Highest existing ID plus one, or 1001 for an empty store.
    /// Monotonic regardless of deletion gaps.
    pub fn next_member_id(&self) -> AppResult<String> {
        let max = self
            .store
            .load_all()?
            .iter()
            .filter_map(|m| m.member_id.parse::<u64>().ok())
            .max();
        Ok(match max {
            Some(id) => (id + 1).to_string(),
            None => FIRST_MEMBER_ID.to_string(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;
    use tempfile::TempDir;

    fn member(id: &str, email: &str) -> Member {
        Member::new(
            id,
            "Test User",
            "digest",
            email,
            NaiveDate::from_ymd_opt(2024, 1, 15).unwrap(),
        )
        .unwrap()
    }

    #[test]
    fn first_id_is_1001() {
        let dir = TempDir::new().unwrap();
        let store = MemberStore::open(dir.path()).unwrap();
        assert_eq!(store.next_member_id().unwrap(), "1001");
    }

    #[test]
    fn next_id_exceeds_max_existing() {
        let dir = TempDir::new().unwrap();
        let store = MemberStore::open(dir.path()).unwrap();
        store.add(&member("1001", "a@example.com")).unwrap();
        store.add(&member("1007", "b@example.com")).unwrap();
        assert_eq!(store.next_member_id().unwrap(), "1008");
    }

    #[test]
    fn email_lookup_ignores_case() {
        let dir = TempDir::new().unwrap();
        let store = MemberStore::open(dir.path()).unwrap();
        store.add(&member("1001", "Ada@Example.com")).unwrap();
        let found = store.find_by_email("ada@example.COM").unwrap();
        assert_eq!(found.unwrap().member_id, "1001");
        assert!(store.find_by_email("none@example.com").unwrap().is_none());
    }
}
