//! Member model and related types

use chrono::NaiveDate;
use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::error::{AppError, AppResult};
use crate::storage::Record;

static EMAIL_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[a-zA-Z0-9._%+-]+@[a-zA-Z0-9.-]+\.[a-zA-Z]{2,}$").unwrap());

pub(crate) fn parse_date(s: &str) -> AppResult<NaiveDate> {
    NaiveDate::parse_from_str(s, "%Y-%m-%d")
        .map_err(|_| AppError::Validation(format!("Invalid date: {}", s)))
}

/// A registered library member, keyed by numeric member ID
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Member {
    pub member_id: String,
    pub name: String,
    /// Opaque credential digest; format is the concern of the members service
    #[serde(skip_serializing)]
    pub password_digest: String,
    pub email: String,
    pub join_date: NaiveDate,
}

impl Member {
    pub fn new(
        member_id: impl Into<String>,
        name: impl Into<String>,
        password_digest: impl Into<String>,
        email: impl Into<String>,
        join_date: NaiveDate,
    ) -> AppResult<Self> {
        let member_id = member_id.into();
        if member_id.is_empty() || !member_id.bytes().all(|b| b.is_ascii_digit()) {
            return Err(AppError::Validation(format!(
                "Invalid member ID: {}",
                member_id
            )));
        }
        let email = email.into();
        if !EMAIL_RE.is_match(&email) {
            return Err(AppError::Validation(format!("Invalid email format: {}", email)));
        }
        Ok(Self {
            member_id,
            name: name.into(),
            password_digest: password_digest.into(),
            email,
            join_date,
        })
    }
}

impl Record for Member {
    const FILE_NAME: &'static str = "members.csv";

    fn header() -> &'static [&'static str] {
        &["MemberID", "Name", "PasswordDigest", "Email", "JoinDate"]
    }

    fn key(&self) -> &str {
        &self.member_id
    }

    fn from_fields(fields: &[&str]) -> AppResult<Self> {
        if fields.len() != 5 {
            return Err(AppError::Validation(format!(
                "Expected 5 member fields, got {}",
                fields.len()
            )));
        }
        let join_date = parse_date(fields[4])?;
        Member::new(fields[0], fields[1], fields[2], fields[3], join_date)
    }

    fn to_fields(&self) -> Vec<String> {
        vec![
            self.member_id.clone(),
            self.name.clone(),
            self.password_digest.clone(),
            self.email.clone(),
            self.join_date.format("%Y-%m-%d").to_string(),
        ]
    }
}

/// Member registration request
#[derive(Debug, Deserialize, Validate)]
pub struct RegisterMember {
    #[validate(length(min = 1, message = "Name is required"))]
    pub name: String,
    #[validate(email(message = "Invalid email format"))]
    pub email: String,
    pub password: String,
    pub confirm_password: String,
}
