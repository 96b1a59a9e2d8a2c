//! Loan model and joined views

use chrono::NaiveDate;
use serde::Serialize;

use crate::error::{AppError, AppResult};
use crate::models::member::parse_date;
use crate::models::{Book, Member};
use crate::storage::Record;

/// A single lending of one book copy to one member.
///
/// `return_date == None` means the loan is active; setting it is terminal.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Loan {
    pub loan_id: String,
    pub member_id: String,
    pub isbn: String,
    pub issue_date: NaiveDate,
    pub due_date: NaiveDate,
    pub return_date: Option<NaiveDate>,
}

impl Loan {
    pub fn new(
        loan_id: impl Into<String>,
        member_id: impl Into<String>,
        isbn: impl Into<String>,
        issue_date: NaiveDate,
        due_date: NaiveDate,
        return_date: Option<NaiveDate>,
    ) -> AppResult<Self> {
        let loan_id = loan_id.into();
        if loan_id.is_empty() || !loan_id.bytes().all(|b| b.is_ascii_digit()) {
            return Err(AppError::Validation(format!("Invalid loan ID: {}", loan_id)));
        }
        Ok(Self {
            loan_id,
            member_id: member_id.into(),
            isbn: isbn.into(),
            issue_date,
            due_date,
            return_date,
        })
    }

    pub fn is_active(&self) -> bool {
        self.return_date.is_none()
    }

    /// Active and past due as of `today`
    pub fn is_overdue(&self, today: NaiveDate) -> bool {
        self.is_active() && self.due_date < today
    }

    /// Whole days past the due date as of `today`, zero if on time
    pub fn days_overdue(&self, today: NaiveDate) -> i64 {
        (today - self.due_date).num_days().max(0)
    }
}

impl Record for Loan {
    const FILE_NAME: &'static str = "loans.csv";

    fn header() -> &'static [&'static str] {
        &["LoanID", "MemberID", "ISBN", "IssueDate", "DueDate", "ReturnDate"]
    }

    fn key(&self) -> &str {
        &self.loan_id
    }

    fn from_fields(fields: &[&str]) -> AppResult<Self> {
        if fields.len() != 6 {
            return Err(AppError::Validation(format!(
                "Expected 6 loan fields, got {}",
                fields.len()
            )));
        }
        let issue_date = parse_date(fields[3])?;
        let due_date = parse_date(fields[4])?;
        let return_date = if fields[5].is_empty() {
            None
        } else {
            Some(parse_date(fields[5])?)
        };
        Loan::new(fields[0], fields[1], fields[2], issue_date, due_date, return_date)
    }

    fn to_fields(&self) -> Vec<String> {
        vec![
            self.loan_id.clone(),
            self.member_id.clone(),
            self.isbn.clone(),
            self.issue_date.format("%Y-%m-%d").to_string(),
            self.due_date.format("%Y-%m-%d").to_string(),
            self.return_date
                .map(|d| d.format("%Y-%m-%d").to_string())
                .unwrap_or_default(),
        ]
    }
}

/// Loan joined with its book, for member-facing listings
#[derive(Debug, Clone, Serialize)]
pub struct LoanWithBook {
    pub loan: Loan,
    pub book: Book,
}

/// Overdue loan joined with book and member, for the librarian report
#[derive(Debug, Clone, Serialize)]
pub struct OverdueLoan {
    pub loan: Loan,
    pub book: Book,
    pub member: Member,
    pub days_overdue: i64,
}
