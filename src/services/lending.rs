//! Lending service: the loan lifecycle over books, members and loans
//!
//! State machine per loan: issued, then returned (terminal). No state
//! reverts. Every precondition is checked before the first mutation;
//! the Book and Loan persists themselves are sequential with no
//! transaction spanning them.

use std::sync::Arc;

use chrono::Duration;

use crate::clock::Clock;
use crate::error::{AppError, AppResult};
use crate::models::{Book, Loan, LoanWithBook, OverdueLoan};
use crate::storage::Storage;

use super::Actor;

/// Fixed lending policy: loans run 14 days from their issue date
pub const LOAN_PERIOD_DAYS: i64 = 14;

#[derive(Clone)]
pub struct LendingService {
    storage: Storage,
    clock: Arc<dyn Clock>,
}

/// Result of returning a loan, for presentation
#[derive(Debug, Clone)]
pub struct ReturnOutcome {
    pub loan: Loan,
    pub book: Book,
    /// Whole days past the due date; zero when returned on time
    pub days_late: i64,
}

impl ReturnOutcome {
    pub fn was_late(&self) -> bool {
        self.days_late > 0
    }
}

impl LendingService {
    pub fn new(storage: Storage, clock: Arc<dyn Clock>) -> Self {
        Self { storage, clock }
    }

    /// Issue one copy of a book to a member
    pub fn issue_book(&self, actor: &Actor, isbn: &str, member_id: &str) -> AppResult<Loan> {
        actor.require_librarian()?;

        let mut book = self
            .storage
            .books
            .find_by_isbn(isbn)?
            .ok_or_else(|| AppError::BookNotFound(isbn.to_string()))?;
        let member = self
            .storage
            .members
            .find_by_id(member_id)?
            .ok_or_else(|| AppError::MemberNotFound(member_id.to_string()))?;
        if book.copies_available == 0 {
            return Err(AppError::NoCopiesAvailable(book.title));
        }

        let issue_date = self.clock.today();
        let due_date = issue_date + Duration::days(LOAN_PERIOD_DAYS);
        let loan = Loan::new(
            self.storage.loans.next_loan_id()?,
            &member.member_id,
            &book.isbn,
            issue_date,
            due_date,
            None,
        )?;

        // Two sequential persists. An interruption between them leaves
        // the availability decremented with no loan record; accepted
        // for a single-session deployment.
        book.copies_available -= 1;
        self.storage.books.update(&book)?;
        self.storage.loans.add(&loan)?;

        tracing::info!(
            loan_id = %loan.loan_id,
            isbn = %book.isbn,
            member_id = %member.member_id,
            due = %loan.due_date,
            "issued book"
        );
        Ok(loan)
    }

    /// Return a loan, restoring the book's availability and reporting
    /// lateness in whole days
    pub fn return_book(&self, actor: &Actor, loan_id: &str) -> AppResult<ReturnOutcome> {
        actor.require_librarian()?;

        let mut loan = self
            .storage
            .loans
            .find_by_id(loan_id)?
            .ok_or_else(|| AppError::LoanNotFound(loan_id.to_string()))?;
        if let Some(returned_on) = loan.return_date {
            return Err(AppError::AlreadyReturned {
                loan_id: loan.loan_id,
                returned_on,
            });
        }
        let mut book = self
            .storage
            .books
            .find_by_isbn(&loan.isbn)?
            .ok_or_else(|| AppError::BookNotFound(loan.isbn.clone()))?;

        let today = self.clock.today();
        let days_late = loan.days_overdue(today);

        loan.return_date = Some(today);
        self.storage.loans.update(&loan)?;

        // Clamped: available copies must never exceed the total, even
        // when a hand-edited store already holds the copy as available.
        book.copies_available = (book.copies_available + 1).min(book.copies_total);
        self.storage.books.update(&book)?;

        tracing::info!(
            loan_id = %loan.loan_id,
            isbn = %book.isbn,
            days_late,
            "returned book"
        );
        Ok(ReturnOutcome {
            loan,
            book,
            days_late,
        })
    }

    /// Delete a book, refused while any loan on it is still active
    pub fn delete_book(&self, actor: &Actor, isbn: &str) -> AppResult<Book> {
        actor.require_librarian()?;

        let book = self
            .storage
            .books
            .find_by_isbn(isbn)?
            .ok_or_else(|| AppError::BookNotFound(isbn.to_string()))?;
        let active = self
            .storage
            .loans
            .find_for_book(isbn)?
            .iter()
            .filter(|l| l.is_active())
            .count();
        if active > 0 {
            return Err(AppError::BookHasActiveLoans {
                isbn: isbn.to_string(),
                active,
            });
        }

        self.storage.books.delete(isbn)?;
        tracing::info!(isbn, title = %book.title, "deleted book");
        Ok(book)
    }

    /// Every active loan past due, joined with its book and member.
    /// Loans whose book or member no longer resolves are skipped; the
    /// store layer does not enforce referential integrity, so a
    /// dangling reference is not an error here.
    pub fn overdue_report(&self, actor: &Actor) -> AppResult<Vec<OverdueLoan>> {
        actor.require_librarian()?;

        let today = self.clock.today();
        let mut report = Vec::new();
        for loan in self.storage.loans.find_overdue(today)? {
            let book = self.storage.books.find_by_isbn(&loan.isbn)?;
            let member = self.storage.members.find_by_id(&loan.member_id)?;
            match (book, member) {
                (Some(book), Some(member)) => {
                    let days_overdue = loan.days_overdue(today);
                    report.push(OverdueLoan {
                        loan,
                        book,
                        member,
                        days_overdue,
                    });
                }
                _ => {
                    tracing::warn!(loan_id = %loan.loan_id, "skipping overdue loan with dangling reference");
                }
            }
        }
        Ok(report)
    }

    /// All loans for a member, active and returned, joined with their
    /// books (dangling books skipped)
    pub fn member_loan_history(&self, actor: &Actor, member_id: &str) -> AppResult<Vec<LoanWithBook>> {
        actor.require_self_or_librarian(member_id)?;
        self.join_books(self.storage.loans.find_for_member(member_id)?)
    }

    /// The member's outstanding loans, joined with their books
    pub fn active_loans_for_member(
        &self,
        actor: &Actor,
        member_id: &str,
    ) -> AppResult<Vec<LoanWithBook>> {
        actor.require_self_or_librarian(member_id)?;
        self.join_books(self.storage.loans.find_active_for_member(member_id)?)
    }

    fn join_books(&self, loans: Vec<Loan>) -> AppResult<Vec<LoanWithBook>> {
        let mut joined = Vec::new();
        for loan in loans {
            if let Some(book) = self.storage.books.find_by_isbn(&loan.isbn)? {
                joined.push(LoanWithBook { loan, book });
            }
        }
        Ok(joined)
    }
}
