//! Domain record types

pub mod book;
pub mod loan;
pub mod member;

pub use book::{Book, CreateBook};
pub use loan::{Loan, LoanWithBook, OverdueLoan};
pub use member::{Member, RegisterMember};
