//! Libris Library Lending Core
//!
//! CSV-backed record stores for books, members and loans, plus the
//! lending state machine that keeps a book's available-copy count
//! consistent with its outstanding loans.

pub mod clock;
pub mod config;
pub mod error;
pub mod models;
pub mod services;
pub mod storage;

pub use clock::{Clock, SystemClock};
pub use config::AppConfig;
pub use error::{AppError, AppResult};
pub use services::{Actor, Services};
pub use storage::Storage;
