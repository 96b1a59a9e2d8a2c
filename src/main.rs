//! Libris - library lending core
//!
//! Non-interactive entry point: opens the configured data directory and
//! logs an inventory and overdue summary.

use std::sync::Arc;

use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use libris::{clock::SystemClock, config::AppConfig, services::Services, Actor, Storage};

fn main() -> anyhow::Result<()> {
    // Load environment variables from .env file
    dotenvy::dotenv().ok();

    let config = AppConfig::load()?;

    // Initialize tracing
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| format!("libris={}", config.logging.level).into());

    tracing_subscriber::registry()
        .with(filter)
        .with(tracing_subscriber::fmt::layer())
        .init();

    tracing::info!("Starting Libris v{}", env!("CARGO_PKG_VERSION"));

    let storage = Storage::open(&config.storage.data_dir)?;
    tracing::info!(data_dir = %config.storage.data_dir, "opened record stores");

    let services = Services::new(storage, Arc::new(SystemClock));

    let books = services.catalog.list_books()?;
    let copies_total: u32 = books.iter().map(|b| b.copies_total).sum();
    let copies_available: u32 = books.iter().map(|b| b.copies_available).sum();
    tracing::info!(
        titles = books.len(),
        copies_total,
        copies_available,
        "catalog loaded"
    );

    let members = services.members.list_members(&Actor::Librarian)?;
    tracing::info!(members = members.len(), "member register loaded");

    let overdue = services.lending.overdue_report(&Actor::Librarian)?;
    for entry in &overdue {
        tracing::warn!(
            loan_id = %entry.loan.loan_id,
            title = %entry.book.title,
            member = %entry.member.name,
            days = entry.days_overdue,
            "overdue loan"
        );
    }
    tracing::info!(overdue = overdue.len(), "overdue report complete");

    Ok(())
}
