//! Business rules over the record stores

pub mod catalog;
pub mod lending;
pub mod members;

use std::sync::Arc;

use crate::clock::Clock;
use crate::error::{AppError, AppResult};
use crate::storage::Storage;

pub use catalog::CatalogService;
pub use lending::{LendingService, ReturnOutcome};
pub use members::MembersService;

/// Identity of the caller. Passed explicitly to every operation that
/// needs it instead of being read from process-wide session state.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Actor {
    Librarian,
    Member(String),
}

impl Actor {
    pub fn require_librarian(&self) -> AppResult<()> {
        match self {
            Actor::Librarian => Ok(()),
            Actor::Member(_) => Err(AppError::Authorization(
                "Librarian privileges required".to_string(),
            )),
        }
    }

    /// The member themself, or any librarian
    pub fn require_self_or_librarian(&self, member_id: &str) -> AppResult<()> {
        match self {
            Actor::Librarian => Ok(()),
            Actor::Member(id) if id == member_id => Ok(()),
            Actor::Member(_) => Err(AppError::Authorization(
                "Cannot access another member's records".to_string(),
            )),
        }
    }
}

/// All services over one storage root
#[derive(Clone)]
pub struct Services {
    pub catalog: CatalogService,
    pub members: MembersService,
    pub lending: LendingService,
}

impl Services {
    pub fn new(storage: Storage, clock: Arc<dyn Clock>) -> Self {
        Self {
            catalog: CatalogService::new(storage.clone()),
            members: MembersService::new(storage.clone(), clock.clone()),
            lending: LendingService::new(storage, clock),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn librarian_passes_both_checks() {
        assert!(Actor::Librarian.require_librarian().is_ok());
        assert!(Actor::Librarian.require_self_or_librarian("1001").is_ok());
    }

    #[test]
    fn member_is_limited_to_own_records() {
        let actor = Actor::Member("1001".to_string());
        assert!(matches!(
            actor.require_librarian(),
            Err(AppError::Authorization(_))
        ));
        assert!(actor.require_self_or_librarian("1001").is_ok());
        assert!(matches!(
            actor.require_self_or_librarian("1002"),
            Err(AppError::Authorization(_))
        ));
    }
}
