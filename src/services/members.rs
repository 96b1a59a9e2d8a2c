//! Member registration and authentication service

use std::sync::Arc;

use argon2::{
    password_hash::{rand_core::OsRng, PasswordHash, PasswordHasher, PasswordVerifier, SaltString},
    Argon2,
};
use validator::Validate;

use crate::clock::Clock;
use crate::error::{AppError, AppResult};
use crate::models::{Member, RegisterMember};
use crate::storage::Storage;

use super::Actor;

#[derive(Clone)]
pub struct MembersService {
    storage: Storage,
    clock: Arc<dyn Clock>,
}

impl MembersService {
    pub fn new(storage: Storage, clock: Arc<dyn Clock>) -> Self {
        Self { storage, clock }
    }

    /// Register a new member: validates the request, enforces email
    /// uniqueness (case-insensitive), assigns the next member ID and
    /// stores an argon2 digest of the password.
    pub fn register(&self, req: RegisterMember) -> AppResult<Member> {
        req.validate()
            .map_err(|e| AppError::Validation(e.to_string()))?;
        if req.password != req.confirm_password {
            return Err(AppError::Validation("Passwords do not match".to_string()));
        }
        validate_password(&req.password)?;
        if self.storage.members.find_by_email(&req.email)?.is_some() {
            return Err(AppError::DuplicateKey(format!(
                "Email {} is already registered",
                req.email
            )));
        }

        let member_id = self.storage.members.next_member_id()?;
        let digest = self.hash_password(&req.password)?;
        let member = Member::new(member_id, req.name, digest, req.email, self.clock.today())?;
        self.storage.members.add(&member)?;
        tracing::info!(member_id = %member.member_id, "registered member");
        Ok(member)
    }

    /// Authenticate by member ID or email. The same error covers an
    /// unknown member and a wrong password.
    pub fn authenticate(&self, id_or_email: &str, password: &str) -> AppResult<Member> {
        let member = if id_or_email.contains('@') {
            self.storage.members.find_by_email(id_or_email)?
        } else {
            self.storage.members.find_by_id(id_or_email)?
        }
        .ok_or_else(|| AppError::Authentication("Invalid member or password".to_string()))?;

        if self.verify_password(&member, password)? {
            Ok(member)
        } else {
            Err(AppError::Authentication(
                "Invalid member or password".to_string(),
            ))
        }
    }

    pub fn list_members(&self, actor: &Actor) -> AppResult<Vec<Member>> {
        actor.require_librarian()?;
        self.storage.members.load_all()
    }

    pub fn find(&self, member_id: &str) -> AppResult<Option<Member>> {
        self.storage.members.find_by_id(member_id)
    }

    /// Hash a password using argon2
    fn hash_password(&self, password: &str) -> AppResult<String> {
        let salt = SaltString::generate(&mut OsRng);
        let argon2 = Argon2::default();
        let hash = argon2
            .hash_password(password.as_bytes(), &salt)
            .map_err(|e| AppError::Internal(format!("Failed to hash password: {}", e)))?;
        Ok(hash.to_string())
    }

    fn verify_password(&self, member: &Member, password: &str) -> AppResult<bool> {
        let parsed_hash = PasswordHash::new(&member.password_digest)
            .map_err(|_| AppError::Internal("Invalid password digest".to_string()))?;
        Ok(Argon2::default()
            .verify_password(password.as_bytes(), &parsed_hash)
            .is_ok())
    }
}

/// At least 8 characters with an uppercase letter, a lowercase letter
/// and a digit
fn validate_password(password: &str) -> AppResult<()> {
    let strong = password.len() >= 8
        && password.chars().any(|c| c.is_ascii_uppercase())
        && password.chars().any(|c| c.is_ascii_lowercase())
        && password.chars().any(|c| c.is_ascii_digit());
    if strong {
        Ok(())
    } else {
        Err(AppError::Validation(
            "Password must be at least 8 characters long and contain uppercase, lowercase, and digit"
                .to_string(),
        ))
    }
}
