//! Authentication Service
//!
//! Registration and credential verification. Sessions are handled by
//! [`SessionManager`](super::SessionManager); this service only turns
//! credentials into a principal.

use std::sync::Arc;

use tracing::{debug, info, warn};

use super::password_service::PasswordHasher;
use crate::application::dto::request::RegisterRequest;
use crate::domain::{NewUser, Principal, User, UserRepository};
use crate::infrastructure::metrics;
use crate::shared::error::{AppError, FieldError};
use crate::shared::snowflake::SnowflakeGenerator;
use crate::shared::validation::validate_all;

/// Authentication errors
#[derive(Debug, thiserror::Error)]
pub enum AuthError {
    #[error("Validation failed")]
    Validation(Vec<FieldError>),

    #[error("Email or username already exists")]
    DuplicateIdentity,

    /// Reported identically for an unknown email and a wrong password.
    #[error("Invalid credentials")]
    InvalidCredentials,

    #[error("Internal error: {0}")]
    Internal(String),
}

impl From<AuthError> for AppError {
    fn from(err: AuthError) -> Self {
        match err {
            AuthError::Validation(errors) => AppError::Validation(errors),
            AuthError::DuplicateIdentity => AppError::DuplicateIdentity,
            AuthError::InvalidCredentials => AppError::InvalidCredentials,
            AuthError::Internal(detail) => AppError::Persistence(detail),
        }
    }
}

/// Explicitly constructed authentication service.
pub struct AuthService {
    user_repo: Arc<dyn UserRepository>,
    hasher: Arc<PasswordHasher>,
    id_generator: Arc<SnowflakeGenerator>,
    /// Verified against when the email is unknown, so both failure paths do
    /// the same amount of hashing work.
    dummy_hash: String,
}

impl AuthService {
    /// Create a new AuthService
    pub fn new(
        user_repo: Arc<dyn UserRepository>,
        hasher: Arc<PasswordHasher>,
        id_generator: Arc<SnowflakeGenerator>,
    ) -> Result<Self, AuthError> {
        let dummy_hash = hasher
            .hash("event-manager-timing-equalizer")
            .map_err(|e| AuthError::Internal(e.to_string()))?;

        Ok(Self {
            user_repo,
            hasher,
            id_generator,
            dummy_hash,
        })
    }

    /// Register a new user.
    ///
    /// Every form violation is reported at once. Uniqueness is pre-checked,
    /// but the store's own constraint is authoritative: a concurrent
    /// registration that slips past the pre-check still fails with
    /// `DuplicateIdentity`.
    pub async fn register(&self, form: RegisterRequest) -> Result<User, AuthError> {
        if let Err(errors) = validate_all(&form) {
            metrics::record_registration("validation");
            return Err(AuthError::Validation(errors));
        }

        let username = form.username.trim().to_string();
        let email = normalize_email(&form.email);

        let existing = self
            .user_repo
            .find_by_username_or_email(&username, &email)
            .await
            .map_err(|e| AuthError::Internal(e.to_string()))?;
        if existing.is_some() {
            metrics::record_registration("duplicate");
            return Err(AuthError::DuplicateIdentity);
        }

        let password_hash = self.hash_blocking(form.password).await?;

        let new_user = NewUser {
            id: self.id_generator.generate(),
            username,
            email,
            password_hash,
        };

        match self.user_repo.create(new_user).await {
            Ok(user) => {
                metrics::record_registration("success");
                info!(user_id = user.id, "User registered");
                Ok(user)
            }
            Err(AppError::DuplicateIdentity) => {
                metrics::record_registration("duplicate");
                debug!("Registration lost a uniqueness race");
                Err(AuthError::DuplicateIdentity)
            }
            Err(e) => {
                metrics::record_registration("error");
                Err(AuthError::Internal(e.to_string()))
            }
        }
    }

    /// Verify credentials and produce the principal they identify.
    pub async fn authenticate(&self, email: &str, password: &str) -> Result<Principal, AuthError> {
        let email = normalize_email(email);

        let user = self
            .user_repo
            .find_by_email(&email)
            .await
            .map_err(|e| {
                metrics::record_login("error");
                AuthError::Internal(e.to_string())
            })?;

        let (hash, user_id) = match &user {
            Some(user) => (user.password_hash.clone(), Some(user.id)),
            None => (self.dummy_hash.clone(), None),
        };

        let matches = self.verify_blocking(password.to_string(), hash).await?;

        match user_id {
            Some(id) if matches => {
                metrics::record_login("success");
                info!(user_id = id, "User authenticated");
                Ok(Principal::User(id))
            }
            _ => {
                metrics::record_login("invalid_credentials");
                warn!("Login rejected: invalid credentials");
                Err(AuthError::InvalidCredentials)
            }
        }
    }

    async fn hash_blocking(&self, password: String) -> Result<String, AuthError> {
        let hasher = self.hasher.clone();
        tokio::task::spawn_blocking(move || hasher.hash(&password))
            .await
            .map_err(|e| AuthError::Internal(format!("Hashing task failed: {}", e)))?
            .map_err(|e| AuthError::Internal(e.to_string()))
    }

    async fn verify_blocking(&self, password: String, hash: String) -> Result<bool, AuthError> {
        let hasher = self.hasher.clone();
        tokio::task::spawn_blocking(move || hasher.verify(&password, &hash))
            .await
            .map_err(|e| AuthError::Internal(format!("Verification task failed: {}", e)))
    }
}

/// Emails are compared case-insensitively and without surrounding whitespace.
fn normalize_email(email: &str) -> String {
    email.trim().to_lowercase()
}
