//! Session Manager
//!
//! Issues, resolves and destroys server-side sessions. The client holds only
//! a random token; the store is keyed by `sha256(secret || token)` so a leaked
//! store dump cannot be replayed as cookies.

use std::sync::Arc;

use chrono::{Duration, Utc};
use rand::RngCore;
use sha2::{Digest, Sha256};
use tracing::{debug, info};

use crate::domain::{Principal, Session, SessionStore, UserRepository};
use crate::infrastructure::metrics;
use crate::shared::error::AppError;

/// Raw token size in bytes (hex encoded to twice this length).
pub const TOKEN_BYTES: usize = 32;

/// Session errors
#[derive(Debug, thiserror::Error)]
pub enum SessionError {
    #[error("Session is invalid or expired")]
    SessionInvalid,

    #[error("Internal error: {0}")]
    Internal(String),
}

impl From<AppError> for SessionError {
    fn from(err: AppError) -> Self {
        SessionError::Internal(err.to_string())
    }
}

impl From<SessionError> for AppError {
    fn from(err: SessionError) -> Self {
        match err {
            SessionError::SessionInvalid => AppError::Unauthenticated,
            SessionError::Internal(detail) => AppError::Persistence(detail),
        }
    }
}

pub struct SessionManager {
    store: Arc<dyn SessionStore>,
    user_repo: Arc<dyn UserRepository>,
    secret: String,
    idle_timeout: Duration,
}

impl SessionManager {
    pub fn new(
        store: Arc<dyn SessionStore>,
        user_repo: Arc<dyn UserRepository>,
        secret: impl Into<String>,
        idle_timeout: Duration,
    ) -> Self {
        Self {
            store,
            user_repo,
            secret: secret.into(),
            idle_timeout,
        }
    }

    /// Start a session for an authenticated principal and return the token.
    pub async fn create(&self, principal: &Principal) -> Result<String, SessionError> {
        let user_id = principal.user_id().ok_or(SessionError::SessionInvalid)?;

        let token = generate_token();
        let session = Session::new(user_id, Utc::now(), self.idle_timeout);
        self.store.insert(&self.store_key(&token), &session).await?;

        metrics::record_session("created");
        info!(user_id, "Session created");
        Ok(token)
    }

    /// Resolve a token to its principal, sliding the idle deadline.
    ///
    /// Expired sessions and sessions whose user no longer exists are removed
    /// and reported as `SessionInvalid`.
    pub async fn resolve(&self, token: &str) -> Result<Principal, SessionError> {
        if !is_well_formed(token) {
            metrics::record_session("rejected");
            return Err(SessionError::SessionInvalid);
        }

        let key = self.store_key(token);
        let Some(mut session) = self.store.find(&key).await? else {
            metrics::record_session("rejected");
            return Err(SessionError::SessionInvalid);
        };

        let now = Utc::now();
        if session.is_expired(now) {
            debug!(user_id = session.user_id, "Session idle-expired");
            self.store.remove(&key).await?;
            metrics::record_session("expired");
            return Err(SessionError::SessionInvalid);
        }

        if self.user_repo.find_by_id(session.user_id).await?.is_none() {
            debug!(user_id = session.user_id, "Session refers to a missing user");
            self.store.remove(&key).await?;
            metrics::record_session("rejected");
            return Err(SessionError::SessionInvalid);
        }

        session.touch(now, self.idle_timeout);
        self.store.touch(&key, &session).await?;

        metrics::record_session("resolved");
        Ok(Principal::User(session.user_id))
    }

    /// Invalidate a token. Unknown or malformed tokens are ignored.
    pub async fn destroy(&self, token: &str) -> Result<(), SessionError> {
        if !is_well_formed(token) {
            return Ok(());
        }
        self.store.remove(&self.store_key(token)).await?;
        metrics::record_session("destroyed");
        Ok(())
    }

    fn store_key(&self, token: &str) -> String {
        let mut hasher = Sha256::new();
        hasher.update(self.secret.as_bytes());
        hasher.update(token.as_bytes());
        hex::encode(hasher.finalize())
    }
}

fn generate_token() -> String {
    let mut bytes = [0u8; TOKEN_BYTES];
    rand::rng().fill_bytes(&mut bytes);
    hex::encode(bytes)
}

fn is_well_formed(token: &str) -> bool {
    token.len() == TOKEN_BYTES * 2 && token.bytes().all(|b| b.is_ascii_hexdigit())
}
