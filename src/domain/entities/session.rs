//! Session entity and store trait.
//!
//! A session binds an opaque client-held token to a user id. Stores are keyed
//! by a digest of the token, never by the raw token.

use async_trait::async_trait;
use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};

use crate::shared::error::AppError;

/// Server-side session record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Session {
    /// User this session authenticates
    pub user_id: i64,

    /// When the session was created
    pub created_at: DateTime<Utc>,

    /// Last successful resolve
    pub last_seen_at: DateTime<Utc>,

    /// Deadline after which the session is idle-expired
    pub idle_expires_at: DateTime<Utc>,
}

impl Session {
    /// Create a new session with a fresh idle deadline.
    pub fn new(user_id: i64, now: DateTime<Utc>, idle_timeout: Duration) -> Self {
        Self {
            user_id,
            created_at: now,
            last_seen_at: now,
            idle_expires_at: now + idle_timeout,
        }
    }

    /// Check if the idle deadline has passed.
    pub fn is_expired(&self, now: DateTime<Utc>) -> bool {
        self.idle_expires_at <= now
    }

    /// Slide the idle deadline forward from `now`.
    pub fn touch(&mut self, now: DateTime<Utc>, idle_timeout: Duration) {
        self.last_seen_at = now;
        self.idle_expires_at = now + idle_timeout;
    }

    /// Remaining lifetime, clamped at zero.
    pub fn ttl(&self, now: DateTime<Utc>) -> Duration {
        (self.idle_expires_at - now).max(Duration::zero())
    }
}

/// Storage contract for session records.
///
/// Every method must be safe to call concurrently for the same key, and
/// `remove` must succeed when the key is already gone.
#[async_trait]
pub trait SessionStore: Send + Sync {
    /// Store a new session under `key`.
    async fn insert(&self, key: &str, session: &Session) -> Result<(), AppError>;

    /// Fetch the session stored under `key`.
    async fn find(&self, key: &str) -> Result<Option<Session>, AppError>;

    /// Persist a slid idle deadline.
    async fn touch(&self, key: &str, session: &Session) -> Result<(), AppError>;

    /// Delete the session. Idempotent.
    async fn remove(&self, key: &str) -> Result<(), AppError>;
}
