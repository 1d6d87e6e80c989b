//! Redis Session Store
//!
//! Sessions are stored as JSON under `session:<digest>` with a Redis TTL that
//! tracks the idle deadline, so abandoned sessions expire on their own.

use async_trait::async_trait;
use chrono::Utc;
use redis::aio::ConnectionManager;
use redis::AsyncCommands;

use super::keys;
use crate::domain::{Session, SessionStore};
use crate::shared::error::AppError;

/// Session store backed by Redis
#[derive(Clone)]
pub struct RedisSessionStore {
    redis: ConnectionManager,
}

impl RedisSessionStore {
    pub fn new(redis: ConnectionManager) -> Self {
        Self { redis }
    }

    /// Redis TTL in whole seconds, at least one so the key is never persistent.
    fn ttl_secs(session: &Session) -> u64 {
        session.ttl(Utc::now()).num_seconds().max(1) as u64
    }
}

#[async_trait]
impl SessionStore for RedisSessionStore {
    async fn insert(&self, key: &str, session: &Session) -> Result<(), AppError> {
        let value = serde_json::to_string(session)
            .map_err(|e| AppError::Persistence(format!("Serialization error: {}", e)))?;

        let mut conn = self.redis.clone();
        conn.set_ex::<_, _, ()>(keys::session(key), value, Self::ttl_secs(session))
            .await?;

        Ok(())
    }

    async fn find(&self, key: &str) -> Result<Option<Session>, AppError> {
        let mut conn = self.redis.clone();
        let value: Option<String> = conn.get(keys::session(key)).await?;

        match value {
            Some(json) => {
                let session = serde_json::from_str(&json)
                    .map_err(|e| AppError::Persistence(format!("Deserialization error: {}", e)))?;
                Ok(Some(session))
            }
            None => Ok(None),
        }
    }

    async fn touch(&self, key: &str, session: &Session) -> Result<(), AppError> {
        let value = serde_json::to_string(session)
            .map_err(|e| AppError::Persistence(format!("Serialization error: {}", e)))?;

        // XX: only overwrite a live key, so a concurrent logout is not undone.
        let mut conn = self.redis.clone();
        let _: Option<String> = redis::cmd("SET")
            .arg(keys::session(key))
            .arg(value)
            .arg("EX")
            .arg(Self::ttl_secs(session))
            .arg("XX")
            .query_async(&mut conn)
            .await?;

        Ok(())
    }

    async fn remove(&self, key: &str) -> Result<(), AppError> {
        let mut conn = self.redis.clone();
        conn.del::<_, ()>(keys::session(key)).await?;
        Ok(())
    }
}
