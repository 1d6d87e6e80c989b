//! Cache Module
//!
//! Redis connection management and the Redis-backed session store.

mod session_store;

pub use session_store::RedisSessionStore;

use redis::aio::ConnectionManager;
use redis::Client;
use tracing::{info, instrument};

use crate::config::RedisSettings;

/// Creates a Redis connection manager with automatic reconnection.
#[instrument(skip(settings), fields(url = %settings.url))]
pub async fn create_redis_client(
    settings: &RedisSettings,
) -> Result<ConnectionManager, redis::RedisError> {
    info!("Connecting to Redis...");
    let client = Client::open(settings.url.as_str())?;
    let manager = ConnectionManager::new(client).await?;
    info!("Redis connection established");
    Ok(manager)
}

/// Cache key prefixes.
pub mod keys {
    /// Prefix for session records (e.g., "session:<digest>")
    pub const SESSION: &str = "session:";

    /// Generates a session key from a token digest
    #[inline]
    pub fn session(digest: impl std::fmt::Display) -> String {
        format!("{}{}", SESSION, digest)
    }
}
