use async_trait::async_trait;
use dashmap::DashMap;

use crate::domain::{Session, SessionStore};
use crate::shared::error::AppError;

/// Session records keyed by token digest.
#[derive(Default)]
pub struct InMemorySessionStore {
    sessions: DashMap<String, Session>,
}

impl InMemorySessionStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.sessions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.sessions.is_empty()
    }
}

#[async_trait]
impl SessionStore for InMemorySessionStore {
    async fn insert(&self, key: &str, session: &Session) -> Result<(), AppError> {
        self.sessions.insert(key.to_string(), session.clone());
        Ok(())
    }

    async fn find(&self, key: &str) -> Result<Option<Session>, AppError> {
        Ok(self.sessions.get(key).map(|entry| entry.value().clone()))
    }

    async fn touch(&self, key: &str, session: &Session) -> Result<(), AppError> {
        // A concurrent destroy wins; never resurrect a removed session.
        if let Some(mut entry) = self.sessions.get_mut(key) {
            *entry = session.clone();
        }
        Ok(())
    }

    async fn remove(&self, key: &str) -> Result<(), AppError> {
        self.sessions.remove(key);
        Ok(())
    }
}
