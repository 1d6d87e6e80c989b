//! Event entity and repository trait.
//!
//! Maps to the `events` table in the database schema.

use async_trait::async_trait;
use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

use crate::shared::error::AppError;

/// An event record owned by the user who created it.
///
/// Maps to the `events` table:
/// - id: BIGINT PRIMARY KEY (Snowflake ID)
/// - owner_id: BIGINT NOT NULL REFERENCES users(id)
/// - title: VARCHAR(200) NOT NULL
/// - description: TEXT NOT NULL DEFAULT ''
/// - date: DATE NOT NULL
/// - image_url: TEXT NULL
/// - created_at: TIMESTAMPTZ NOT NULL DEFAULT NOW()
/// - updated_at: TIMESTAMPTZ NOT NULL DEFAULT NOW()
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Event {
    pub id: i64,
    pub owner_id: i64,
    pub title: String,
    pub description: String,
    pub date: NaiveDate,
    pub image_url: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Event {
    /// Ownership check used by every mutation path.
    pub fn is_owned_by(&self, user_id: i64) -> bool {
        self.owner_id == user_id
    }

    /// Apply a partial update. The owner is not part of the patch.
    pub fn apply(&mut self, patch: EventPatch, image_url: Option<String>, now: DateTime<Utc>) {
        if let Some(title) = patch.title {
            self.title = title;
        }
        if let Some(description) = patch.description {
            self.description = description;
        }
        if let Some(date) = patch.date {
            self.date = date;
        }
        if image_url.is_some() {
            self.image_url = image_url;
        }
        self.updated_at = now;
    }
}

/// Data required to insert an event.
#[derive(Debug, Clone)]
pub struct NewEvent {
    pub id: i64,
    pub owner_id: i64,
    pub title: String,
    pub description: String,
    pub date: NaiveDate,
    pub image_url: Option<String>,
}

impl NewEvent {
    pub fn into_event(self, now: DateTime<Utc>) -> Event {
        Event {
            id: self.id,
            owner_id: self.owner_id,
            title: self.title,
            description: self.description,
            date: self.date,
            image_url: self.image_url,
            created_at: now,
            updated_at: now,
        }
    }
}

/// Fields an owner may change; `None` leaves the stored value untouched.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct EventPatch {
    pub title: Option<String>,
    pub description: Option<String>,
    pub date: Option<NaiveDate>,
}

/// Repository trait for Event data access operations.
#[async_trait]
pub trait EventRepository: Send + Sync {
    /// Find an event by ID.
    async fn find_by_id(&self, id: i64) -> Result<Option<Event>, AppError>;

    /// All events owned by `owner_id`, oldest first.
    async fn list_by_owner(&self, owner_id: i64) -> Result<Vec<Event>, AppError>;

    /// Insert a new event.
    async fn create(&self, event: NewEvent) -> Result<Event, AppError>;

    /// Persist mutable fields (title, description, date, image, updated_at).
    /// The stored owner is never rewritten.
    async fn update(&self, event: &Event) -> Result<Event, AppError>;

    /// Hard delete. Returns whether a row was removed.
    async fn delete(&self, id: i64) -> Result<bool, AppError>;
}
