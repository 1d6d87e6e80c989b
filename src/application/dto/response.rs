//! Response DTOs
//!
//! Data structures for API response bodies. Snowflake IDs are rendered as
//! strings so JavaScript clients don't lose precision.

use serde::Serialize;

use crate::domain::{Event, User};
use crate::shared::error::FieldError;

/// User response
#[derive(Debug, Serialize)]
pub struct UserResponse {
    pub id: String,
    pub username: String,
    pub email: String,
    pub created_at: String,
}

impl From<User> for UserResponse {
    fn from(user: User) -> Self {
        Self {
            id: user.id.to_string(),
            username: user.username,
            email: user.email,
            created_at: user.created_at.to_rfc3339(),
        }
    }
}

/// Event response
#[derive(Debug, Serialize)]
pub struct EventResponse {
    pub id: String,
    pub owner_id: String,
    pub title: String,
    pub description: String,
    /// `YYYY-MM-DD`
    pub date: String,
    pub image_url: Option<String>,
    pub created_at: String,
    pub updated_at: String,
}

impl From<Event> for EventResponse {
    fn from(event: Event) -> Self {
        Self {
            id: event.id.to_string(),
            owner_id: event.owner_id.to_string(),
            title: event.title,
            description: event.description,
            date: event.date.format("%Y-%m-%d").to_string(),
            image_url: event.image_url,
            created_at: event.created_at.to_rfc3339(),
            updated_at: event.updated_at.to_rfc3339(),
        }
    }
}

/// Event list response
#[derive(Debug, Serialize)]
pub struct EventListResponse {
    pub events: Vec<EventResponse>,
}

impl From<Vec<Event>> for EventListResponse {
    fn from(events: Vec<Event>) -> Self {
        Self {
            events: events.into_iter().map(EventResponse::from).collect(),
        }
    }
}

/// Dashboard: the signed-in user and their events
#[derive(Debug, Serialize)]
pub struct DashboardResponse {
    pub user: UserResponse,
    pub events: Vec<EventResponse>,
}

/// Failed registration: every violation plus the echoed identity fields so
/// the form can be re-populated. Passwords are never echoed.
#[derive(Debug, Serialize)]
pub struct RegisterFailureResponse {
    pub errors: Vec<FieldError>,
    pub username: String,
    pub email: String,
}
