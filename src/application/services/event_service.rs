//! Event Service
//!
//! Event CRUD scoped to the requesting user. Every mutation goes through the
//! [`AuthorizationGate`]; uploads happen before anything is persisted so a
//! failed upload leaves no trace.

use std::sync::Arc;
use std::time::{Duration, Instant};

use chrono::Utc;
use tracing::{info, warn};

use super::uploader::{Asset, AssetUploader, UploadError};
use crate::application::dto::request::NewEventInput;
use crate::domain::{AuthorizationGate, Event, EventPatch, EventRepository, NewEvent, OwnershipError};
use crate::infrastructure::metrics;
use crate::shared::error::AppError;
use crate::shared::snowflake::SnowflakeGenerator;

/// Event errors
#[derive(Debug, thiserror::Error)]
pub enum EventError {
    #[error("Event not found")]
    NotFound,

    #[error("Not the owner of this event")]
    Forbidden,

    #[error("Asset upload failed: {0}")]
    UpstreamUploadFailure(String),

    #[error("Internal error: {0}")]
    Internal(String),
}

impl From<OwnershipError> for EventError {
    fn from(err: OwnershipError) -> Self {
        match err {
            OwnershipError::NotFound => EventError::NotFound,
            OwnershipError::Forbidden => EventError::Forbidden,
        }
    }
}

impl From<AppError> for EventError {
    fn from(err: AppError) -> Self {
        match err {
            // The row vanished between the ownership check and the write.
            AppError::NotFound(_) => EventError::NotFound,
            other => EventError::Internal(other.to_string()),
        }
    }
}

impl From<EventError> for AppError {
    fn from(err: EventError) -> Self {
        match err {
            EventError::NotFound => AppError::NotFound("Event not found".into()),
            EventError::Forbidden => AppError::Forbidden,
            EventError::UpstreamUploadFailure(detail) => AppError::UpstreamUploadFailure(detail),
            EventError::Internal(detail) => AppError::Persistence(detail),
        }
    }
}

pub struct EventService {
    event_repo: Arc<dyn EventRepository>,
    uploader: Arc<dyn AssetUploader>,
    id_generator: Arc<SnowflakeGenerator>,
    upload_timeout: Duration,
}

impl EventService {
    pub fn new(
        event_repo: Arc<dyn EventRepository>,
        uploader: Arc<dyn AssetUploader>,
        id_generator: Arc<SnowflakeGenerator>,
        upload_timeout: Duration,
    ) -> Self {
        Self {
            event_repo,
            uploader,
            id_generator,
            upload_timeout,
        }
    }

    /// Events owned by `user_id`, oldest first.
    pub async fn list(&self, user_id: i64) -> Result<Vec<Event>, EventError> {
        Ok(self.event_repo.list_by_owner(user_id).await?)
    }

    /// Load an event for its owner's edit view.
    pub async fn get_for_edit(&self, user_id: i64, event_id: i64) -> Result<Event, EventError> {
        let event = self.event_repo.find_by_id(event_id).await?;
        let event = AuthorizationGate::require_owner(user_id, event.as_ref())?;
        Ok(event.clone())
    }

    /// Create an event owned by `user_id`.
    pub async fn create(
        &self,
        user_id: i64,
        input: NewEventInput,
        asset: Option<Asset>,
    ) -> Result<Event, EventError> {
        let image_url = match asset {
            Some(asset) => Some(self.upload(asset).await.inspect_err(|_| {
                metrics::record_event_operation("create", "upload_failed");
            })?),
            None => None,
        };

        let new_event = NewEvent {
            id: self.id_generator.generate(),
            owner_id: user_id,
            title: input.title,
            description: input.description,
            date: input.date,
            image_url,
        };

        let event = self.event_repo.create(new_event).await?;
        metrics::record_event_operation("create", "success");
        info!(event_id = event.id, owner_id = user_id, "Event created");
        Ok(event)
    }

    /// Apply a partial update. Only the owner may update, and ownership is
    /// never changed.
    pub async fn update(
        &self,
        user_id: i64,
        event_id: i64,
        patch: EventPatch,
        asset: Option<Asset>,
    ) -> Result<Event, EventError> {
        let mut event = self.get_for_edit(user_id, event_id).await.inspect_err(|e| {
            metrics::record_event_operation("update", outcome(e));
        })?;

        let image_url = match asset {
            Some(asset) => Some(self.upload(asset).await.inspect_err(|_| {
                metrics::record_event_operation("update", "upload_failed");
            })?),
            None => None,
        };

        event.apply(patch, image_url, Utc::now());
        let updated = self.event_repo.update(&event).await?;

        metrics::record_event_operation("update", "success");
        info!(event_id, owner_id = user_id, "Event updated");
        Ok(updated)
    }

    /// Delete an event owned by `user_id`.
    pub async fn delete(&self, user_id: i64, event_id: i64) -> Result<(), EventError> {
        self.get_for_edit(user_id, event_id).await.inspect_err(|e| {
            metrics::record_event_operation("delete", outcome(e));
        })?;

        if !self.event_repo.delete(event_id).await? {
            // Removed concurrently between the check and the delete.
            return Err(EventError::NotFound);
        }

        metrics::record_event_operation("delete", "success");
        info!(event_id, owner_id = user_id, "Event deleted");
        Ok(())
    }

    async fn upload(&self, asset: Asset) -> Result<String, EventError> {
        let started = Instant::now();

        let result = match tokio::time::timeout(self.upload_timeout, self.uploader.upload(asset)).await {
            Ok(result) => result,
            Err(_) => Err(UploadError::TimedOut(self.upload_timeout)),
        };

        let elapsed = started.elapsed().as_secs_f64();
        match result {
            Ok(url) => {
                metrics::record_upload("success", elapsed);
                Ok(url)
            }
            Err(e) => {
                metrics::record_upload("failure", elapsed);
                warn!(error = %e, "Asset upload failed");
                Err(EventError::UpstreamUploadFailure(e.to_string()))
            }
        }
    }
}

fn outcome(err: &EventError) -> &'static str {
    match err {
        EventError::NotFound => "not_found",
        EventError::Forbidden => "forbidden",
        EventError::UpstreamUploadFailure(_) => "upload_failed",
        EventError::Internal(_) => "error",
    }
}
