//! Event Handlers
//!
//! Create and update accept `multipart/form-data` with text fields `title`,
//! `description`, `date` and an optional file part `image`.

use axum::{
    extract::{multipart::MultipartError, Multipart, Path, State},
    http::StatusCode,
    Json,
};

use crate::application::dto::{EventForm, EventListResponse, EventResponse};
use crate::application::services::Asset;
use crate::presentation::http::extractors::CurrentUser;
use crate::shared::error::{AppError, FieldError};
use crate::startup::AppState;

/// List the caller's events
pub async fn list_events(
    State(state): State<AppState>,
    user: CurrentUser,
) -> Result<Json<EventListResponse>, AppError> {
    let events = state.events.list(user.user_id).await?;
    Ok(Json(events.into()))
}

/// Create an event owned by the caller
pub async fn create_event(
    State(state): State<AppState>,
    user: CurrentUser,
    multipart: Multipart,
) -> Result<(StatusCode, Json<EventResponse>), AppError> {
    let (form, asset) = read_event_form(multipart).await?;
    let input = form.into_new_event().map_err(AppError::Validation)?;

    let event = state.events.create(user.user_id, input, asset).await?;
    Ok((StatusCode::CREATED, Json(event.into())))
}

/// Load an event for editing (owner only)
pub async fn edit_event(
    State(state): State<AppState>,
    user: CurrentUser,
    Path(event_id): Path<String>,
) -> Result<Json<EventResponse>, AppError> {
    let event_id = parse_event_id(&event_id)?;
    let event = state.events.get_for_edit(user.user_id, event_id).await?;
    Ok(Json(event.into()))
}

/// Update an event (owner only)
pub async fn update_event(
    State(state): State<AppState>,
    user: CurrentUser,
    Path(event_id): Path<String>,
    multipart: Multipart,
) -> Result<Json<EventResponse>, AppError> {
    let event_id = parse_event_id(&event_id)?;
    let (form, asset) = read_event_form(multipart).await?;
    let patch = form.into_patch().map_err(AppError::Validation)?;

    let event = state
        .events
        .update(user.user_id, event_id, patch, asset)
        .await?;
    Ok(Json(event.into()))
}

/// Delete an event (owner only)
pub async fn delete_event(
    State(state): State<AppState>,
    user: CurrentUser,
    Path(event_id): Path<String>,
) -> Result<StatusCode, AppError> {
    let event_id = parse_event_id(&event_id)?;
    state.events.delete(user.user_id, event_id).await?;
    Ok(StatusCode::NO_CONTENT)
}

/// Non-numeric ids can never name an event.
fn parse_event_id(raw: &str) -> Result<i64, AppError> {
    raw.parse()
        .map_err(|_| AppError::NotFound("Event not found".into()))
}

async fn read_event_form(mut multipart: Multipart) -> Result<(EventForm, Option<Asset>), AppError> {
    let mut form = EventForm::default();
    let mut asset = None;

    while let Some(field) = multipart.next_field().await.map_err(multipart_error)? {
        let Some(name) = field.name().map(str::to_string) else {
            continue;
        };

        match name.as_str() {
            "title" => form.title = Some(field.text().await.map_err(multipart_error)?),
            "description" => form.description = Some(field.text().await.map_err(multipart_error)?),
            "date" => form.date = Some(field.text().await.map_err(multipart_error)?),
            "image" => {
                let file_name = field.file_name().map(str::to_string);
                let content_type = field.content_type().map(str::to_string);
                let bytes = field.bytes().await.map_err(multipart_error)?;

                // Browsers submit an empty part when no file was chosen.
                if !bytes.is_empty() {
                    asset = Some(Asset {
                        bytes: bytes.to_vec(),
                        file_name: file_name.filter(|n| !n.is_empty()),
                        content_type,
                    });
                }
            }
            other => tracing::debug!(field = other, "Ignoring unknown form field"),
        }
    }

    Ok((form, asset))
}

fn multipart_error(err: MultipartError) -> AppError {
    if err.status() == StatusCode::PAYLOAD_TOO_LARGE {
        AppError::PayloadTooLarge
    } else {
        AppError::Validation(vec![FieldError::new("form", err.body_text())])
    }
}
