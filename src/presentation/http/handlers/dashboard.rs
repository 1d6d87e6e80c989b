//! Dashboard Handler

use axum::{extract::State, Json};

use crate::application::dto::{DashboardResponse, EventResponse};
use crate::presentation::http::extractors::CurrentUser;
use crate::shared::error::AppError;
use crate::startup::AppState;

/// The signed-in user together with the events they own.
pub async fn dashboard(
    State(state): State<AppState>,
    user: CurrentUser,
) -> Result<Json<DashboardResponse>, AppError> {
    // Account removed after the session resolved.
    let account = state
        .users
        .find_by_id(user.user_id)
        .await?
        .ok_or(AppError::Unauthenticated)?;

    let events = state.events.list(user.user_id).await?;

    Ok(Json(DashboardResponse {
        user: account.into(),
        events: events.into_iter().map(EventResponse::from).collect(),
    }))
}
