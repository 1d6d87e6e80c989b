//! Authentication Handlers
//!
//! Registration, login and logout. Successful transitions answer with `303`
//! redirects; the login page reads the `notice` query parameter.

use axum::{
    extract::{Query, State},
    http::{HeaderMap, StatusCode},
    response::{IntoResponse, Redirect, Response},
    Form, Json,
};
use serde::{Deserialize, Serialize};

use super::super::extractors::{clear_session_cookie, session_cookie, session_token};
use crate::application::dto::{LoginRequest, RegisterFailureResponse, RegisterRequest};
use crate::application::services::AuthError;
use crate::shared::error::{login_redirect, AppError, FieldError};
use crate::startup::AppState;

/// Where a successful login lands.
pub const DASHBOARD_PATH: &str = "/dashboard";

#[derive(Debug, Default, Deserialize)]
pub struct NoticeQuery {
    pub notice: Option<String>,
}

/// Login page model
#[derive(Debug, Serialize)]
pub struct LoginPage {
    pub notice: Option<String>,
    pub message: Option<&'static str>,
}

/// Human-readable text for a notice code.
pub fn notice_message(code: &str) -> Option<&'static str> {
    match code {
        "registered" => Some("You are now registered and can log in"),
        "logged_out" => Some("You are logged out"),
        "login_required" => Some("Please log in to view this resource"),
        "invalid_credentials" => Some("Invalid email or password"),
        _ => None,
    }
}

/// Login page
pub async fn login_page(Query(query): Query<NoticeQuery>) -> Json<LoginPage> {
    let message = query.notice.as_deref().and_then(notice_message);
    Json(LoginPage {
        notice: query.notice.filter(|_| message.is_some()),
        message,
    })
}

/// Register a new user
pub async fn register(
    State(state): State<AppState>,
    Form(body): Form<RegisterRequest>,
) -> Result<Response, AppError> {
    let username = body.username.clone();
    let email = body.email.clone();

    match state.auth.register(body).await {
        Ok(_) => Ok(login_redirect("registered").into_response()),
        Err(AuthError::Validation(errors)) => {
            Ok(register_failure(StatusCode::BAD_REQUEST, errors, username, email))
        }
        Err(AuthError::DuplicateIdentity) => Ok(register_failure(
            StatusCode::CONFLICT,
            vec![FieldError::new("email", "Email or username already exists")],
            username,
            email,
        )),
        Err(e) => Err(e.into()),
    }
}

fn register_failure(
    status: StatusCode,
    errors: Vec<FieldError>,
    username: String,
    email: String,
) -> Response {
    (
        status,
        Json(RegisterFailureResponse {
            errors,
            username,
            email,
        }),
    )
        .into_response()
}

/// Login with credentials
pub async fn login(
    State(state): State<AppState>,
    Form(body): Form<LoginRequest>,
) -> Result<Response, AppError> {
    let principal = state.auth.authenticate(&body.email, &body.password).await?;
    let token = state.sessions.create(&principal).await?;

    let cookie = session_cookie(&state.settings.session, &token)?;
    Ok(([cookie], Redirect::to(DASHBOARD_PATH)).into_response())
}

/// Logout. Always succeeds, with or without a live session.
pub async fn logout(State(state): State<AppState>, headers: HeaderMap) -> Result<Response, AppError> {
    if let Some(token) = session_token(&headers, &state.settings.session.cookie_name) {
        if let Err(e) = state.sessions.destroy(&token).await {
            tracing::warn!(error = %e, "Failed to destroy session on logout");
        }
    }

    let cookie = clear_session_cookie(&state.settings.session)?;
    Ok(([cookie], login_redirect("logged_out")).into_response())
}
