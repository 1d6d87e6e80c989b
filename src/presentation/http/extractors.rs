//! Custom Extractors
//!
//! Session-cookie authentication for protected handlers.

use axum::{
    extract::FromRequestParts,
    http::{header::SET_COOKIE, request::Parts, HeaderMap, HeaderName, HeaderValue},
};
use axum_extra::headers::{Cookie, HeaderMapExt};

use crate::application::services::SessionError;
use crate::config::SessionSettings;
use crate::domain::{AuthorizationGate, Principal};
use crate::shared::error::AppError;
use crate::startup::AppState;

/// Authenticated user resolved from the session cookie.
///
/// Rejects with [`AppError::Unauthenticated`], which redirects to the login
/// page. Resolving also slides the session's idle deadline.
#[derive(Debug, Clone, Copy)]
pub struct CurrentUser {
    pub user_id: i64,
}

impl FromRequestParts<AppState> for CurrentUser {
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, state: &AppState) -> Result<Self, Self::Rejection> {
        let principal = match session_token(&parts.headers, &state.settings.session.cookie_name) {
            Some(token) => match state.sessions.resolve(&token).await {
                Ok(principal) => principal,
                Err(SessionError::SessionInvalid) => Principal::Anonymous,
                Err(SessionError::Internal(detail)) => return Err(AppError::Persistence(detail)),
            },
            None => Principal::Anonymous,
        };

        tracing::debug!(%principal, "Request principal resolved");
        let user_id =
            AuthorizationGate::require_authenticated(&principal).map_err(|_| AppError::Unauthenticated)?;

        tracing::Span::current().record("user_id", user_id);
        Ok(CurrentUser { user_id })
    }
}

/// Read the session token from the request's `Cookie` header.
pub fn session_token(headers: &HeaderMap, cookie_name: &str) -> Option<String> {
    headers
        .typed_get::<Cookie>()
        .and_then(|cookie| cookie.get(cookie_name).map(str::to_string))
        .filter(|token| !token.is_empty())
}

/// `Set-Cookie` header carrying a fresh session token.
pub fn session_cookie(settings: &SessionSettings, token: &str) -> Result<(HeaderName, HeaderValue), AppError> {
    cookie_header(format!(
        "{}={}; Path=/; HttpOnly; SameSite=Lax{}",
        settings.cookie_name,
        token,
        secure_flag(settings)
    ))
}

/// `Set-Cookie` header that removes the session cookie.
pub fn clear_session_cookie(settings: &SessionSettings) -> Result<(HeaderName, HeaderValue), AppError> {
    cookie_header(format!(
        "{}=; Path=/; HttpOnly; SameSite=Lax; Max-Age=0{}",
        settings.cookie_name,
        secure_flag(settings)
    ))
}

fn secure_flag(settings: &SessionSettings) -> &'static str {
    if settings.cookie_secure {
        "; Secure"
    } else {
        ""
    }
}

fn cookie_header(value: String) -> Result<(HeaderName, HeaderValue), AppError> {
    let value = HeaderValue::from_str(&value)
        .map_err(|e| AppError::Internal(format!("Invalid Set-Cookie value: {}", e)))?;
    Ok((SET_COOKIE, value))
}
