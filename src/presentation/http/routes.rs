//! Route Configuration
//!
//! Configures all HTTP routes.

use axum::{
    extract::DefaultBodyLimit,
    middleware,
    response::IntoResponse,
    routing::{get, post, put},
    Router,
};

use super::handlers;
use crate::infrastructure::metrics;
use crate::presentation::middleware::track_metrics;
use crate::startup::AppState;

/// Create the main router
pub fn create_router(state: AppState) -> Router {
    let max_body = state.settings.upload.max_bytes;

    Router::new()
        .nest("/users", user_routes())
        .nest("/events", event_routes(max_body))
        .route("/dashboard", get(handlers::dashboard::dashboard))
        // Health check endpoints
        .route("/health", get(handlers::health::health_check))
        .route("/health/live", get(handlers::health::liveness))
        // Prometheus metrics endpoint
        .route("/metrics", get(metrics_handler))
        .layer(middleware::from_fn(track_metrics))
        .with_state(state)
}

/// Prometheus metrics endpoint handler
async fn metrics_handler() -> impl IntoResponse {
    let metrics = metrics::gather_metrics();
    (
        [(
            axum::http::header::CONTENT_TYPE,
            "text/plain; version=0.0.4; charset=utf-8",
        )],
        metrics,
    )
}

/// Account routes (public)
fn user_routes() -> Router<AppState> {
    Router::new()
        .route("/register", post(handlers::auth::register))
        .route(
            "/login",
            get(handlers::auth::login_page).post(handlers::auth::login),
        )
        .route("/logout", get(handlers::auth::logout))
}

/// Event routes (session required, enforced by the `CurrentUser` extractor)
fn event_routes(max_body: usize) -> Router<AppState> {
    Router::new()
        .route(
            "/",
            get(handlers::events::list_events).post(handlers::events::create_event),
        )
        .route("/{id}/edit", get(handlers::events::edit_event))
        .route(
            "/{id}",
            put(handlers::events::update_event).delete(handlers::events::delete_event),
        )
        .layer(DefaultBodyLimit::max(max_body))
}
