//! HTTP Handlers
//!
//! Request handlers for all HTTP endpoints.

pub mod auth;
pub mod dashboard;
pub mod events;
pub mod health;
