//! Infrastructure Layer
//!
//! Contains implementations for external services including:
//! - Database repositories (PostgreSQL)
//! - Session store (Redis)
//! - In-memory stores
//! - The HTTP asset uploader
//! - Prometheus metrics

pub mod cache;
pub mod database;
pub mod memory;
pub mod metrics;
pub mod repositories;
pub mod uploader;
