//! # Event Manager Library
//!
//! A multi-user event management service with:
//! - Account registration and password login
//! - Server-side sessions carried by an HTTP-only cookie
//! - Event CRUD where only the creator may edit or delete
//! - Event images pushed to an external media host
//!
//! ## Architecture
//!
//! - **Domain Layer**: Entities, repository traits, the authorization gate
//! - **Application Layer**: Auth, session and event services plus DTOs
//! - **Infrastructure Layer**: PostgreSQL, Redis, in-memory stores, uploader, metrics
//! - **Presentation Layer**: HTTP routes, handlers and middleware
//!
//! ## Module Structure
//!
//! ```text
//! event_manager/
//! +-- config/         Configuration management
//! +-- domain/         Entities, value objects, and traits
//! +-- application/    Services and DTOs
//! +-- infrastructure/ Storage and upstream implementations
//! +-- presentation/   HTTP routes and handlers
//! +-- shared/         Errors, validation, snowflake IDs
//! ```

// Configuration module
pub mod config;

// Domain layer
pub mod domain;

// Application layer
pub mod application;

// Infrastructure layer
pub mod infrastructure;

// Presentation layer
pub mod presentation;

// Shared utilities
pub mod shared;

// Application startup and state management
pub mod startup;

// Telemetry and observability
pub mod telemetry;
