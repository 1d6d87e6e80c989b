//! Application Services
//!
//! Business logic services that coordinate domain operations.
//!
//! ## Available Services
//!
//! - **AuthService**: Registration and credential verification
//! - **SessionManager**: Session issue, resolve and teardown
//! - **EventService**: Ownership-scoped event CRUD
//! - **PasswordHasher**: Argon2id hashing
//! - **AssetUploader**: Port to the external image host

pub mod auth_service;
pub mod event_service;
pub mod password_service;
pub mod session_service;
pub mod uploader;

pub use auth_service::{AuthError, AuthService};
pub use event_service::{EventError, EventService};
pub use password_service::{PasswordError, PasswordHasher};
pub use session_service::{SessionError, SessionManager};
pub use uploader::{Asset, AssetUploader, UploadError};
