//! Repository Implementations
//!
//! PostgreSQL implementations of domain repository traits.
//!
//! ## Available Repositories
//!
//! - **PgUserRepository** - Accounts with unique username and email
//! - **PgEventRepository** - Events scoped by owner

mod event_repository;
mod user_repository;

pub use event_repository::PgEventRepository;
pub use user_repository::PgUserRepository;
