//! In-Memory Stores
//!
//! Process-local implementations of the repository and session-store traits.
//! The API test suite wires these into `AppState`. Nothing survives a
//! restart.

mod event_store;
mod session_store;
mod user_store;

pub use event_store::InMemoryEventRepository;
pub use session_store::InMemorySessionStore;
pub use user_store::InMemoryUserRepository;
