//! # Domain Entities
//!
//! Core domain entities. All persistent entities map directly to their
//! corresponding database tables.
//!
//! - **User**: Account identity with the password hash
//! - **Event**: An event record owned by the user who created it
//! - **Session**: Server-side record behind an opaque session cookie
//!
//! ## Repository Traits
//!
//! Each entity has an associated repository (or store) trait defining data
//! access operations. These traits are implemented in the infrastructure
//! layer, following the dependency inversion principle.

mod user;
mod event;
mod session;

pub use user::{NewUser, User, UserRepository};

pub use event::{Event, EventPatch, EventRepository, NewEvent};

pub use session::{Session, SessionStore};
