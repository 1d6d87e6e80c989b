//! # Domain Services
//!
//! Domain services encapsulate business rules that don't naturally belong to
//! a single entity.
//!
//! - **AuthorizationGate**: authentication and ownership checks

mod authorization;

pub use authorization::*;
