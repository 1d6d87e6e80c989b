//! # Domain Value Objects
//!
//! Immutable value types that represent domain concepts without identity.
//!
//! - **Principal**: who is making the current request

mod principal;

pub use principal::*;
