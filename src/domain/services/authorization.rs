//! Authorization gate.
//!
//! Two checks guard every protected operation: the request must carry an
//! authenticated principal, and mutations of an event require that principal
//! to be the event's owner.

use crate::domain::entities::Event;
use crate::domain::value_objects::Principal;

/// The request carried no authenticated principal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
#[error("Authentication required")]
pub struct Unauthenticated;

/// Reasons an ownership check refuses a request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum OwnershipError {
    #[error("Resource not found")]
    NotFound,

    #[error("Not the owner of this resource")]
    Forbidden,
}

/// Domain service for authentication and ownership checks.
pub struct AuthorizationGate;

impl AuthorizationGate {
    /// Require an authenticated principal and return its user id.
    pub fn require_authenticated(principal: &Principal) -> Result<i64, Unauthenticated> {
        principal.user_id().ok_or(Unauthenticated)
    }

    /// Require that `resource` exists and is owned by `requester_id`.
    ///
    /// Existence is checked before ownership, so a missing resource is always
    /// `NotFound` regardless of who asks.
    pub fn require_owner(requester_id: i64, resource: Option<&Event>) -> Result<&Event, OwnershipError> {
        let event = resource.ok_or(OwnershipError::NotFound)?;
        if !event.is_owned_by(requester_id) {
            return Err(OwnershipError::Forbidden);
        }
        Ok(event)
    }
}
