//! Request principal.

use std::fmt;

/// The identity attributed to a request after session resolution.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Principal {
    /// No valid session was presented.
    #[default]
    Anonymous,
    /// A user resolved from a live session.
    User(i64),
}

impl Principal {
    /// The authenticated user id, if any.
    pub fn user_id(&self) -> Option<i64> {
        match self {
            Self::Anonymous => None,
            Self::User(id) => Some(*id),
        }
    }
}

impl fmt::Display for Principal {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Anonymous => write!(f, "anonymous"),
            Self::User(id) => write!(f, "user:{}", id),
        }
    }
}
