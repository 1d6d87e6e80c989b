//! Data Transfer Objects
//!
//! DTOs for request parsing and response serialization.

pub mod request;
pub mod response;

pub use request::{EventForm, LoginRequest, NewEventInput, RegisterRequest};
pub use response::{
    DashboardResponse, EventListResponse, EventResponse, RegisterFailureResponse, UserResponse,
};
