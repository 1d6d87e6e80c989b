//! Request DTOs
//!
//! Validated input structures for each endpoint.

use chrono::NaiveDate;
use serde::Deserialize;
use validator::Validate;

use crate::domain::EventPatch;
use crate::shared::error::FieldError;

/// Maximum title length for events.
pub const MAX_TITLE_LENGTH: usize = 200;

/// Maximum description length for events.
pub const MAX_DESCRIPTION_LENGTH: usize = 5000;

/// Registration form
#[derive(Debug, Clone, Default, Deserialize, Validate)]
pub struct RegisterRequest {
    #[serde(default)]
    #[validate(length(min = 1, max = 64, message = "Username is required (at most 64 characters)"))]
    pub username: String,

    #[serde(default)]
    #[validate(email(message = "A valid email address is required"))]
    pub email: String,

    #[serde(default)]
    #[validate(length(min = 6, message = "Password must be at least 6 characters"))]
    pub password: String,

    /// Password confirmation
    #[serde(default)]
    #[validate(
        length(min = 1, message = "Please confirm your password"),
        must_match(other = "password", message = "Passwords do not match")
    )]
    pub password2: String,
}

/// Login form. Deliberately unvalidated so every failure is reported as
/// invalid credentials.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct LoginRequest {
    #[serde(default)]
    pub email: String,

    #[serde(default)]
    pub password: String,
}

/// Text fields of an event create/update multipart form.
#[derive(Debug, Clone, Default)]
pub struct EventForm {
    pub title: Option<String>,
    pub description: Option<String>,
    pub date: Option<String>,
}

/// Validated input for a new event.
#[derive(Debug, Clone, PartialEq)]
pub struct NewEventInput {
    pub title: String,
    pub description: String,
    pub date: NaiveDate,
}

impl EventForm {
    /// Validate a create form: title and date are required.
    pub fn into_new_event(self) -> Result<NewEventInput, Vec<FieldError>> {
        let mut errors = Vec::new();

        let title = non_blank(self.title);
        if title.is_none() {
            errors.push(FieldError::new("title", "Title is required"));
        }
        check_lengths(title.as_deref(), self.description.as_deref(), &mut errors);

        let date = match non_blank(self.date) {
            Some(raw) => parse_date(&raw, &mut errors),
            None => {
                errors.push(FieldError::new("date", "Date is required"));
                None
            }
        };

        match (title, date) {
            (Some(title), Some(date)) if errors.is_empty() => Ok(NewEventInput {
                title,
                description: self.description.unwrap_or_default().trim().to_string(),
                date,
            }),
            _ => Err(errors),
        }
    }

    /// Validate an update form: absent or blank fields are left unchanged.
    pub fn into_patch(self) -> Result<EventPatch, Vec<FieldError>> {
        let mut errors = Vec::new();

        let title = non_blank(self.title);
        let description = non_blank(self.description);
        check_lengths(title.as_deref(), description.as_deref(), &mut errors);

        let date = non_blank(self.date).and_then(|raw| parse_date(&raw, &mut errors));

        if errors.is_empty() {
            Ok(EventPatch {
                title,
                description,
                date,
            })
        } else {
            Err(errors)
        }
    }
}

fn non_blank(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

fn check_lengths(title: Option<&str>, description: Option<&str>, errors: &mut Vec<FieldError>) {
    if title.is_some_and(|t| t.chars().count() > MAX_TITLE_LENGTH) {
        errors.push(FieldError::new(
            "title",
            format!("Title must be at most {} characters", MAX_TITLE_LENGTH),
        ));
    }
    if description.is_some_and(|d| d.chars().count() > MAX_DESCRIPTION_LENGTH) {
        errors.push(FieldError::new(
            "description",
            format!("Description must be at most {} characters", MAX_DESCRIPTION_LENGTH),
        ));
    }
}

fn parse_date(raw: &str, errors: &mut Vec<FieldError>) -> Option<NaiveDate> {
    match NaiveDate::parse_from_str(raw, "%Y-%m-%d") {
        Ok(date) => Some(date),
        Err(_) => {
            errors.push(FieldError::new("date", "Date must be formatted as YYYY-MM-DD"));
            None
        }
    }
}
