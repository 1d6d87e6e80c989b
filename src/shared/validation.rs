//! Validation Utilities

use validator::{Validate, ValidationErrors};

use super::error::FieldError;

/// Flatten every violated rule into field errors, ordered by field name.
pub fn field_errors(errors: &ValidationErrors) -> Vec<FieldError> {
    let mut field_errors: Vec<FieldError> = errors
        .field_errors()
        .iter()
        .flat_map(|(field, errs)| {
            errs.iter().map(move |e| FieldError {
                field: field.to_string(),
                message: e
                    .message
                    .clone()
                    .map(|m| m.to_string())
                    .unwrap_or_else(|| format!("{} is invalid", field)),
            })
        })
        .collect();

    field_errors.sort_by(|a, b| a.field.cmp(&b.field).then_with(|| a.message.cmp(&b.message)));
    field_errors
}

/// Run `validator` rules and report all violations at once.
pub fn validate_all<T: Validate>(input: &T) -> Result<(), Vec<FieldError>> {
    input.validate().map_err(|e| field_errors(&e))
}
