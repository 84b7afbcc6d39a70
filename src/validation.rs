use axum::{extract::rejection::JsonRejection, Json};
use tracing::warn;
use validator::{Validate, ValidationError, ValidationErrors, ValidationErrorsKind};

use crate::shared::AppError;

/// Unwraps a JSON body, turning axum's rejection into a 400 validation error
pub fn json_payload<T>(payload: Result<Json<T>, JsonRejection>) -> Result<T, AppError> {
    match payload {
        Ok(Json(value)) => Ok(value),
        Err(rejection) => {
            warn!(status = %rejection.status(), "Request body rejected");
            Err(AppError::Validation(vec![rejection.body_text()]))
        }
    }
}

/// Rejects empty and whitespace-only strings
pub fn non_blank(value: &str) -> Result<(), ValidationError> {
    if value.trim().is_empty() {
        return Err(ValidationError::new("blank"));
    }
    Ok(())
}

/// Runs the derived validation rules and turns failures into a 400 error
pub fn validate_payload<T: Validate>(payload: &T) -> Result<(), AppError> {
    payload
        .validate()
        .map_err(|errors| AppError::Validation(collect_messages(&errors)))
}

/// Flattens field, nested and list errors into human readable messages,
/// sorted and deduplicated for stable output
pub fn collect_messages(errors: &ValidationErrors) -> Vec<String> {
    let mut messages = Vec::new();
    push_messages(errors, &mut messages);
    messages.sort();
    messages.dedup();
    messages
}

fn push_messages(errors: &ValidationErrors, out: &mut Vec<String>) {
    for (field, kind) in errors.errors() {
        match kind {
            ValidationErrorsKind::Field(field_errors) => {
                out.extend(field_errors.iter().map(|error| match &error.message {
                    Some(message) => message.to_string(),
                    None => format!("{} is invalid", field),
                }));
            }
            ValidationErrorsKind::Struct(inner) => push_messages(inner, out),
            ValidationErrorsKind::List(items) => {
                for inner in items.values() {
                    push_messages(inner, out);
                }
            }
        }
    }
}
