//! Field-level validation reporting.
//!
//! Request bodies derive [`validator::Validate`]. This module flattens the
//! nested [`ValidationErrors`] tree into a flat, sorted list of
//! [`FieldError`]s so every violation is reported together, and provides the
//! custom validators shared by the request schemas.

use std::borrow::Cow;

use serde::Serialize;
use validator::{Validate, ValidationError, ValidationErrors, ValidationErrorsKind};

use crate::error::CoreError;
use crate::hierarchy::{PostKind, YearLabel};

/// A single violated constraint, addressed by a dotted field path
/// (`"email"`, `"years.0.label"`).
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FieldError {
    pub field: String,
    pub message: String,
}

// ---------------------------------------------------------------------------
// Flattening
// ---------------------------------------------------------------------------

/// Validate `input`, converting any failure into [`CoreError::InvalidFields`].
pub fn validate_input<T: Validate>(input: &T) -> Result<(), CoreError> {
    input
        .validate()
        .map_err(|errors| CoreError::InvalidFields(field_errors(&errors)))
}

/// Flatten a [`ValidationErrors`] tree into field errors sorted by path.
pub fn field_errors(errors: &ValidationErrors) -> Vec<FieldError> {
    let mut out = Vec::new();
    collect(errors, "", &mut out);
    out.sort_by(|a, b| a.field.cmp(&b.field).then_with(|| a.message.cmp(&b.message)));
    out
}

fn collect(errors: &ValidationErrors, prefix: &str, out: &mut Vec<FieldError>) {
    for (field, kind) in errors.errors() {
        let path = join_path(prefix, &camel_case(&field.to_string()));
        match kind {
            ValidationErrorsKind::Field(list) => {
                out.extend(list.iter().map(|err| FieldError {
                    field: path.clone(),
                    message: describe(err),
                }));
            }
            ValidationErrorsKind::Struct(inner) => collect(inner, &path, out),
            ValidationErrorsKind::List(items) => {
                for (index, inner) in items {
                    collect(inner, &join_path(&path, &index.to_string()), out);
                }
            }
        }
    }
}

/// Request bodies are camelCase on the wire; report paths the same way.
fn camel_case(segment: &str) -> String {
    let mut out = String::with_capacity(segment.len());
    let mut upper_next = false;
    for c in segment.chars() {
        if c == '_' && !out.is_empty() {
            upper_next = true;
        } else if upper_next {
            out.extend(c.to_uppercase());
            upper_next = false;
        } else {
            out.push(c);
        }
    }
    out
}

fn join_path(prefix: &str, segment: &str) -> String {
    if prefix.is_empty() {
        segment.to_string()
    } else {
        format!("{prefix}.{segment}")
    }
}

/// Human-readable message for a single constraint failure.
///
/// Explicit `message = ".."` attributes win; otherwise a message is derived
/// from the validator code and its parameters.
fn describe(err: &ValidationError) -> String {
    if let Some(message) = &err.message {
        return message.to_string();
    }
    match err.code.as_ref() {
        "length" => match (err.params.get("min"), err.params.get("max")) {
            (Some(min), Some(max)) => format!("Must be between {min} and {max} characters"),
            (Some(min), None) => format!("Must be at least {min} characters"),
            (None, Some(max)) => format!("Must be at most {max} characters"),
            _ => "Has an invalid length".to_string(),
        },
        "range" => match (err.params.get("min"), err.params.get("max")) {
            (Some(min), Some(max)) => format!("Must be between {min} and {max}"),
            (Some(min), None) => format!("Must be at least {min}"),
            (None, Some(max)) => format!("Must be at most {max}"),
            _ => "Out of range".to_string(),
        },
        "email" => "Invalid email format".to_string(),
        "required" => "Required".to_string(),
        code => format!("Invalid value ({code})"),
    }
}

// ---------------------------------------------------------------------------
// Custom validators
// ---------------------------------------------------------------------------

fn invalid(code: &'static str, message: String) -> ValidationError {
    ValidationError::new(code).with_message(Cow::Owned(message))
}

/// Absent keys deserialize to `""` for fields checked by the validators
/// below, so an empty value is reported as missing rather than malformed.
fn require(value: &str) -> Result<(), ValidationError> {
    if value.is_empty() {
        Err(invalid("required", "Required".to_string()))
    } else {
        Ok(())
    }
}

/// The value must be one of the four academic-year labels.
pub fn year_label(value: &str) -> Result<(), ValidationError> {
    require(value)?;
    value.parse::<YearLabel>().map(|_| ()).map_err(|_| {
        invalid(
            "year_label",
            format!(
                "Invalid enum value. Expected one of {}, received '{value}'",
                YearLabel::ALL.map(|l| l.as_str()).join(", ")
            ),
        )
    })
}

/// The value must be a post type discriminant (`article` or `file`).
pub fn post_kind(value: &str) -> Result<(), ValidationError> {
    require(value)?;
    value.parse::<PostKind>().map(|_| ()).map_err(|_| {
        invalid(
            "post_type",
            format!("Invalid enum value. Expected 'article' or 'file', received '{value}'"),
        )
    })
}

/// The value must be the textual form of an embedded entity id (UUID).
pub fn embedded_id(value: &str) -> Result<(), ValidationError> {
    require(value)?;
    uuid::Uuid::parse_str(value)
        .map(|_| ())
        .map_err(|_| invalid("embedded_id", "Must be a valid id".to_string()))
}

/// The value must be present and not blank once surrounding whitespace is
/// removed.
pub fn not_blank(value: &str) -> Result<(), ValidationError> {
    require(value)?;
    if value.trim().is_empty() {
        Err(invalid("not_blank", "Must not be blank".to_string()))
    } else {
        Ok(())
    }
}

/// Parse an embedded id that has already passed [`embedded_id`].
pub fn parse_embedded_id(field: &str, value: &str) -> Result<uuid::Uuid, CoreError> {
    uuid::Uuid::parse_str(value).map_err(|_| {
        CoreError::InvalidFields(vec![FieldError {
            field: field.to_string(),
            message: "Must be a valid id".to_string(),
        }])
    })
}
