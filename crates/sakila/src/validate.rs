//! Length-bound validation for form input.
//!
//! Only upper bounds on text length are checked. A missing field is not an
//! error here; the database decides what it accepts.

use serde::Serialize;
use std::fmt;

/// A machine-friendly validation code.
#[non_exhaustive]
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ValidationCode {
    Len,
    Custom(String),
}

impl ValidationCode {
    pub fn as_str(&self) -> &str {
        match self {
            Self::Len => "len",
            Self::Custom(s) => s.as_str(),
        }
    }
}

impl Serialize for ValidationCode {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        serializer.serialize_str(self.as_str())
    }
}

/// A single field validation error.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ValidationError {
    pub field: String,
    pub code: ValidationCode,
    pub message: String,
}

impl ValidationError {
    pub fn new(field: impl Into<String>, code: ValidationCode, message: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            code,
            message: message.into(),
        }
    }
}

/// A collection of validation errors.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ValidationErrors {
    pub items: Vec<ValidationError>,
}

impl ValidationErrors {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn push(&mut self, err: ValidationError) {
        self.items.push(err);
    }

    pub fn iter(&self) -> impl Iterator<Item = &ValidationError> {
        self.items.iter()
    }

    /// `Ok(())` when nothing was collected, otherwise `Err(self)`.
    pub fn into_result(self) -> Result<(), Self> {
        if self.is_empty() { Ok(()) } else { Err(self) }
    }
}

impl fmt::Display for ValidationErrors {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, err) in self.items.iter().enumerate() {
            if i > 0 {
                f.write_str("; ")?;
            }
            f.write_str(&err.message)?;
        }
        Ok(())
    }
}

/// Record an error when `value` is longer than `max` characters.
///
/// Length is counted in `char`s, so a 25-character name with accents is
/// still 25.
pub fn check_len(errors: &mut ValidationErrors, field: &str, value: &str, max: usize) {
    if value.chars().count() > max {
        errors.push(ValidationError::new(
            field,
            ValidationCode::Len,
            format!("{field} must be at most {max} characters"),
        ));
    }
}

/// [`check_len`] for optional fields; `None` always passes.
pub fn check_len_opt(errors: &mut ValidationErrors, field: &str, value: Option<&str>, max: usize) {
    if let Some(value) = value {
        check_len(errors, field, value, max);
    }
}

/// Types that can be checked before being written.
pub trait Validate {
    fn validate(&self) -> Result<(), ValidationErrors>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn boundary_length_is_accepted() {
        let mut errors = ValidationErrors::new();
        check_len(&mut errors, "name", &"a".repeat(25), 25);
        assert!(errors.is_empty());
    }

    #[test]
    fn one_past_boundary_is_rejected() {
        let mut errors = ValidationErrors::new();
        check_len(&mut errors, "name", &"a".repeat(26), 25);
        assert_eq!(errors.len(), 1);
        assert_eq!(errors.items[0].field, "name");
        assert_eq!(errors.items[0].code, ValidationCode::Len);
        assert_eq!(errors.to_string(), "name must be at most 25 characters");
    }

    #[test]
    fn counts_chars_not_bytes() {
        let mut errors = ValidationErrors::new();
        check_len(&mut errors, "first_name", &"é".repeat(45), 45);
        assert!(errors.is_empty());
    }

    #[test]
    fn absent_optional_field_passes() {
        let mut errors = ValidationErrors::new();
        check_len_opt(&mut errors, "description", None, 1);
        assert!(errors.into_result().is_ok());
    }

    #[test]
    fn messages_are_joined() {
        let mut errors = ValidationErrors::new();
        check_len(&mut errors, "first_name", &"x".repeat(46), 45);
        check_len(&mut errors, "last_name", &"y".repeat(46), 45);
        assert_eq!(
            errors.to_string(),
            "first_name must be at most 45 characters; last_name must be at most 45 characters"
        );
    }

    #[test]
    fn serializes_code_as_string() {
        let err = ValidationError::new("name", ValidationCode::Len, "too long");
        let json = serde_json::to_value(&err).unwrap();
        assert_eq!(json["code"], "len");
    }
}
