//! Payload validation.
//!
//! Create/update models implement [`Validatable`] to express their rule
//! set; the dispatcher runs it before any store mutation and surfaces
//! failures as 422 responses.

use serde::Serialize;
use std::fmt;

/// Validation error with field name and message
#[derive(Debug, Clone, Serialize)]
pub struct ValidationError {
    /// The field that failed validation
    pub field: String,
    /// Human-readable error message
    pub message: String,
}

impl ValidationError {
    #[must_use]
    pub fn new(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            message: message.into(),
        }
    }
}

impl fmt::Display for ValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.field, self.message)
    }
}

impl std::error::Error for ValidationError {}

/// Trait for create/update models that carry a validation rule set.
///
/// Returning an error aborts the operation before the store is touched.
pub trait Validatable {
    /// # Errors
    ///
    /// Returns the first rule violation found.
    fn validate(&self) -> Result<(), ValidationError>;
}

/// Helper validators for common rules
pub mod validators {
    use super::ValidationError;
    use std::fmt;

    /// Validate value is not empty
    ///
    /// # Errors
    ///
    /// Returns a `ValidationError` for empty or whitespace-only values.
    pub fn validate_required(field: &str, value: &str) -> Result<(), ValidationError> {
        if value.trim().is_empty() {
            return Err(ValidationError::new(field, "This field is required"));
        }
        Ok(())
    }

    /// Validate string length is within range
    ///
    /// # Errors
    ///
    /// Returns a `ValidationError` when the length falls outside the bounds.
    pub fn validate_length(
        field: &str,
        value: &str,
        min: Option<usize>,
        max: Option<usize>,
    ) -> Result<(), ValidationError> {
        let len = value.len();

        if let Some(min_len) = min
            && len < min_len
        {
            return Err(ValidationError::new(
                field,
                format!("Must be at least {min_len} characters"),
            ));
        }

        if let Some(max_len) = max
            && len > max_len
        {
            return Err(ValidationError::new(
                field,
                format!("Must be at most {max_len} characters"),
            ));
        }

        Ok(())
    }

    /// Basic email validation
    ///
    /// # Errors
    ///
    /// Returns a `ValidationError` for values without an `@` and a dot, or
    /// longer than 255 characters.
    pub fn validate_email(field: &str, value: &str) -> Result<(), ValidationError> {
        if !value.contains('@') || !value.contains('.') {
            return Err(ValidationError::new(field, "Invalid email format"));
        }

        if value.len() > 255 {
            return Err(ValidationError::new(
                field,
                "Email must be at most 255 characters",
            ));
        }

        Ok(())
    }

    /// Validate number is within range
    ///
    /// # Errors
    ///
    /// Returns a `ValidationError` when the value falls outside the bounds.
    pub fn validate_range<T: PartialOrd + fmt::Display>(
        field: &str,
        value: T,
        min: Option<T>,
        max: Option<T>,
    ) -> Result<(), ValidationError> {
        if let Some(min_val) = min
            && value < min_val
        {
            return Err(ValidationError::new(
                field,
                format!("Must be at least {min_val}"),
            ));
        }

        if let Some(max_val) = max
            && value > max_val
        {
            return Err(ValidationError::new(
                field,
                format!("Must be at most {max_val}"),
            ));
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validation_error_display() {
        let err = ValidationError::new("name", "This field is required");
        assert_eq!(format!("{err}"), "name: This field is required");
    }

    #[test]
    fn test_validate_required() {
        use validators::validate_required;

        assert!(validate_required("name", "").is_err());
        assert!(validate_required("name", "   ").is_err());
        assert!(validate_required("name", "Type name").is_ok());
    }

    #[test]
    fn test_validate_length() {
        use validators::validate_length;

        assert!(validate_length("name", "ab", Some(3), None).is_err());
        assert!(validate_length("name", "abcdef", None, Some(5)).is_err());
        assert!(validate_length("name", "abc", Some(3), Some(5)).is_ok());
    }

    #[test]
    fn test_validate_email() {
        use validators::validate_email;

        assert!(validate_email("email", "user@example.com").is_ok());
        assert!(validate_email("email", "not-an-email").is_err());
        assert!(validate_email("email", "missing-domain@").is_err());

        let long = format!("{}@example.com", "a".repeat(250));
        assert!(validate_email("email", &long).is_err());
    }

    #[test]
    fn test_validate_range() {
        use validators::validate_range;

        assert!(validate_range("quantity", -1, Some(0), None).is_err());
        assert!(validate_range("quantity", 150, None, Some(120)).is_err());
        assert!(validate_range("quantity", 25, Some(0), Some(120)).is_ok());
    }
}
