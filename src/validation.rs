//! Field validation for request payloads.
//!
//! Validators report a message key rather than display text; the key is
//! localized when the error is rendered into the envelope. Rules run in
//! field order and every violation is collected, so a client sees all of
//! them at once.
//!
//! # Example
//!
//! ```rust,ignore
//! impl Validatable for ProductPayload {
//!     fn validate(&self) -> Result<(), ValidationErrors> {
//!         let mut errors = ValidationErrors::new();
//!         if let Some(name) = errors.collect(validate_required("name", self.name.as_deref(), "ProductNameRequired")) {
//!             errors.collect(validate_max_chars("name", name, 5, "ProductNameMaxLength"));
//!         }
//!         errors.result()
//!     }
//! }
//! ```

use serde::Serialize;
use std::fmt;

use crate::errors::ApiError;

/// One violated rule.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct ValidationError {
    pub field: &'static str,
    /// Message key, localized at render time
    pub key: &'static str,
}

impl ValidationError {
    #[must_use]
    pub fn new(field: &'static str, key: &'static str) -> Self {
        Self { field, key }
    }
}

impl fmt::Display for ValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.field, self.key)
    }
}

impl std::error::Error for ValidationError {}

#[derive(Debug, Clone, Default, Serialize)]
pub struct ValidationErrors {
    errors: Vec<ValidationError>,
}

impl ValidationErrors {
    #[must_use]
    pub fn new() -> Self {
        Self { errors: Vec::new() }
    }

    pub fn add(&mut self, error: ValidationError) {
        self.errors.push(error);
    }

    /// Records the error of a failed check and passes a success through.
    pub fn collect<T>(&mut self, check: Result<T, ValidationError>) -> Option<T> {
        match check {
            Ok(value) => Some(value),
            Err(error) => {
                self.add(error);
                None
            }
        }
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.errors.is_empty()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.errors.len()
    }

    #[must_use]
    pub fn errors(&self) -> &[ValidationError] {
        &self.errors
    }

    /// Message keys in the order the rules ran.
    #[must_use]
    pub fn keys(&self) -> Vec<&'static str> {
        self.errors.iter().map(|e| e.key).collect()
    }

    /// # Errors
    /// Returns `self` if any rule was violated.
    pub fn result(self) -> Result<(), Self> {
        if self.is_empty() { Ok(()) } else { Err(self) }
    }
}

impl fmt::Display for ValidationErrors {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Validation failed with {} error(s):", self.errors.len())?;
        for error in &self.errors {
            write!(f, "\n  - {error}")?;
        }
        Ok(())
    }
}

impl std::error::Error for ValidationErrors {}

impl From<ValidationErrors> for ApiError {
    fn from(errors: ValidationErrors) -> Self {
        ApiError::validation_failed(errors.keys())
    }
}

/// Implemented by request payloads. The default accepts everything.
pub trait Validatable {
    /// # Errors
    /// Every violated rule, in field order.
    fn validate(&self) -> Result<(), ValidationErrors> {
        Ok(())
    }
}

pub mod validators {
    use super::ValidationError;

    /// Non-blank text.
    ///
    /// # Errors
    /// `key` when the value is missing or whitespace only.
    pub fn validate_required<'a>(
        field: &'static str,
        value: Option<&'a str>,
        key: &'static str,
    ) -> Result<&'a str, ValidationError> {
        value
            .filter(|v| !v.trim().is_empty())
            .ok_or(ValidationError::new(field, key))
    }

    /// Any supplied value.
    ///
    /// # Errors
    /// `key` when the value is missing.
    pub fn validate_present<T>(
        field: &'static str,
        value: Option<T>,
        key: &'static str,
    ) -> Result<T, ValidationError> {
        value.ok_or(ValidationError::new(field, key))
    }

    /// Counts characters, not bytes.
    ///
    /// # Errors
    /// `key` when `value` is longer than `max` characters.
    pub fn validate_max_chars(
        field: &'static str,
        value: &str,
        max: usize,
        key: &'static str,
    ) -> Result<(), ValidationError> {
        if value.chars().count() > max {
            return Err(ValidationError::new(field, key));
        }
        Ok(())
    }

    /// # Errors
    /// `key` when `value < min`.
    pub fn validate_min<T: PartialOrd>(
        field: &'static str,
        value: T,
        min: T,
        key: &'static str,
    ) -> Result<(), ValidationError> {
        if value < min {
            return Err(ValidationError::new(field, key));
        }
        Ok(())
    }

    /// Required number with a lower bound, the common shape for quantities.
    ///
    /// # Errors
    /// `required_key` when missing, `min_key` when below `min`.
    pub fn validate_required_min<T: PartialOrd + Copy>(
        field: &'static str,
        value: Option<T>,
        min: T,
        required_key: &'static str,
        min_key: &'static str,
    ) -> Result<T, ValidationError> {
        let value = validate_present(field, value, required_key)?;
        validate_min(field, value, min, min_key)?;
        Ok(value)
    }
}

#[cfg(test)]
mod tests {
    use super::validators::*;
    use super::*;

    #[test]
    fn test_validation_errors_collection() {
        let mut errors = ValidationErrors::new();
        assert!(errors.is_empty());

        errors.add(ValidationError::new("name", "ProductNameRequired"));
        assert_eq!(errors.collect(validate_present("stock", Some(3), "ProductStockRequired")), Some(3));
        assert_eq!(errors.collect(validate_present::<i32>("price", None, "PriceRequired")), None);

        assert_eq!(errors.len(), 2);
        assert_eq!(errors.keys(), vec!["ProductNameRequired", "PriceRequired"]);
        assert!(errors.result().is_err());
    }

    #[test]
    fn test_validate_required() {
        assert!(validate_required("color", None, "ColorRequired").is_err());
        assert!(validate_required("color", Some(""), "ColorRequired").is_err());
        assert!(validate_required("color", Some("   "), "ColorRequired").is_err());
        assert_eq!(validate_required("color", Some("red"), "ColorRequired"), Ok("red"));
    }

    #[test]
    fn test_validate_max_chars_counts_characters() {
        assert!(validate_max_chars("name", "abcde", 5, "ProductNameMaxLength").is_ok());
        assert!(validate_max_chars("name", "abcdef", 5, "ProductNameMaxLength").is_err());
        // Five Arabic letters are ten bytes but only five characters.
        assert!(validate_max_chars("name", "مرحبا", 5, "ProductNameMaxLength").is_ok());
    }

    #[test]
    fn test_validate_required_min() {
        let missing = validate_required_min::<i32>("stock", None, 1, "ProductStockRequired", "StockMinLength");
        assert_eq!(missing.unwrap_err().key, "ProductStockRequired");

        let low = validate_required_min("stock", Some(0), 1, "ProductStockRequired", "StockMinLength");
        assert_eq!(low.unwrap_err().key, "StockMinLength");

        assert_eq!(
            validate_required_min("stock", Some(1), 1, "ProductStockRequired", "StockMinLength"),
            Ok(1)
        );
    }

    #[test]
    fn test_into_api_error_keeps_order() {
        let mut errors = ValidationErrors::new();
        errors.add(ValidationError::new("price", "PriceRange"));
        errors.add(ValidationError::new("color", "ColorRequired"));
        match ApiError::from(errors) {
            ApiError::ValidationFailed { errors } => {
                assert_eq!(errors, vec!["PriceRange", "ColorRequired"]);
            }
            other => panic!("unexpected {other:?}"),
        }
    }
}
