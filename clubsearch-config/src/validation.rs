// Configuration validation

use crate::{ConfigError, Result};

/// Trait for validating configuration
pub trait Validate {
    fn validate(&self) -> Result<()>;
}

/// Configuration validator with rules
pub struct ConfigValidator;

impl ConfigValidator {
    /// Validate that a value is not empty
    pub fn not_empty(value: &str, field: &str) -> Result<()> {
        if value.trim().is_empty() {
            return Err(ConfigError::ValidationError(format!(
                "{} cannot be empty",
                field
            )));
        }
        Ok(())
    }

    /// Validate that a number is within range
    pub fn in_range<T: PartialOrd + std::fmt::Display>(
        value: T,
        min: T,
        max: T,
        field: &str,
    ) -> Result<()> {
        if value < min || value > max {
            return Err(ConfigError::ValidationError(format!(
                "{} must be between {} and {}",
                field, min, max
            )));
        }
        Ok(())
    }

    /// Validate URL scheme
    pub fn is_url(value: &str, field: &str) -> Result<()> {
        if !value.starts_with("http://") && !value.starts_with("https://") {
            return Err(ConfigError::ValidationError(format!(
                "{} must be an http:// or https:// URL",
                field
            )));
        }
        Ok(())
    }

    /// Validate that two optional settings are given together or not at all
    pub fn paired<A, B>(a: &Option<A>, b: &Option<B>, field_a: &str, field_b: &str) -> Result<()> {
        if a.is_some() != b.is_some() {
            return Err(ConfigError::ValidationError(format!(
                "{} and {} must be set together",
                field_a, field_b
            )));
        }
        Ok(())
    }
}
