//! Validation trait and helpers for configuration types

use crate::error::{ConfigError, Result};

/// Trait for validating configuration values
///
/// Implement this for any config type that needs checks beyond what serde
/// enforces. Errors name the dotted field path so the user can find it in
/// their config file.
pub trait Validate {
    fn validate(&self) -> Result<()>;
}

/// Range check for float settings (inclusive on both ends)
pub fn validate_range(field: impl Into<String>, value: f32, min: f32, max: f32) -> Result<()> {
    if !(min..=max).contains(&value) {
        return Err(ConfigError::OutOfRange {
            field: field.into(),
            value,
            min,
            max,
        });
    }
    Ok(())
}

/// Integer must be strictly greater than `min`
pub fn validate_positive(field: impl Into<String>, value: usize, min: usize) -> Result<()> {
    if value <= min {
        return Err(ConfigError::InvalidInteger {
            field: field.into(),
            value,
            min,
        });
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_range_valid() {
        assert!(validate_range("test", 0.5, 0.0, 1.0).is_ok());
        assert!(validate_range("test", 1.0, 0.0, 1.0).is_ok());
    }

    #[test]
    fn test_range_invalid() {
        assert!(validate_range("test", 1.5, 0.0, 1.0).is_err());
        assert!(validate_range("test", f32::NAN, 0.0, 1.0).is_err());
    }

    #[test]
    fn test_positive_valid() {
        assert!(validate_positive("test", 5, 0).is_ok());
    }

    #[test]
    fn test_positive_invalid() {
        assert!(validate_positive("test", 0, 0).is_err());
    }
}
