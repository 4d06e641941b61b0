//! Validation Traits
//!
//! Field-level checks shared by the draft constructors. Every failure is
//! reported as a [`ValidationError`] naming the wire-level field.

use crate::error::ValidationError;

/// Trait for validating non-empty strings.
///
/// # Example
/// ```
/// use relic_core::validate::ValidateNonEmpty;
///
/// assert!("Sauron".validate_non_empty("name").is_ok());
/// assert!("   ".validate_non_empty("name").is_err());
/// ```
pub trait ValidateNonEmpty {
    /// Fails with `RequiredFieldMissing` if the value is absent, empty or
    /// whitespace-only.
    fn validate_non_empty(&self, field_name: &str) -> Result<(), ValidationError>;
}

impl ValidateNonEmpty for str {
    fn validate_non_empty(&self, field_name: &str) -> Result<(), ValidationError> {
        if self.trim().is_empty() {
            return Err(ValidationError::missing(field_name));
        }
        Ok(())
    }
}

impl ValidateNonEmpty for String {
    fn validate_non_empty(&self, field_name: &str) -> Result<(), ValidationError> {
        self.as_str().validate_non_empty(field_name)
    }
}

impl<T: ValidateNonEmpty> ValidateNonEmpty for Option<T> {
    fn validate_non_empty(&self, field_name: &str) -> Result<(), ValidationError> {
        match self {
            Some(value) => value.validate_non_empty(field_name),
            None => Err(ValidationError::missing(field_name)),
        }
    }
}

/// Trait for validating text length in characters (not bytes).
pub trait ValidateMaxChars {
    fn validate_max_chars(&self, field_name: &str, max: usize) -> Result<(), ValidationError>;
}

impl ValidateMaxChars for str {
    fn validate_max_chars(&self, field_name: &str, max: usize) -> Result<(), ValidationError> {
        if self.chars().count() > max {
            return Err(ValidationError::too_long(field_name, max));
        }
        Ok(())
    }
}

impl ValidateMaxChars for String {
    fn validate_max_chars(&self, field_name: &str, max: usize) -> Result<(), ValidationError> {
        self.as_str().validate_max_chars(field_name, max)
    }
}

/// Absent optional text always passes.
impl<T: ValidateMaxChars> ValidateMaxChars for Option<T> {
    fn validate_max_chars(&self, field_name: &str, max: usize) -> Result<(), ValidationError> {
        match self {
            Some(value) => value.validate_max_chars(field_name, max),
            None => Ok(()),
        }
    }
}

/// Trait for validating numeric ranges.
pub trait ValidateRange {
    /// Validate that the value is within an inclusive range.
    fn validate_range(&self, field_name: &str, min: i64, max: i64) -> Result<(), ValidationError>;

    /// Validate that the value is zero or greater.
    fn validate_non_negative(&self, field_name: &str) -> Result<(), ValidationError> {
        self.validate_range(field_name, 0, i64::MAX)
    }
}

macro_rules! impl_validate_range {
    ($($t:ty),*) => {
        $(
            impl ValidateRange for $t {
                fn validate_range(&self, field_name: &str, min: i64, max: i64) -> Result<(), ValidationError> {
                    let value = *self as i64;
                    if value < min || value > max {
                        return Err(ValidationError::out_of_range(field_name, min, max));
                    }
                    Ok(())
                }
            }
        )*
    };
}

impl_validate_range!(i16, i32, i64);

impl<T: ValidateRange> ValidateRange for Option<T> {
    fn validate_range(&self, field_name: &str, min: i64, max: i64) -> Result<(), ValidationError> {
        match self {
            Some(value) => value.validate_range(field_name, min, max),
            None => Ok(()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validate_non_empty_str() {
        assert!("hello".validate_non_empty("test").is_ok());
        assert!("".validate_non_empty("test").is_err());
        assert!("   ".validate_non_empty("test").is_err());
        assert!("  hi  ".validate_non_empty("test").is_ok());
    }

    #[test]
    fn test_validate_non_empty_option() {
        let some_str: Option<String> = Some("hello".to_string());
        let some_empty: Option<String> = Some(String::new());
        let none_str: Option<String> = None;

        assert!(some_str.validate_non_empty("test").is_ok());
        assert!(some_empty.validate_non_empty("test").is_err());
        assert_eq!(
            none_str.validate_non_empty("test"),
            Err(ValidationError::missing("test"))
        );
    }

    #[test]
    fn test_validate_max_chars_counts_characters() {
        let elvish = "ë".repeat(255);
        assert!(elvish.len() > 255);
        assert!(elvish.validate_max_chars("name", 255).is_ok());
        assert!("x".repeat(256).validate_max_chars("name", 255).is_err());
        assert!(None::<String>.validate_max_chars("origin", 0).is_ok());
    }

    #[test]
    fn test_validate_range() {
        assert!(5i32.validate_range("test", 1, 10).is_ok());
        assert!(1i32.validate_range("test", 1, 10).is_ok());
        assert!(10i32.validate_range("test", 1, 10).is_ok());
        assert!(0i32.validate_range("test", 1, 10).is_err());
        assert!(11i32.validate_range("test", 1, 10).is_err());
        assert!((-1i32).validate_non_negative("test").is_err());
        assert!(Some(10_001i32).validate_range("power", 0, 10_000).is_err());
        assert!(None::<i32>.validate_range("power", 0, 10_000).is_ok());
    }
}
