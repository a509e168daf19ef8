//! Shared text validators.

use super::ValidationError;

/// Requires a string that is non-empty after trimming.
///
/// Returns the original value untouched so callers can store it verbatim.
pub fn require_non_empty<'a>(field: &str, value: &'a str) -> Result<&'a str, ValidationError> {
    if value.trim().is_empty() {
        Err(ValidationError::empty_field(field))
    } else {
        Ok(value)
    }
}

/// Returns true if the optional text is absent or blank.
pub fn is_blank(value: Option<&str>) -> bool {
    value.map_or(true, |v| v.trim().is_empty())
}
