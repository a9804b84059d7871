use crate::error::{CoreError, Result};

/// Upper bound the backend enforces on chore titles and household names.
pub const MAX_NAME_LEN: usize = 100;

/// Checks a required short text field: not blank, and at most 100 characters
/// as sent (surrounding whitespace counts toward the limit).
pub fn validate_name(field: &'static str, value: &str) -> Result<()> {
    if value.trim().is_empty() {
        return Err(CoreError::invalid_field(field, "must not be empty"));
    }
    let len = value.chars().count();
    if len > MAX_NAME_LEN {
        return Err(CoreError::invalid_field(
            field,
            format!("must be at most {MAX_NAME_LEN} characters (got {len})"),
        ));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validate_name_bounds() {
        assert!(validate_name("title", "Dishes").is_ok());
        assert!(validate_name("title", "   ").is_err());
        assert!(validate_name("title", &"x".repeat(MAX_NAME_LEN)).is_ok());
        assert!(validate_name("title", &"x".repeat(MAX_NAME_LEN + 1)).is_err());
    }

    #[test]
    fn test_validate_name_limit_includes_surrounding_whitespace() {
        let padded = format!("  {}", "x".repeat(MAX_NAME_LEN - 1));
        let err = validate_name("title", &padded).unwrap_err();
        assert!(err.to_string().contains("got 101"));

        let padded_ok = format!(" {} ", "x".repeat(MAX_NAME_LEN - 2));
        assert!(validate_name("title", &padded_ok).is_ok());
    }

    #[test]
    fn test_validate_name_counts_chars_not_bytes() {
        assert!(validate_name("name", &"é".repeat(MAX_NAME_LEN)).is_ok());
    }
}
