//! Password validation.
//!
//! Enforces minimum requirements for backup passwords. The backup engine
//! itself accepts any non-empty password; this check belongs to the
//! export-side caller, before any key derivation runs.

use crate::error::{QuillError, Result};

/// Minimum password length in characters.
const MIN_PASSWORD_LENGTH: usize = 8;

/// Validate that a password meets minimum requirements.
///
/// # Requirements
///
/// - At least 8 characters long
/// - Not empty or only whitespace
///
/// # Returns
///
/// Returns `Ok(())` if valid, or `QuillError::InvalidInput` with an
/// explanation.
pub fn validate_password(password: &str) -> Result<()> {
    if password.trim().is_empty() {
        return Err(QuillError::InvalidInput(
            "Password cannot be empty".to_string(),
        ));
    }

    if password.len() < MIN_PASSWORD_LENGTH {
        return Err(QuillError::InvalidInput(format!(
            "Password must be at least {} characters (got {})",
            MIN_PASSWORD_LENGTH,
            password.len()
        )));
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_valid_password() {
        assert!(validate_password("my-secure-password-123").is_ok());
        assert!(validate_password("exactly12chr").is_ok());
        assert!(validate_password("longer password with spaces and symbols!@#").is_ok());
    }

    #[test]
    fn test_password_too_short() {
        let result = validate_password("short");
        assert!(result.is_err());
        assert!(result
            .unwrap_err()
            .to_string()
            .contains("at least 8 characters"));
    }

    #[test]
    fn test_password_empty() {
        assert!(validate_password("").is_err());
        assert!(validate_password("   ").is_err());
        assert!(validate_password("\n\t").is_err());
    }

    #[test]
    fn test_password_exactly_min_length() {
        let exactly_8 = "12345678";
        assert_eq!(exactly_8.len(), 8);
        assert!(validate_password(exactly_8).is_ok());
    }
}
