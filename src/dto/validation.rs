//! Validation helpers for DTOs.

use validator::ValidationError;

/// Validates that a session join code is exactly 6 uppercase alphanumeric
/// characters.
///
/// # Examples
///
/// ```ignore
/// validate_session_code("A1B2C3") // Ok
/// validate_session_code("a1b2c3") // Err - lowercase
/// validate_session_code("A1B2C")  // Err - too short
/// ```
pub fn validate_session_code(code: &str) -> Result<(), ValidationError> {
    if code.len() != 6 {
        let mut err = ValidationError::new("session_code_length");
        err.message =
            Some(format!("Session code must be exactly 6 characters (got {})", code.len()).into());
        return Err(err);
    }

    if !code
        .chars()
        .all(|c| c.is_ascii_alphanumeric() && !c.is_ascii_lowercase())
    {
        let mut err = ValidationError::new("session_code_format");
        err.message =
            Some("Session code must contain only uppercase alphanumeric characters".into());
        return Err(err);
    }

    Ok(())
}

/// Validates that an ABV percentage is strictly positive and at most 100.
pub fn validate_abv(abv: f64) -> Result<(), ValidationError> {
    if abv <= 0.0 || abv > 100.0 {
        let mut err = ValidationError::new("abv_range");
        err.message = Some(format!("ABV must be within (0, 100] (got {abv})").into());
        return Err(err);
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validate_session_code_valid() {
        assert!(validate_session_code("A1B2C3").is_ok());
        assert!(validate_session_code("ZZZZZZ").is_ok());
        assert!(validate_session_code("000000").is_ok());
    }

    #[test]
    fn test_validate_session_code_invalid_length() {
        assert!(validate_session_code("A1B2C").is_err()); // too short
        assert!(validate_session_code("A1B2C3D").is_err()); // too long
        assert!(validate_session_code("").is_err()); // empty
    }

    #[test]
    fn test_validate_session_code_invalid_format() {
        assert!(validate_session_code("a1b2c3").is_err()); // lowercase
        assert!(validate_session_code("A1B2C!").is_err()); // punctuation
        assert!(validate_session_code("A1 2C3").is_err()); // space
    }

    #[test]
    fn test_validate_abv() {
        assert!(validate_abv(40.0).is_ok());
        assert!(validate_abv(0.1).is_ok());
        assert!(validate_abv(100.0).is_ok());
        assert!(validate_abv(0.0).is_err());
        assert!(validate_abv(-4.0).is_err());
        assert!(validate_abv(100.5).is_err());
    }
}
