//! Field checks run before anything is sent. They mirror what the API enforces
//! so the user gets feedback early; the API remains the authority.

use crate::errors::AppError;
use regex::Regex;

pub const MIN_PASSWORD_LENGTH: usize = 6;

pub const INVALID_EMAIL: &str = "Please enter a valid email address";
pub const SHORT_PASSWORD: &str = "Password must be at least 6 characters long";

#[must_use]
pub fn valid_email(email: &str) -> bool {
    Regex::new(r"^[^\s@]+@[^\s@]+\.[^\s@]+$").map_or(false, |re| re.is_match(email))
}

/// Real-time email check: empty is not an error yet, a malformed address is.
///
/// # Errors
/// Returns `AppError::Validation` for a non-empty malformed address.
pub fn check_email_field(value: &str) -> Result<(), AppError> {
    if value.is_empty() || valid_email(value) {
        Ok(())
    } else {
        Err(AppError::Validation(INVALID_EMAIL.to_string()))
    }
}

/// Real-time password check: empty is not an error yet, a short password is.
///
/// # Errors
/// Returns `AppError::Validation` for a non-empty password below the minimum.
pub fn check_password_field(value: &str) -> Result<(), AppError> {
    let length = value.chars().count();
    if length > 0 && length < MIN_PASSWORD_LENGTH {
        Err(AppError::Validation(SHORT_PASSWORD.to_string()))
    } else {
        Ok(())
    }
}
