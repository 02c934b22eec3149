//! # Validation Utilities
//!
//! Single-field checks. Each returns the constraint message on failure so
//! callers can collect them into a field violation tree.

/// Validate that a string is not blank.
pub fn validate_not_empty(value: &str, field_name: &str) -> Result<(), String> {
    if value.trim().is_empty() {
        Err(format!("{field_name} should not be empty"))
    } else {
        Ok(())
    }
}

/// Validate email format (basic shape check: `local@domain.tld`).
pub fn validate_email(email: &str) -> Result<(), String> {
    let valid = match email.split_once('@') {
        Some((local, domain)) => {
            !local.is_empty()
                && !domain.starts_with('.')
                && !domain.ends_with('.')
                && domain.contains('.')
                && !domain.contains('@')
        }
        None => false,
    };

    if valid {
        Ok(())
    } else {
        Err("email must be an email".to_string())
    }
}

/// Validate character length within `min..=max`.
pub fn validate_length(value: &str, min: usize, max: usize, field_name: &str) -> Result<(), String> {
    let len = value.chars().count();
    if len < min {
        Err(format!("{field_name} must be at least {min} characters"))
    } else if len > max {
        Err(format!("{field_name} must be at most {max} characters"))
    } else {
        Ok(())
    }
}
