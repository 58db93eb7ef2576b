//! Account and profile field rules that the `validator` derives cannot
//! express on their own.

use crate::error::CoreError;

pub const MAX_USERNAME_LEN: usize = 150;
pub const MAX_BIO_LEN: u64 = 500;
pub const MAX_LOCATION_LEN: u64 = 100;
pub const MAX_PHONE_LEN: u64 = 15;
pub const MAX_URL_LEN: u64 = 200;

/// Validate a username: 1-150 characters of letters, digits and `@.+-_`.
pub fn validate_username(username: &str) -> Result<(), CoreError> {
    if username.is_empty() {
        return Err(CoreError::Validation("Username must not be empty.".into()));
    }
    if username.chars().count() > MAX_USERNAME_LEN {
        return Err(CoreError::Validation(format!(
            "Username must be at most {MAX_USERNAME_LEN} characters."
        )));
    }
    if !username
        .chars()
        .all(|c| c.is_alphanumeric() || matches!(c, '@' | '.' | '+' | '-' | '_'))
    {
        return Err(CoreError::Validation(
            "Username may contain only letters, numbers, and @/./+/-/_ characters.".into(),
        ));
    }
    Ok(())
}

/// Check that the password and its confirmation match.
pub fn validate_password_confirmation(password: &str, confirmation: &str) -> Result<(), CoreError> {
    if password != confirmation {
        return Err(CoreError::Validation(
            "The two password fields didn't match.".into(),
        ));
    }
    Ok(())
}

/// Display name: "First Last" when either part is set, otherwise the username.
pub fn display_name(username: &str, first_name: &str, last_name: &str) -> String {
    let full = format!("{} {}", first_name.trim(), last_name.trim());
    let full = full.trim();
    if full.is_empty() {
        username.to_string()
    } else {
        full.to_string()
    }
}
