//! Argon2id password hashing, verification, and strength checks.
//!
//! Hashes are stored in PHC string format so the algorithm parameters and
//! salt travel with the hash.

use argon2::password_hash::rand_core::OsRng;
use argon2::password_hash::{PasswordHash, PasswordHasher, PasswordVerifier, SaltString};
use argon2::Argon2;

/// Hash a plaintext password using Argon2id with a random salt.
pub fn hash_password(password: &str) -> Result<String, argon2::password_hash::Error> {
    let salt = SaltString::generate(&mut OsRng);
    let hash = Argon2::default().hash_password(password.as_bytes(), &salt)?;
    Ok(hash.to_string())
}

/// Verify a plaintext password against a stored PHC-formatted hash.
///
/// Returns `Ok(false)` on mismatch; `Err` only for a malformed hash.
pub fn verify_password(password: &str, hash: &str) -> Result<bool, argon2::password_hash::Error> {
    let parsed_hash = PasswordHash::new(hash)?;
    match Argon2::default().verify_password(password.as_bytes(), &parsed_hash) {
        Ok(()) => Ok(true),
        Err(argon2::password_hash::Error::Password) => Ok(false),
        Err(e) => Err(e),
    }
}

/// Account details a new password must not mirror.
pub struct PasswordContext<'a> {
    pub username: &'a str,
    pub email: &'a str,
}

/// Check a registration password, returning every rule it breaks.
///
/// Rules: minimum length, not entirely numeric, and not equal to the
/// username or the local part of the email (case-insensitive).
pub fn password_problems(
    password: &str,
    min_length: usize,
    context: &PasswordContext<'_>,
) -> Vec<String> {
    let mut problems = Vec::new();

    if password.chars().count() < min_length {
        problems.push(format!(
            "This password is too short. It must contain at least {min_length} characters."
        ));
    }
    if !password.is_empty() && password.chars().all(|c| c.is_ascii_digit()) {
        problems.push("This password is entirely numeric.".to_string());
    }

    let lowered = password.to_lowercase();
    let local_part = context.email.split('@').next().unwrap_or_default();
    let mirrors = [context.username, local_part]
        .iter()
        .any(|attr| !attr.is_empty() && attr.to_lowercase() == lowered);
    if mirrors {
        problems.push("The password is too similar to your account details.".to_string());
    }

    problems
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_hash_and_verify() {
        let hash = hash_password("correct-horse-battery").expect("hashing should succeed");
        assert!(hash.starts_with("$argon2id$"));
        assert!(verify_password("correct-horse-battery", &hash).unwrap());
    }

    #[test]
    fn test_wrong_password_fails() {
        let hash = hash_password("real-password").expect("hashing should succeed");
        assert!(!verify_password("wrong-password", &hash).unwrap());
    }

    #[test]
    fn test_malformed_hash_is_an_error() {
        assert!(verify_password("anything", "not-a-phc-string").is_err());
    }

    const CTX: PasswordContext<'static> = PasswordContext {
        username: "alice",
        email: "alice.w@example.com",
    };

    #[test]
    fn test_password_length_boundary() {
        let problems = password_problems("seven7x", 8, &CTX);
        assert_eq!(problems.len(), 1);
        assert!(problems[0].contains("at least 8 characters"));
        assert!(password_problems("eight88x", 8, &CTX).is_empty());
    }

    #[test]
    fn test_numeric_password_rejected() {
        let problems = password_problems("1234567890", 8, &CTX);
        assert_eq!(problems, vec!["This password is entirely numeric.".to_string()]);
    }

    #[test]
    fn test_password_matching_account_details_rejected() {
        assert_eq!(password_problems("ALICE.W", 4, &CTX).len(), 1);
        assert_eq!(password_problems("Alice", 4, &CTX).len(), 1);
        assert!(password_problems("alice-in-wonderland", 4, &CTX).is_empty());
    }

    #[test]
    fn test_every_problem_is_reported() {
        assert_eq!(password_problems("123", 8, &CTX).len(), 2);
    }
}
