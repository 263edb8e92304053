//! Password hashing (argon2) and the pluggable password policy.

use argon2::{Argon2, password_hash::{PasswordHasher, PasswordVerifier, SaltString}, PasswordHash};
use rand::rngs::OsRng;

use super::errors::AuthError;

pub const PASSWORD_ALGORITHM: &str = "argon2";

/// Decides whether a candidate password is acceptable for a user.
/// Returns human-readable reasons; empty means accepted.
pub trait PasswordValidator: Send + Sync {
    fn validate(&self, password: &str, username: &str, email: &str) -> Vec<String>;
}

/// Length, not-all-digits and not-the-username checks.
#[derive(Debug, Clone)]
pub struct DefaultPasswordPolicy {
    pub min_length: usize,
}

impl Default for DefaultPasswordPolicy {
    fn default() -> Self { Self { min_length: 6 } }
}

impl PasswordValidator for DefaultPasswordPolicy {
    fn validate(&self, password: &str, username: &str, email: &str) -> Vec<String> {
        let mut reasons = Vec::new();
        if password.chars().count() < self.min_length {
            reasons.push(format!(
                "This password is too short. It must contain at least {} characters.",
                self.min_length
            ));
        }
        if !password.is_empty() && password.chars().all(|c| c.is_ascii_digit()) {
            reasons.push("This password is entirely numeric.".to_string());
        }
        let lowered = password.to_lowercase();
        let local_part = email.split('@').next().unwrap_or("").to_lowercase();
        if lowered == username.to_lowercase() || (!local_part.is_empty() && lowered == local_part) {
            reasons.push("The password is too similar to the username.".to_string());
        }
        reasons
    }
}

pub fn hash_password(password: &str) -> Result<String, AuthError> {
    let salt = SaltString::generate(&mut OsRng);
    Argon2::default()
        .hash_password(password.as_bytes(), &salt)
        .map(|h| h.to_string())
        .map_err(|e| AuthError::HashError(e.to_string()))
}

/// `Ok(false)` on mismatch; `Err` only when the stored hash is unreadable.
pub fn verify_password(password: &str, stored_hash: &str) -> Result<bool, AuthError> {
    let parsed = PasswordHash::new(stored_hash).map_err(|e| AuthError::HashError(e.to_string()))?;
    Ok(Argon2::default().verify_password(password.as_bytes(), &parsed).is_ok())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn policy_accepts_short_mixed_password() {
        let policy = DefaultPasswordPolicy::default();
        assert!(policy.validate("pw12345", "alice", "alice@x.com").is_empty());
    }

    #[test]
    fn policy_rejects_weak_passwords() {
        let policy = DefaultPasswordPolicy { min_length: 8 };
        assert_eq!(policy.validate("abc", "bob", "bob@x.com").len(), 1);
        assert!(policy.validate("12345678", "bob", "bob@x.com").iter().any(|r| r.contains("numeric")));
        assert!(!policy.validate("Bobbobbob", "bobbobbob", "x@x.com").is_empty());
        assert!(!policy.validate("carolsmith", "c", "carolsmith@x.com").is_empty());
    }

    #[test]
    fn hash_roundtrip() {
        let hash = hash_password("s3cret-pass").unwrap();
        assert!(hash.starts_with("$argon2"));
        assert!(verify_password("s3cret-pass", &hash).unwrap());
        assert!(!verify_password("wrong", &hash).unwrap());
        assert!(verify_password("x", "not-a-phc-string").is_err());
    }
}
