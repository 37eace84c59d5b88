//! Argon2 password hashing.

use anyhow::anyhow;
use argon2::password_hash::{rand_core::OsRng, PasswordHash, PasswordHasher, PasswordVerifier, SaltString};
use argon2::Argon2;

pub fn hash_password(password: &str) -> anyhow::Result<String> {
    let salt = SaltString::generate(&mut OsRng);
    let hash = Argon2::default()
        .hash_password(password.as_bytes(), &salt)
        .map_err(|e| anyhow!("Failed to hash password: {e}"))?;
    Ok(hash.to_string())
}

/// Returns false for both a wrong password and an unparseable stored hash.
pub fn verify_password(password: &str, stored_hash: &str) -> bool {
    let Ok(parsed) = PasswordHash::new(stored_hash) else {
        return false;
    };
    Argon2::default()
        .verify_password(password.as_bytes(), &parsed)
        .is_ok()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_hash_verify_roundtrip() {
        let hash = hash_password("hunter22").unwrap();
        assert!(verify_password("hunter22", &hash));
    }

    #[test]
    fn test_wrong_password_rejected() {
        let hash = hash_password("hunter22").unwrap();
        assert!(!verify_password("hunter23", &hash));
    }

    #[test]
    fn test_malformed_hash_rejected() {
        assert!(!verify_password("hunter22", "not-a-phc-string"));
    }

    #[test]
    fn test_hashes_are_salted() {
        assert_ne!(
            hash_password("hunter22").unwrap(),
            hash_password("hunter22").unwrap()
        );
    }
}
