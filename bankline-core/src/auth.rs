//! PIN hashing - the opaque secret-handling capability
//!
//! PINs are stored as Argon2id PHC strings and verified against them; no
//! cleartext PIN is ever persisted or compared. All hashing lives here -
//! the persistence layer only sees the opaque string.

use anyhow::{anyhow, Result};
use argon2::password_hash::rand_core::OsRng;
use argon2::password_hash::{PasswordHash, PasswordHasher, PasswordVerifier, SaltString};
use argon2::Argon2;

/// Hash a plaintext PIN into a self-describing PHC string
pub fn hash_pin(pin: &str) -> Result<String> {
    let salt = SaltString::generate(&mut OsRng);
    let hash = Argon2::default()
        .hash_password(pin.as_bytes(), &salt)
        .map_err(|e| anyhow!("Failed to hash PIN: {:?}", e))?;
    Ok(hash.to_string())
}

/// Verify a plaintext PIN against a stored hash
///
/// An unparseable stored hash verifies as false rather than erroring, so a
/// corrupted row reads as a failed login instead of a crash.
pub fn verify_pin(pin: &str, pin_hash: &str) -> bool {
    match PasswordHash::new(pin_hash) {
        Ok(parsed) => Argon2::default().verify_password(pin.as_bytes(), &parsed).is_ok(),
        Err(_) => false,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_hash_and_verify_roundtrip() {
        let hash = hash_pin("1234").unwrap();
        assert_ne!(hash, "1234");
        assert!(verify_pin("1234", &hash));
        assert!(!verify_pin("4321", &hash));
    }

    #[test]
    fn test_hashes_are_salted() {
        let a = hash_pin("1234").unwrap();
        let b = hash_pin("1234").unwrap();
        assert_ne!(a, b);
    }

    #[test]
    fn test_corrupt_hash_fails_closed() {
        assert!(!verify_pin("1234", "not-a-phc-string"));
    }
}
