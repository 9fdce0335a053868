//! Key derivation using PBKDF2-HMAC-SHA-256.
//!
//! This module derives encryption keys from passwords using PBKDF2 with a
//! fixed high iteration count, making offline brute-force attacks
//! computationally expensive.

use pbkdf2::pbkdf2_hmac;
use sha2::Sha256;
use zeroize::ZeroizeOnDrop;

use crate::error::{QuillError, Result};

/// PBKDF2 iteration count.
///
/// Fixed for every backup file: existing backups can only be decrypted with
/// this exact count, so changing it requires a new envelope version.
pub const PBKDF2_ITERATIONS: u32 = 240_000;

/// Length of the random salt in bytes.
pub const SALT_LENGTH: usize = 16;

/// Length of derived key in bytes (32 bytes = 256 bits for AES-256-GCM).
const KEY_LENGTH: usize = 32;

/// A cryptographic key derived from a password.
///
/// This type ensures that key material is securely zeroized from memory
/// when dropped. The raw bytes are only reachable inside this crate, so a
/// derived key cannot be exported or reused for anything but the AEAD
/// seal/open calls.
#[derive(Clone, ZeroizeOnDrop)]
pub struct DerivedKey {
    /// The raw key bytes (zeroized on drop)
    key: [u8; KEY_LENGTH],
}

impl DerivedKey {
    /// Create a new DerivedKey from raw bytes.
    pub(crate) fn from_bytes(bytes: [u8; KEY_LENGTH]) -> Self {
        Self { key: bytes }
    }

    /// Get a reference to the raw key bytes.
    ///
    /// Crate-private: used only for immediate AEAD operations.
    pub(crate) fn as_bytes(&self) -> &[u8; KEY_LENGTH] {
        &self.key
    }
}

impl std::fmt::Debug for DerivedKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DerivedKey")
            .field("key", &"[REDACTED]")
            .finish()
    }
}

/// Derive an encryption key from a password using PBKDF2-HMAC-SHA-256.
///
/// # Arguments
///
/// * `password` - The password to derive from
/// * `salt` - Random salt (must be unique per backup)
///
/// # Returns
///
/// Returns a `DerivedKey` suitable for AEAD operations.
///
/// # Security
///
/// - Same password + salt always produces the same key (deterministic);
///   this is the basis for decrypt-side key reconstruction
/// - Different salt produces a different key (the salt is stored in the
///   backup envelope)
/// - 240,000 iterations make each guess expensive for an attacker
pub fn derive_key(password: &str, salt: &[u8]) -> Result<DerivedKey> {
    if password.is_empty() {
        return Err(QuillError::InvalidInput(
            "Password cannot be empty".to_string(),
        ));
    }

    if salt.len() < SALT_LENGTH {
        return Err(QuillError::InvalidInput(
            "Salt must be at least 16 bytes".to_string(),
        ));
    }

    let mut key_bytes = [0u8; KEY_LENGTH];
    pbkdf2_hmac::<Sha256>(password.as_bytes(), salt, PBKDF2_ITERATIONS, &mut key_bytes);

    Ok(DerivedKey::from_bytes(key_bytes))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_key_derivation_deterministic() {
        let password = "test-password";
        let salt = b"unique-salt-1234567890123456";

        let key1 = derive_key(password, salt).unwrap();
        let key2 = derive_key(password, salt).unwrap();

        // Same password + salt should produce identical keys
        assert_eq!(key1.as_bytes(), key2.as_bytes());
    }

    #[test]
    fn test_different_salt_different_key() {
        let password = "test-password";
        let salt1 = b"salt1-1234567890123456";
        let salt2 = b"salt2-1234567890123456";

        let key1 = derive_key(password, salt1).unwrap();
        let key2 = derive_key(password, salt2).unwrap();

        assert_ne!(key1.as_bytes(), key2.as_bytes());
    }

    #[test]
    fn test_different_password_different_key() {
        let salt = b"fixed-salt-123456789012345";
        let pass1 = "password-one";
        let pass2 = "password-two";

        let key1 = derive_key(pass1, salt).unwrap();
        let key2 = derive_key(pass2, salt).unwrap();

        assert_ne!(key1.as_bytes(), key2.as_bytes());
    }

    #[test]
    fn test_empty_password_rejected() {
        let salt = b"salt-1234567890123456";
        let result = derive_key("", salt);
        assert!(result.is_err());
        assert!(result
            .unwrap_err()
            .to_string()
            .contains("Password cannot be empty"));
    }

    #[test]
    fn test_short_salt_rejected() {
        let password = "test-password";
        let short_salt = b"short"; // Less than 16 bytes

        let result = derive_key(password, short_salt);
        assert!(result.is_err());
        assert!(result
            .unwrap_err()
            .to_string()
            .contains("Salt must be at least 16 bytes"));
    }

    #[test]
    fn test_derived_key_debug_redacts() {
        let password = "test-password";
        let salt = b"salt-1234567890123456";
        let key = derive_key(password, salt).unwrap();

        let debug_output = format!("{:?}", key);
        assert!(debug_output.contains("REDACTED"));

        // The actual key bytes must not leak into the debug output
        let key_hex = hex::encode(&key.as_bytes()[..4]);
        assert!(!debug_output.contains(&key_hex));
    }
}
