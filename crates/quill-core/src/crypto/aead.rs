//! AES-256-GCM sealing and opening of backup payloads.
//!
//! Every seal call generates its own random salt and nonce; nothing is
//! shared between calls. Tag verification failures are reported as a single
//! `AuthenticationFailure` regardless of cause, so a wrong password and a
//! tampered payload are indistinguishable to the caller.

use aes_gcm::aead::{Aead, KeyInit};
use aes_gcm::{Aes256Gcm, Nonce};
use rand::rngs::OsRng;
use rand::RngCore;

use crate::crypto::key::{derive_key, DerivedKey, SALT_LENGTH};
use crate::error::{QuillError, Result};

/// Length of the AES-GCM nonce in bytes.
pub const NONCE_LENGTH: usize = 12;

/// Output of a single seal operation.
///
/// The ciphertext includes the GCM authentication tag. The salt and nonce
/// are needed to reconstruct the key and decrypt later; neither is secret.
#[derive(Debug, Clone)]
pub struct SealedPayload {
    pub ciphertext: Vec<u8>,
    pub nonce: [u8; NONCE_LENGTH],
    pub salt: [u8; SALT_LENGTH],
}

/// Encrypt `plaintext` under a key derived from `password`.
///
/// # Security
///
/// The salt and nonce are drawn from the OS random number generator on
/// every call. A repeated (key, nonce) pair would break GCM's guarantees,
/// so freshness is per call, never per session.
pub fn encrypt(plaintext: &[u8], password: &str) -> Result<SealedPayload> {
    let mut salt = [0u8; SALT_LENGTH];
    OsRng.fill_bytes(&mut salt);

    let mut nonce = [0u8; NONCE_LENGTH];
    OsRng.fill_bytes(&mut nonce);

    let key = derive_key(password, &salt)?;
    let ciphertext = cipher_for(&key)?
        .encrypt(Nonce::from_slice(&nonce), plaintext)
        .map_err(|_| QuillError::Crypto("AES-GCM encryption failed".to_string()))?;

    Ok(SealedPayload {
        ciphertext,
        nonce,
        salt,
    })
}

/// Decrypt `ciphertext` with the key derived from `(password, salt)`.
///
/// # Errors
///
/// Returns `QuillError::AuthenticationFailure` whenever the GCM tag does
/// not verify; wrong password and corrupted ciphertext are treated
/// identically. There is no partial output on failure.
pub fn decrypt(ciphertext: &[u8], nonce: &[u8], salt: &[u8], password: &str) -> Result<Vec<u8>> {
    // A malformed nonce can never authenticate; report it the same way.
    if nonce.len() != NONCE_LENGTH {
        return Err(QuillError::AuthenticationFailure);
    }

    let key = derive_key(password, salt)?;
    cipher_for(&key)?
        .decrypt(Nonce::from_slice(nonce), ciphertext)
        .map_err(|_| QuillError::AuthenticationFailure)
}

fn cipher_for(key: &DerivedKey) -> Result<Aes256Gcm> {
    Aes256Gcm::new_from_slice(key.as_bytes())
        .map_err(|e| QuillError::Crypto(format!("Failed to initialize cipher: {}", e)))
}
