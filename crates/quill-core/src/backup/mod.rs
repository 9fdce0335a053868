//! Backup export and import.
//!
//! Two collaborating pieces: the envelope codec (JSON shapes, see
//! [`envelope`]) and the cryptographic engine (PBKDF2 + AES-256-GCM, see
//! [`crate::crypto`]). All operations are single-shot and stateless: each
//! export derives its own key from a fresh salt and discards it on return,
//! and an import either yields the full note sequence or an error, with no
//! partial result and no side effects.

pub mod envelope;

use base64::engine::general_purpose::STANDARD;
use base64::Engine;
use chrono::Utc;
use serde_json::Value;

use crate::crypto;
use crate::error::{QuillError, Result};

pub use envelope::{
    detect_and_parse, serialize_plain, Backup, EncryptedBackup, PlainBackup, BACKUP_VERSION,
};

/// Export note records as a plain backup file.
pub fn export_plain_backup(notes: &[Value]) -> Result<String> {
    envelope::serialize_plain(notes)
}

/// Export note records as an encrypted backup file.
///
/// The plain envelope is serialized, UTF-8 encoded, and sealed with
/// AES-256-GCM under a key derived from `password`. A fresh random salt and
/// nonce are generated for every call: two exports of the same notes with
/// the same password never share key material.
pub fn export_encrypted_backup(notes: &[Value], password: &str) -> Result<String> {
    let plain = envelope::serialize_plain(notes)?;
    let sealed = crypto::encrypt(plain.as_bytes(), password)?;

    let backup = EncryptedBackup {
        version: BACKUP_VERSION,
        encrypted: true,
        exported_at: Some(Utc::now()),
        payload: STANDARD.encode(&sealed.ciphertext),
        iv: STANDARD.encode(sealed.nonce),
        salt: STANDARD.encode(sealed.salt),
    };

    serde_json::to_string_pretty(&backup)
        .map_err(|e| QuillError::Other(format!("Failed to serialize backup: {}", e)))
}

/// Import a backup file and recover its note records.
///
/// Plain backups need no password. Encrypted backups without a password
/// fail with [`QuillError::PasswordRequired`] so the caller can prompt and
/// retry with the same text.
///
/// # Errors
///
/// - [`QuillError::InvalidFormat`]: the text is not valid JSON, matches no
///   known envelope shape, or carries base64 fields that do not decode to
///   the declared salt/nonce sizes
/// - [`QuillError::PasswordRequired`]: encrypted backup, no password given
/// - [`QuillError::AuthenticationFailure`]: wrong password or tampered
///   ciphertext, indistinguishably
/// - [`QuillError::InvalidBackupFormat`]: decryption succeeded but the
///   plaintext is not a plain backup envelope
pub fn import_backup(text: &str, password: Option<&str>) -> Result<Vec<Value>> {
    match envelope::detect_and_parse(text)? {
        Backup::Plain(plain) => Ok(plain.notes),
        Backup::Encrypted(encrypted) => {
            let password = password.ok_or(QuillError::PasswordRequired)?;

            let ciphertext = STANDARD
                .decode(&encrypted.payload)
                .map_err(|_| QuillError::InvalidFormat)?;
            let nonce = STANDARD
                .decode(&encrypted.iv)
                .map_err(|_| QuillError::InvalidFormat)?;
            let salt = STANDARD
                .decode(&encrypted.salt)
                .map_err(|_| QuillError::InvalidFormat)?;

            // The envelope declares a 12-byte nonce and 16-byte salt; other
            // lengths mean the envelope itself is malformed.
            if nonce.len() != crypto::NONCE_LENGTH || salt.len() != crypto::SALT_LENGTH {
                return Err(QuillError::InvalidFormat);
            }

            let plaintext = crypto::decrypt(&ciphertext, &nonce, &salt, password)?;
            let decoded =
                String::from_utf8(plaintext).map_err(|_| QuillError::InvalidBackupFormat)?;

            match envelope::detect_and_parse(&decoded) {
                Ok(Backup::Plain(inner)) => Ok(inner.notes),
                _ => Err(QuillError::InvalidBackupFormat),
            }
        }
    }
}
