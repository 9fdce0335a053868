//! Error types for Quill core operations.
//!
//! This module defines the error hierarchy for all core operations.
//! Errors are descriptive at the core level; the CLI layer maps these
//! to user-friendly prompts and messages.

use thiserror::Error;

/// Result type alias for Quill operations.
pub type Result<T> = std::result::Result<T, QuillError>;

/// Core error type for Quill operations.
///
/// The four import-facing variants (`InvalidFormat`, `PasswordRequired`,
/// `AuthenticationFailure`, `InvalidBackupFormat`) are unit variants so
/// callers can match on them and choose the right corrective action:
/// prompt for a password, allow a retry, or report a bad file.
#[derive(Debug, Error)]
pub enum QuillError {
    /// Input is not valid JSON, or matches no known backup shape
    #[error("not a recognized backup file")]
    InvalidFormat,

    /// Recognized an encrypted backup but no password was given
    #[error("backup is encrypted; a password is required")]
    PasswordRequired,

    /// Wrong password or tampered/corrupted ciphertext. The two causes are
    /// intentionally indistinguishable.
    #[error("incorrect password or corrupted backup")]
    AuthenticationFailure,

    /// Decryption succeeded but the plaintext is not a plain backup
    #[error("decrypted contents are not a valid backup")]
    InvalidBackupFormat,

    /// Invalid user input
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    /// Encryption-side primitive failure
    #[error("Encryption error: {0}")]
    Crypto(String),

    /// Generic error (fallback)
    #[error("{0}")]
    Other(String),
}
