//! Cryptographic operations for Quill backups.
//!
//! This module provides key derivation and authenticated encryption using
//! well-audited libraries:
//! - **PBKDF2-HMAC-SHA-256**: password-based key derivation with a fixed
//!   high iteration count
//! - **AES-256-GCM**: authenticated encryption with tamper detection
//!
//! ## Security Model
//!
//! - Every encryption call generates its own random salt and nonce; key
//!   material is never shared between calls
//! - Derived keys are zeroized from memory on drop and are never
//!   serialized or exposed outside this crate
//! - Tag verification failures never yield partial plaintext
//!
//! ## Threat Model
//!
//! We defend against:
//! - Theft of an encrypted backup file
//! - Offline brute-force attacks on the password
//! - Tampering with backup contents
//!
//! We do NOT defend against:
//! - Compromised OS / keylogger
//! - Access to the process memory while a backup operation runs

pub mod aead;
pub mod key;
pub mod passphrase;

pub use aead::{decrypt, encrypt, SealedPayload, NONCE_LENGTH};
pub use key::{derive_key, DerivedKey, PBKDF2_ITERATIONS, SALT_LENGTH};
pub use passphrase::validate_password;
