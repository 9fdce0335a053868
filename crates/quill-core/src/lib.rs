//! # Quill Core
//!
//! Core library for Quill - encrypted backup and restore for a local-first
//! notes app.
//!
//! This crate provides the backup file format and its cryptography,
//! independent of the CLI interface. The surrounding application hands in a
//! sequence of note records and receives either a serialized backup
//! envelope (export) or the recovered records (import).
//!
//! ## Architecture
//!
//! - **backup**: envelope codec (plain and encrypted JSON shapes) and the
//!   export/import orchestration
//! - **crypto**: PBKDF2 key derivation and AES-256-GCM sealing
//! - **notes**: typed note model and lenient import normalization
//! - **error**: the error taxonomy callers match on

pub mod backup;
pub mod crypto;
pub mod error;
pub mod notes;

pub use backup::{
    detect_and_parse, export_encrypted_backup, export_plain_backup, import_backup, Backup,
};
pub use error::{QuillError, Result};

/// Core version information
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
