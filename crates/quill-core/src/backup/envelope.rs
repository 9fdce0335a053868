//! Backup envelope types and shape detection.
//!
//! A backup file is one of two JSON shapes: a plain envelope carrying the
//! note records directly, or an encrypted envelope carrying an AES-GCM
//! payload. Classification is by shape rather than a type tag: the
//! `encrypted` flag plus field presence is the discriminant, which lets the
//! format grow without breaking old exports.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::error::{QuillError, Result};

/// Current backup format version.
///
/// Any other value is rejected as unrecognized rather than migrated.
pub const BACKUP_VERSION: u32 = 1;

/// A plain (unencrypted) backup envelope.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PlainBackup {
    pub version: u32,

    /// Export timestamp. Always written; tolerated as absent on import
    /// since it is envelope metadata, not note data.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub exported_at: Option<DateTime<Utc>>,

    /// Note records, kept as raw JSON values. The codec never drops,
    /// reorders, or rewrites fields of a record.
    pub notes: Vec<Value>,
}

/// An encrypted backup envelope.
///
/// `payload`, `iv`, and `salt` are standard base64. The `iv` field holds
/// the AES-GCM nonce; the name is part of the wire format.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EncryptedBackup {
    pub version: u32,
    pub encrypted: bool,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub exported_at: Option<DateTime<Utc>>,

    /// Base64 ciphertext, including the GCM authentication tag.
    pub payload: String,
    /// Base64 nonce (12 bytes).
    pub iv: String,
    /// Base64 key-derivation salt (16 bytes).
    pub salt: String,
}

/// A parsed backup file, classified by shape.
#[derive(Debug, Clone)]
pub enum Backup {
    Plain(PlainBackup),
    Encrypted(EncryptedBackup),
}

/// Serialize note records into a plain backup envelope.
///
/// The output is pretty-printed JSON with 2-space indentation, stable
/// enough to diff between exports.
pub fn serialize_plain(notes: &[Value]) -> Result<String> {
    let backup = PlainBackup {
        version: BACKUP_VERSION,
        exported_at: Some(Utc::now()),
        notes: notes.to_vec(),
    };

    serde_json::to_string_pretty(&backup)
        .map_err(|e| QuillError::Other(format!("Failed to serialize backup: {}", e)))
}

/// Parse backup text and classify it by shape.
///
/// JSON syntax errors and unrecognized shapes, including any `version`
/// other than 1, fail with `QuillError::InvalidFormat`. The input is never
/// mutated and malformed input never panics.
pub fn detect_and_parse(text: &str) -> Result<Backup> {
    let raw: Value = serde_json::from_str(text).map_err(|_| QuillError::InvalidFormat)?;

    if is_plain_shape(&raw) {
        let plain = serde_json::from_value(raw).map_err(|_| QuillError::InvalidFormat)?;
        return Ok(Backup::Plain(plain));
    }

    if is_encrypted_shape(&raw) {
        let encrypted = serde_json::from_value(raw).map_err(|_| QuillError::InvalidFormat)?;
        return Ok(Backup::Encrypted(encrypted));
    }

    Err(QuillError::InvalidFormat)
}

fn is_plain_shape(raw: &Value) -> bool {
    raw.get("version").and_then(Value::as_u64) == Some(u64::from(BACKUP_VERSION))
        && raw.get("notes").is_some_and(Value::is_array)
}

fn is_encrypted_shape(raw: &Value) -> bool {
    raw.get("version").and_then(Value::as_u64) == Some(u64::from(BACKUP_VERSION))
        && raw.get("encrypted").and_then(Value::as_bool) == Some(true)
        && raw.get("payload").is_some_and(Value::is_string)
        && raw.get("iv").is_some_and(Value::is_string)
        && raw.get("salt").is_some_and(Value::is_string)
}
