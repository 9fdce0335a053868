//! Note data model and import normalization.
//!
//! The backup codec treats note records as opaque JSON values (see
//! [`crate::backup`]) so a round trip can never drop or rewrite fields.
//! This module is the typed view of those records, used when the
//! application needs to read or repair individual notes, e.g. after
//! importing a backup produced by an older or foreign build.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use uuid::Uuid;

/// Card color of a note.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum NoteColor {
    #[default]
    Slate,
    Coral,
    Mint,
    Sky,
    Sand,
    Rose,
    Lavender,
}

/// A single checklist row inside a note.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChecklistItem {
    pub id: Uuid,
    pub text: String,
    pub done: bool,
}

/// A note record.
///
/// Wire field names are camelCase, matching the backup file format.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Note {
    pub id: Uuid,
    pub title: String,
    pub content: String,
    pub color: NoteColor,
    pub tags: Vec<String>,
    pub checklist: Vec<ChecklistItem>,
    pub is_pinned: bool,
    pub order: i64,
    pub reminder_at: Option<DateTime<Utc>>,
    pub reminded_at: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Note {
    /// A fresh empty note with a random id and now-timestamps.
    pub fn draft() -> Self {
        let now = Utc::now();
        Self {
            id: Uuid::new_v4(),
            title: String::new(),
            content: String::new(),
            color: NoteColor::default(),
            tags: Vec::new(),
            checklist: Vec::new(),
            is_pinned: false,
            order: 0,
            reminder_at: None,
            reminded_at: None,
            created_at: now,
            updated_at: now,
        }
    }
}

/// Normalize a raw imported record into a valid [`Note`].
///
/// Imported backups may come from older builds or hand-edited files, so
/// every field is repaired rather than rejected: a missing or malformed id
/// gets a fresh one, an unknown color falls back to the default, checklist
/// rows without text are discarded, and missing timestamps become "now".
/// `fallback_order` is used when the record carries no usable `order`,
/// so repaired notes keep their position in the imported sequence.
///
/// This never fails; it is the lenient counterpart to the strict,
/// untouched records the codec returns.
pub fn coerce_imported_note(raw: &Value, fallback_order: i64) -> Note {
    let now = Utc::now();

    Note {
        id: field_uuid(raw.get("id")),
        title: field_string(raw.get("title")),
        content: field_string(raw.get("content")),
        color: raw
            .get("color")
            .and_then(|v| serde_json::from_value(v.clone()).ok())
            .unwrap_or_default(),
        tags: field_tags(raw.get("tags")),
        checklist: field_checklist(raw.get("checklist")),
        is_pinned: raw.get("isPinned").and_then(Value::as_bool).unwrap_or(false),
        order: raw
            .get("order")
            .and_then(Value::as_i64)
            .unwrap_or(fallback_order),
        reminder_at: field_datetime(raw.get("reminderAt")),
        reminded_at: field_datetime(raw.get("remindedAt")),
        created_at: field_datetime(raw.get("createdAt")).unwrap_or(now),
        updated_at: field_datetime(raw.get("updatedAt")).unwrap_or(now),
    }
}

fn field_uuid(value: Option<&Value>) -> Uuid {
    value
        .and_then(Value::as_str)
        .and_then(|s| Uuid::parse_str(s).ok())
        .unwrap_or_else(Uuid::new_v4)
}

fn field_string(value: Option<&Value>) -> String {
    value
        .and_then(Value::as_str)
        .map(str::to_string)
        .unwrap_or_default()
}

fn field_datetime(value: Option<&Value>) -> Option<DateTime<Utc>> {
    value
        .and_then(Value::as_str)
        .and_then(|s| DateTime::parse_from_rfc3339(s).ok())
        .map(|t| t.with_timezone(&Utc))
}

fn field_tags(value: Option<&Value>) -> Vec<String> {
    let Some(items) = value.and_then(Value::as_array) else {
        return Vec::new();
    };

    items
        .iter()
        .map(|item| match item {
            Value::String(s) => s.clone(),
            other => other.to_string(),
        })
        .collect()
}

fn field_checklist(value: Option<&Value>) -> Vec<ChecklistItem> {
    let Some(items) = value.and_then(Value::as_array) else {
        return Vec::new();
    };

    items
        .iter()
        .filter_map(|item| {
            let text = item.get("text")?.as_str()?.trim().to_string();
            if text.is_empty() {
                return None;
            }
            Some(ChecklistItem {
                id: field_uuid(item.get("id")),
                text,
                done: item.get("done").and_then(Value::as_bool).unwrap_or(false),
            })
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_draft_defaults() {
        let note = Note::draft();
        assert!(note.title.is_empty());
        assert!(note.content.is_empty());
        assert_eq!(note.color, NoteColor::Slate);
        assert!(!note.is_pinned);
        assert_eq!(note.order, 0);
        assert!(note.reminder_at.is_none());
        assert_eq!(note.created_at, note.updated_at);
    }

    #[test]
    fn test_note_serde_uses_camel_case() {
        let note = Note::draft();
        let value = serde_json::to_value(&note).unwrap();

        assert!(value.get("isPinned").is_some());
        assert!(value.get("reminderAt").is_some());
        assert!(value.get("createdAt").is_some());
        assert!(value.get("is_pinned").is_none());
    }

    #[test]
    fn test_note_round_trips_through_value() {
        let mut note = Note::draft();
        note.title = "groceries".to_string();
        note.tags = vec!["home".to_string()];
        note.checklist = vec![ChecklistItem {
            id: Uuid::new_v4(),
            text: "milk".to_string(),
            done: true,
        }];

        let value = serde_json::to_value(&note).unwrap();
        let back: Note = serde_json::from_value(value).unwrap();
        assert_eq!(back, note);
    }

    #[test]
    fn test_coerce_empty_record() {
        let note = coerce_imported_note(&json!({}), 7);

        assert!(note.title.is_empty());
        assert_eq!(note.color, NoteColor::Slate);
        assert_eq!(note.order, 7);
        assert!(note.tags.is_empty());
        assert!(note.checklist.is_empty());
        assert!(note.reminder_at.is_none());
    }

    #[test]
    fn test_coerce_preserves_valid_fields() {
        let id = Uuid::new_v4();
        let raw = json!({
            "id": id.to_string(),
            "title": "shopping",
            "content": "remember the list",
            "color": "coral",
            "tags": ["errands", 5],
            "isPinned": true,
            "order": 3,
            "reminderAt": "2024-06-01T08:00:00Z",
            "createdAt": "2024-05-01T10:00:00Z",
            "updatedAt": "2024-05-02T11:30:00Z"
        });

        let note = coerce_imported_note(&raw, 0);
        assert_eq!(note.id, id);
        assert_eq!(note.title, "shopping");
        assert_eq!(note.color, NoteColor::Coral);
        assert_eq!(note.tags, vec!["errands".to_string(), "5".to_string()]);
        assert!(note.is_pinned);
        assert_eq!(note.order, 3);
        assert!(note.reminder_at.is_some());
        assert_eq!(note.created_at.to_rfc3339(), "2024-05-01T10:00:00+00:00");
    }

    #[test]
    fn test_coerce_replaces_malformed_id() {
        let note = coerce_imported_note(&json!({"id": "not-a-uuid"}), 0);
        // A fresh id, not a crash
        assert_ne!(note.id, Uuid::nil());
    }

    #[test]
    fn test_coerce_unknown_color_falls_back() {
        let note = coerce_imported_note(&json!({"color": "chartreuse"}), 0);
        assert_eq!(note.color, NoteColor::Slate);
    }

    #[test]
    fn test_coerce_filters_checklist_rows() {
        let raw = json!({
            "checklist": [
                {"id": "x", "text": "  keep me  ", "done": true},
                {"text": ""},
                {"text": "   "},
                {"done": true},
                "not an object"
            ]
        });

        let note = coerce_imported_note(&raw, 0);
        assert_eq!(note.checklist.len(), 1);
        assert_eq!(note.checklist[0].text, "keep me");
        assert!(note.checklist[0].done);
    }

    #[test]
    fn test_coerce_invalid_timestamp_becomes_now() {
        let before = Utc::now();
        let note = coerce_imported_note(&json!({"createdAt": "yesterday-ish"}), 0);
        assert!(note.created_at >= before);
    }
}
