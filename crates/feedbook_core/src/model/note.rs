//! Note domain model.
//!
//! # Invariants
//! - `id` is stable and never reused for another note.
//! - `title` and `content` are non-empty after trimming.
//! - `created_at` never changes; `updated_at >= created_at`.

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Client-generated identifier, opaque to every caller.
pub type NoteId = String;

/// Category label meaning "no category". Excluded from category listings.
pub const UNCATEGORIZED: &str = "";

/// Locally persisted note.
///
/// Serialized with camelCase keys so the stored collection keeps the
/// `createdAt`/`updatedAt` shape used by the web client.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Note {
    pub id: NoteId,
    pub title: String,
    pub content: String,
    #[serde(default)]
    pub category: String,
    /// Unix epoch milliseconds.
    pub created_at: i64,
    /// Unix epoch milliseconds. Refreshed on every save.
    pub updated_at: i64,
}

/// Caller input for creating or editing a note.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct NoteDraft {
    pub title: String,
    pub content: String,
    pub category: String,
}

impl NoteDraft {
    pub fn new(
        title: impl Into<String>,
        content: impl Into<String>,
        category: impl Into<String>,
    ) -> Self {
        Self {
            title: title.into(),
            content: content.into(),
            category: category.into(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum NoteValidationError {
    #[error("note title must not be empty")]
    EmptyTitle,
    #[error("note content must not be empty")]
    EmptyContent,
    #[error("updated_at ({updated_at}) must be >= created_at ({created_at})")]
    UpdatedBeforeCreated { created_at: i64, updated_at: i64 },
}

impl Note {
    /// Builds a note from a draft, trimming every text field.
    pub fn from_draft(id: NoteId, draft: &NoteDraft, now_ms: i64) -> Self {
        Self {
            id,
            title: draft.title.trim().to_string(),
            content: draft.content.trim().to_string(),
            category: draft.category.trim().to_string(),
            created_at: now_ms,
            updated_at: now_ms,
        }
    }

    /// Replaces the editable fields and refreshes `updated_at`.
    ///
    /// `updated_at` is clamped to `created_at` so a clock that moved
    /// backwards cannot break the ordering invariant.
    pub fn apply_draft(&mut self, draft: &NoteDraft, now_ms: i64) {
        self.title = draft.title.trim().to_string();
        self.content = draft.content.trim().to_string();
        self.category = draft.category.trim().to_string();
        self.updated_at = now_ms.max(self.created_at);
    }

    pub fn is_uncategorized(&self) -> bool {
        self.category == UNCATEGORIZED
    }

    /// Validates note invariants before persistence.
    pub fn validate(&self) -> Result<(), NoteValidationError> {
        if self.title.trim().is_empty() {
            return Err(NoteValidationError::EmptyTitle);
        }
        if self.content.trim().is_empty() {
            return Err(NoteValidationError::EmptyContent);
        }
        if self.updated_at < self.created_at {
            return Err(NoteValidationError::UpdatedBeforeCreated {
                created_at: self.created_at,
                updated_at: self.updated_at,
            });
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::{Note, NoteDraft, NoteValidationError};

    #[test]
    fn from_draft_trims_fields_and_sets_both_timestamps() {
        let draft = NoteDraft::new("  Groceries ", " milk\n", " home ");
        let note = Note::from_draft("abc".to_string(), &draft, 1_000);

        assert_eq!(note.title, "Groceries");
        assert_eq!(note.content, "milk");
        assert_eq!(note.category, "home");
        assert_eq!(note.created_at, 1_000);
        assert_eq!(note.updated_at, 1_000);
    }

    #[test]
    fn apply_draft_never_moves_updated_at_before_created_at() {
        let mut note = Note::from_draft("abc".to_string(), &NoteDraft::new("t", "c", ""), 5_000);
        note.apply_draft(&NoteDraft::new("t2", "c2", ""), 4_000);

        assert_eq!(note.created_at, 5_000);
        assert_eq!(note.updated_at, 5_000);
        assert!(note.validate().is_ok());
    }

    #[test]
    fn validate_rejects_blank_title_and_content() {
        let blank_title = Note::from_draft("a".into(), &NoteDraft::new("   ", "body", ""), 1);
        assert_eq!(blank_title.validate(), Err(NoteValidationError::EmptyTitle));

        let blank_content = Note::from_draft("b".into(), &NoteDraft::new("title", "\t", ""), 1);
        assert_eq!(
            blank_content.validate(),
            Err(NoteValidationError::EmptyContent)
        );
    }

    #[test]
    fn serializes_with_camel_case_timestamps() {
        let note = Note::from_draft("id-1".into(), &NoteDraft::new("t", "c", "work"), 42);
        let json = serde_json::to_value(&note).unwrap();

        assert_eq!(json["createdAt"], 42);
        assert_eq!(json["updatedAt"], 42);
        assert_eq!(json["category"], "work");
    }
}
