//! Note use-case service.
//!
//! # Responsibility
//! - Provide create/update/delete/get/list APIs over the whole-collection
//!   repository contract.
//! - Reject invalid drafts before anything reaches storage.
//!
//! # Invariants
//! - New notes are prepended; edits replace in place.
//! - `id` and `created_at` never change on edit.
//! - Every mutation is a load, modify, `save_all` cycle.

use crate::model::note::{Note, NoteDraft, NoteId, NoteValidationError};
use crate::repo::note_repo::{NoteRepository, RepoError, RepoResult};
use crate::service::note_query::{
    apply_view, generate_id, list_categories, now_epoch_ms, NoteView,
};
use log::{info, warn};
use std::collections::BTreeSet;
use thiserror::Error;

/// Service error for note use-cases.
#[derive(Debug, Error)]
pub enum NoteServiceError {
    /// Draft failed validation; nothing was saved.
    #[error(transparent)]
    Validation(#[from] NoteValidationError),
    #[error("note not found: {0}")]
    NoteNotFound(NoteId),
    #[error(transparent)]
    Repo(RepoError),
}

impl From<RepoError> for NoteServiceError {
    fn from(value: RepoError) -> Self {
        match value {
            RepoError::Validation(err) => Self::Validation(err),
            other => Self::Repo(other),
        }
    }
}

/// Note service facade over repository implementations.
pub struct NoteService<R: NoteRepository> {
    repo: R,
    clock: fn() -> i64,
}

impl<R: NoteRepository> NoteService<R> {
    /// Creates a service using the provided repository and the system clock.
    pub fn new(repo: R) -> Self {
        Self {
            repo,
            clock: now_epoch_ms,
        }
    }

    /// Replaces the epoch-milliseconds clock.
    pub fn with_clock(mut self, clock: fn() -> i64) -> Self {
        self.clock = clock;
        self
    }

    /// Loads all notes, treating unreadable storage as an empty collection.
    pub fn load_notes(&self) -> Vec<Note> {
        match self.repo.load_all() {
            Ok(notes) => notes,
            Err(err) => {
                warn!("event=notes_load module=service status=fallback_empty error={err}");
                Vec::new()
            }
        }
    }

    /// Loads all notes, propagating storage failures.
    pub fn try_load_notes(&self) -> RepoResult<Vec<Note>> {
        self.repo.load_all()
    }

    /// Creates one note and returns it as stored.
    pub fn create_note(&self, draft: &NoteDraft) -> Result<Note, NoteServiceError> {
        let note = Note::from_draft(generate_id(), draft, (self.clock)());
        note.validate()?;

        let mut notes = self.repo.load_all()?;
        notes.insert(0, note.clone());
        self.repo.save_all(&notes)?;

        info!(
            "event=note_create module=service status=ok total={}",
            notes.len()
        );
        Ok(note)
    }

    /// Replaces the editable fields of an existing note.
    pub fn update_note(&self, id: &str, draft: &NoteDraft) -> Result<Note, NoteServiceError> {
        let mut notes = self.repo.load_all()?;
        let target = notes
            .iter_mut()
            .find(|note| note.id == id)
            .ok_or_else(|| NoteServiceError::NoteNotFound(id.to_string()))?;

        let mut edited = target.clone();
        edited.apply_draft(draft, (self.clock)());
        edited.validate()?;
        *target = edited.clone();

        self.repo.save_all(&notes)?;
        info!("event=note_update module=service status=ok");
        Ok(edited)
    }

    /// Deletes one note by id.
    pub fn delete_note(&self, id: &str) -> Result<(), NoteServiceError> {
        let mut notes = self.repo.load_all()?;
        let before = notes.len();
        notes.retain(|note| note.id != id);
        if notes.len() == before {
            return Err(NoteServiceError::NoteNotFound(id.to_string()));
        }

        self.repo.save_all(&notes)?;
        info!(
            "event=note_delete module=service status=ok total={}",
            notes.len()
        );
        Ok(())
    }

    /// Gets one note by id.
    pub fn get_note(&self, id: &str) -> RepoResult<Option<Note>> {
        Ok(self.repo.load_all()?.into_iter().find(|note| note.id == id))
    }

    /// Lists notes as displayed for the given search/category selection.
    pub fn list_notes(&self, view: &NoteView) -> Vec<Note> {
        apply_view(&self.load_notes(), view)
    }

    /// Lists distinct non-empty categories across all notes.
    pub fn categories(&self) -> BTreeSet<String> {
        list_categories(&self.load_notes())
    }
}
