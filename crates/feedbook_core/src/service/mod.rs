//! Core use-case services.
//!
//! # Responsibility
//! - Orchestrate repository calls into use-case level APIs.
//! - Provide pure query helpers for deriving the displayed note list.

pub mod note_query;
pub mod note_service;
