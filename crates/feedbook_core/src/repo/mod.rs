//! Repository layer abstractions and persistence implementations.
//!
//! # Invariants
//! - Repository writes validate every note before persistence.
//! - Reads reject invalid persisted state instead of masking it; the service
//!   layer decides whether to fall back.

pub mod note_repo;
