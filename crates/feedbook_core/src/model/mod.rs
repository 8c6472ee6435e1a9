//! Domain model for local notes and remote resources.
//!
//! # Invariants
//! - Notes are identified by client-generated ids that are never reused.
//! - Remote resources use the English field names in memory; Portuguese
//!   names only exist at the HTTP boundary.

pub mod note;
pub mod resource;
