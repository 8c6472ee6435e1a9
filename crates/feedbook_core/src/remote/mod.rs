//! Remote resource client for the feedback/tool REST backend.
//!
//! # Responsibility
//! - Translate between English in-memory field names and the backend's
//!   Portuguese field names.
//! - Perform CRUD against one collection endpoint with per-request caller
//!   identity.
//!
//! # Invariants
//! - The client owns no durable state; callers cache and reconcile lists.
//! - Validation failures never reach the transport.
//! - No retries, deduplication or coalescing.

pub mod cache;
pub mod client;
pub mod error;
pub mod mapping;
pub mod transport;
