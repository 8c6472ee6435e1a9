//! Core data layer for feedbook.
//! This crate is the single source of truth for note and resource invariants.

pub mod config;
pub mod db;
pub mod logging;
pub mod model;
pub mod remote;
pub mod repo;
pub mod service;

pub use config::{ConfigError, CoreConfig};
pub use logging::{default_log_level, init_logging, logging_status};
pub use model::note::{Note, NoteDraft, NoteId, NoteValidationError};
pub use model::resource::{
    parse_rating, Feedback, Resource, DEFAULT_RATING, ResourceValidationError, Tool, ToolPatch, Updatable,
};
pub use remote::cache::{reconcile_created, reconcile_removed, reconcile_updated, search_feedback};
pub use remote::client::ResourceClient;
pub use remote::error::ApiError;
pub use remote::transport::{
    ApiRequest, ApiResponse, Caller, HttpMethod, ReqwestTransport, Transport,
};
pub use repo::note_repo::{NoteRepository, RepoError, RepoResult, SqliteNoteRepository};
pub use service::note_query::{
    apply_view, filter_by_category, filter_by_text, generate_id, list_categories,
    sort_by_recency, NoteView, ALL_CATEGORIES,
};
pub use service::note_service::{NoteService, NoteServiceError};

/// Feedback client over the reqwest transport.
pub type FeedbackClient = ResourceClient<Feedback, ReqwestTransport>;
/// Tool client over the reqwest transport.
pub type ToolClient = ResourceClient<Tool, ReqwestTransport>;

/// Returns the core crate version.
pub fn core_version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}

#[cfg(test)]
mod tests {
    use super::core_version;

    #[test]
    fn version_is_not_empty() {
        assert!(!core_version().is_empty());
    }
}
