//! Caller-side reconciliation of a cached resource list after mutations.
//!
//! The client itself stays stateless; whoever holds the last fetched list
//! applies these after a successful create/update/remove.

use crate::model::resource::{Feedback, Resource};

/// Puts a freshly created resource at the front of the cached list.
pub fn reconcile_created<R: Resource>(items: &mut Vec<R>, created: R) {
    items.insert(0, created);
}

/// Replaces the cached entry with the same id. Returns whether one matched.
pub fn reconcile_updated<R: Resource>(items: &mut [R], updated: R) -> bool {
    let Some(id) = updated.id().map(str::to_string) else {
        return false;
    };
    match items.iter_mut().find(|item| item.id() == Some(id.as_str())) {
        Some(slot) => {
            *slot = updated;
            true
        }
        None => false,
    }
}

/// Drops the cached entry with `id`. Returns whether one was removed.
pub fn reconcile_removed<R: Resource>(items: &mut Vec<R>, id: &str) -> bool {
    let before = items.len();
    items.retain(|item| item.id() != Some(id));
    items.len() != before
}

/// Case-insensitive match on feedback title or description.
/// A blank term returns every entry.
pub fn search_feedback<'a>(items: &'a [Feedback], term: &str) -> Vec<&'a Feedback> {
    let needle = term.trim().to_lowercase();
    items
        .iter()
        .filter(|item| {
            needle.is_empty()
                || item.title.to_lowercase().contains(&needle)
                || item.description.to_lowercase().contains(&needle)
        })
        .collect()
}
