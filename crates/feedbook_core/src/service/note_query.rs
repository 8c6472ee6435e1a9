//! Pure note list derivations: id generation, filtering, sorting, categories.
//!
//! # Invariants
//! - No function here mutates its input; each returns a new collection.
//! - Blank search terms and the `"all"` category are identities.

use crate::model::note::Note;
use std::collections::BTreeSet;
use std::time::{SystemTime, UNIX_EPOCH};
use uuid::Uuid;

/// Category sentinel that disables category filtering.
pub const ALL_CATEGORIES: &str = "all";

const BASE36_DIGITS: &[u8; 36] = b"0123456789abcdefghijklmnopqrstuvwxyz";
const ID_RANDOM_SUFFIX_LEN: usize = 11;
/// Low 62 bits of a v4 UUID; everything above includes fixed variant/version bits.
const UUID_RANDOM_LOW_BITS: u128 = (1 << 62) - 1;

/// Search/category selection used to derive the displayed list.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NoteView {
    pub search: String,
    pub category: String,
}

impl Default for NoteView {
    fn default() -> Self {
        Self {
            search: String::new(),
            category: ALL_CATEGORIES.to_string(),
        }
    }
}

/// Returns the current time in unix epoch milliseconds.
pub fn now_epoch_ms() -> i64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map_or(0, |elapsed| elapsed.as_millis() as i64)
}

/// Generates a note id: base36 millisecond timestamp + random base36 suffix.
///
/// Collisions are statistically negligible and not checked.
pub fn generate_id() -> String {
    let mut id = to_base36(now_epoch_ms().max(0) as u128);
    id.push_str(&random_suffix());
    id
}

/// Fixed-width base36 digits drawn from the random bits of a v4 UUID.
fn random_suffix() -> String {
    let mut value = Uuid::new_v4().as_u128() & UUID_RANDOM_LOW_BITS;
    (0..ID_RANDOM_SUFFIX_LEN)
        .map(|_| {
            let digit = BASE36_DIGITS[(value % 36) as usize] as char;
            value /= 36;
            digit
        })
        .collect()
}

fn to_base36(mut value: u128) -> String {
    if value == 0 {
        return "0".to_string();
    }
    let mut digits = Vec::new();
    while value > 0 {
        digits.push(BASE36_DIGITS[(value % 36) as usize] as char);
        value /= 36;
    }
    digits.iter().rev().collect()
}

/// Case-insensitive substring match on title, content or category.
pub fn filter_by_text(notes: &[Note], term: &str) -> Vec<Note> {
    let needle = term.trim().to_lowercase();
    if needle.is_empty() {
        return notes.to_vec();
    }

    notes
        .iter()
        .filter(|note| {
            note.title.to_lowercase().contains(&needle)
                || note.content.to_lowercase().contains(&needle)
                || note.category.to_lowercase().contains(&needle)
        })
        .cloned()
        .collect()
}

/// Exact category match; [`ALL_CATEGORIES`] returns the input unchanged.
pub fn filter_by_category(notes: &[Note], category: &str) -> Vec<Note> {
    if category == ALL_CATEGORIES {
        return notes.to_vec();
    }
    notes
        .iter()
        .filter(|note| note.category == category)
        .cloned()
        .collect()
}

/// Sorts by `updated_at` descending. Equal timestamps keep input order.
pub fn sort_by_recency(notes: &[Note]) -> Vec<Note> {
    let mut sorted = notes.to_vec();
    sorted.sort_by(|a, b| b.updated_at.cmp(&a.updated_at));
    sorted
}

/// Distinct non-empty categories.
pub fn list_categories(notes: &[Note]) -> BTreeSet<String> {
    notes
        .iter()
        .filter(|note| !note.is_uncategorized())
        .map(|note| note.category.clone())
        .collect()
}

/// Derives the displayed list: recency sort, then category, then text.
pub fn apply_view(notes: &[Note], view: &NoteView) -> Vec<Note> {
    let sorted = sort_by_recency(notes);
    let by_category = filter_by_category(&sorted, &view.category);
    filter_by_text(&by_category, &view.search)
}
