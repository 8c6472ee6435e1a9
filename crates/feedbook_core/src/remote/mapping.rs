//! Bidirectional field-name mapping between in-memory and backend shapes.
//!
//! # Invariants
//! - The table below is the only place backend field names are spelled out
//!   for mapped fields.
//! - `to_remote(to_local(r))` preserves every remote field of `r`.
//! - Non-object values and unmapped keys pass through untouched.

use serde_json::{Map, Value};

/// `(local, remote)` field name pairs.
pub const FIELD_MAP: &[(&str, &str)] = &[
    ("title", "titulo"),
    ("description", "descricao"),
    ("rating", "nota"),
    ("name", "nome"),
    ("category", "categoria"),
];

/// Backend name for a local field, if it is mapped.
pub fn remote_name(local: &str) -> Option<&'static str> {
    FIELD_MAP
        .iter()
        .find(|(candidate, _)| *candidate == local)
        .map(|(_, remote)| *remote)
}

/// Local name for a backend field, if it is mapped.
pub fn local_name(remote: &str) -> Option<&'static str> {
    FIELD_MAP
        .iter()
        .find(|(_, candidate)| *candidate == remote)
        .map(|(local, _)| *local)
}

/// Maps a backend object to the local shape.
///
/// Remote keys are kept and local aliases are added next to them, so code
/// reading either naming convention sees the same value.
pub fn to_local(value: Value) -> Value {
    match value {
        Value::Object(mut object) => {
            for (local, remote) in FIELD_MAP {
                if let Some(found) = object.get(*remote).cloned() {
                    object.insert((*local).to_string(), found);
                }
            }
            Value::Object(object)
        }
        other => other,
    }
}

/// Maps a local object to the backend shape.
///
/// A non-null local value wins over a remote-named one; local keys are
/// removed from the result.
pub fn to_remote(value: Value) -> Value {
    match value {
        Value::Object(object) => Value::Object(object_to_remote(object)),
        other => other,
    }
}

fn object_to_remote(mut object: Map<String, Value>) -> Map<String, Value> {
    for (local, remote) in FIELD_MAP {
        match object.remove(*local) {
            Some(Value::Null) | None => {}
            Some(found) => {
                object.insert((*remote).to_string(), found);
            }
        }
    }
    object
}
