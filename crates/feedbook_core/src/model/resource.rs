//! Remote resource models (rated feedback and catalog tools).
//!
//! # Responsibility
//! - Define the canonical in-memory shape of backend resources.
//! - Validate resources before they reach the network.
//!
//! # Invariants
//! - In-memory field names are the English ones; `remote::mapping` owns the
//!   translation to backend names.
//! - `id` and submitter fields are server-assigned and never sent on create.
//! - Feedback `rating` is an integer in `[0, 10]`.

use serde::de::DeserializeOwned;
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;
use thiserror::Error;

pub const RATING_MIN: i64 = 0;
pub const RATING_MAX: i64 = 10;
/// Rating assumed when a backend record carries no `nota`.
pub const DEFAULT_RATING: i64 = 5;

/// Keys owned by the server. Stripped from create request bodies.
pub const SERVER_ASSIGNED_FIELDS: &[&str] = &["id", "nomeUsuario", "emailUsuario"];

/// Client-side rejection raised before any request is sent.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ResourceValidationError {
    #[error("rating must be a number, got `{0}`")]
    RatingNotNumeric(String),
    #[error("rating must be between 0 and 10, got {0}")]
    RatingOutOfRange(i64),
    #[error("{0} must not be empty")]
    EmptyField(&'static str),
    #[error("invalid resource id `{0}`")]
    InvalidId(String),
}

/// Backend resource exposed through one REST collection endpoint.
pub trait Resource: Serialize + DeserializeOwned + Send + Sync {
    /// Short label used in log events.
    const KIND: &'static str;

    /// Server-assigned id; `None` before the resource is created.
    fn id(&self) -> Option<&str>;

    /// Validates client-side invariants before a create request.
    fn validate(&self) -> Result<(), ResourceValidationError>;
}

/// Resources whose backend exposes `PUT /{id}`.
///
/// Feedback does not implement this: its backend only supports
/// create/list/delete, so `update` is not callable for it.
pub trait Updatable: Resource {
    type Patch: Serialize + Send + Sync;

    fn validate_patch(patch: &Self::Patch) -> Result<(), ResourceValidationError>;
}

/// Rated feedback entry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Feedback {
    #[serde(
        default,
        deserialize_with = "deserialize_id",
        skip_serializing_if = "Option::is_none"
    )]
    pub id: Option<String>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub title: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub description: String,
    #[serde(default = "default_rating", deserialize_with = "deserialize_rating")]
    pub rating: i64,
    #[serde(
        default,
        rename = "nomeUsuario",
        skip_serializing_if = "Option::is_none"
    )]
    pub submitter_name: Option<String>,
    #[serde(
        default,
        rename = "emailUsuario",
        skip_serializing_if = "Option::is_none"
    )]
    pub submitter_email: Option<String>,
}

impl Feedback {
    /// Creates an unsaved feedback entry.
    pub fn new(title: impl Into<String>, description: impl Into<String>, rating: i64) -> Self {
        Self {
            id: None,
            title: title.into(),
            description: description.into(),
            rating,
            submitter_name: None,
            submitter_email: None,
        }
    }
}

impl Resource for Feedback {
    const KIND: &'static str = "feedback";

    fn id(&self) -> Option<&str> {
        self.id.as_deref()
    }

    fn validate(&self) -> Result<(), ResourceValidationError> {
        if self.title.trim().is_empty() {
            return Err(ResourceValidationError::EmptyField("title"));
        }
        validate_rating(self.rating)
    }
}

/// Catalog-style tool entry.
///
/// `price`, `brand`, `available` and `image_url` are not persisted by the
/// backend; they survive only when the server echoes them back.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Tool {
    #[serde(
        default,
        deserialize_with = "deserialize_id",
        skip_serializing_if = "Option::is_none"
    )]
    pub id: Option<String>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub name: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub description: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub category: String,
    #[serde(
        default,
        rename = "nomeUsuario",
        skip_serializing_if = "Option::is_none"
    )]
    pub submitter_name: Option<String>,
    #[serde(
        default,
        rename = "emailUsuario",
        skip_serializing_if = "Option::is_none"
    )]
    pub submitter_email: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub price: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub brand: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub available: Option<bool>,
    #[serde(
        default,
        rename = "imageUrl",
        skip_serializing_if = "Option::is_none"
    )]
    pub image_url: Option<String>,
}

impl Tool {
    /// Creates an unsaved tool entry without the optional catalog fields.
    pub fn new(
        name: impl Into<String>,
        description: impl Into<String>,
        category: impl Into<String>,
    ) -> Self {
        Self {
            id: None,
            name: name.into(),
            description: description.into(),
            category: category.into(),
            submitter_name: None,
            submitter_email: None,
            price: None,
            brand: None,
            available: None,
            image_url: None,
        }
    }
}

impl Resource for Tool {
    const KIND: &'static str = "tool";

    fn id(&self) -> Option<&str> {
        self.id.as_deref()
    }

    fn validate(&self) -> Result<(), ResourceValidationError> {
        if self.name.trim().is_empty() {
            return Err(ResourceValidationError::EmptyField("name"));
        }
        Ok(())
    }
}

/// Partial tool update. `None` fields are left out of the request body.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct ToolPatch {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub category: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub price: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub brand: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub available: Option<bool>,
    #[serde(rename = "imageUrl", skip_serializing_if = "Option::is_none")]
    pub image_url: Option<String>,
}

impl Updatable for Tool {
    type Patch = ToolPatch;

    fn validate_patch(patch: &ToolPatch) -> Result<(), ResourceValidationError> {
        match patch.name.as_deref() {
            Some(name) if name.trim().is_empty() => Err(ResourceValidationError::EmptyField("name")),
            _ => Ok(()),
        }
    }
}

/// Accepts string or numeric ids; the backend is free to use either.
fn deserialize_id<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    match Option::<Value>::deserialize(deserializer)? {
        None | Some(Value::Null) => Ok(None),
        Some(Value::String(id)) => Ok(Some(id)),
        Some(Value::Number(id)) => Ok(Some(id.to_string())),
        Some(other) => Err(serde::de::Error::custom(format!(
            "expected string or number id, got {other}"
        ))),
    }
}

/// Reads an explicit `null` the same way as a missing key.
fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

fn default_rating() -> i64 {
    DEFAULT_RATING
}

fn deserialize_rating<'de, D>(deserializer: D) -> Result<i64, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(Option::<i64>::deserialize(deserializer)?.unwrap_or(DEFAULT_RATING))
}

/// Checks that a rating is within the accepted inclusive range.
pub fn validate_rating(rating: i64) -> Result<(), ResourceValidationError> {
    if (RATING_MIN..=RATING_MAX).contains(&rating) {
        Ok(())
    } else {
        Err(ResourceValidationError::RatingOutOfRange(rating))
    }
}

/// Parses raw form input into a rating.
pub fn parse_rating(input: &str) -> Result<i64, ResourceValidationError> {
    let trimmed = input.trim();
    let rating = trimmed
        .parse::<i64>()
        .map_err(|_| ResourceValidationError::RatingNotNumeric(trimmed.to_string()))?;
    validate_rating(rating)?;
    Ok(rating)
}
