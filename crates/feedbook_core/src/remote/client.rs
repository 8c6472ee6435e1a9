//! Typed CRUD client over one backend collection endpoint.
//!
//! # Invariants
//! - Every response body is mapped remote to local before decoding.
//! - Create bodies never carry `id` or submitter fields.
//! - Mutating calls always carry the caller's `email` header.

use crate::model::resource::{Resource, ResourceValidationError, Updatable, SERVER_ASSIGNED_FIELDS};
use crate::remote::error::ApiError;
use crate::remote::mapping::{to_local, to_remote};
use crate::remote::transport::{ApiRequest, ApiResponse, Caller, HttpMethod, Transport};
use log::info;
use serde::Serialize;
use serde_json::Value;
use std::marker::PhantomData;

const COLLECTION_ROOT: &str = "/";

/// Stateless client for one resource kind.
pub struct ResourceClient<R, T> {
    transport: T,
    _resource: PhantomData<fn() -> R>,
}

impl<R: Resource, T: Transport> ResourceClient<R, T> {
    pub fn new(transport: T) -> Self {
        Self {
            transport,
            _resource: PhantomData,
        }
    }

    pub fn transport(&self) -> &T {
        &self.transport
    }

    /// `GET /`: every element mapped to the local shape.
    pub async fn list(&self) -> Result<Vec<R>, ApiError> {
        let response = self.send(HttpMethod::Get, COLLECTION_ROOT, None, None).await?;
        let items = match parse_body(&response.body)? {
            Value::Array(items) => items,
            other => {
                return Err(ApiError::Transport(format!(
                    "expected a JSON array of {}, got {}",
                    R::KIND,
                    json_kind(&other)
                )))
            }
        };

        let decoded = items
            .into_iter()
            .map(decode::<R>)
            .collect::<Result<Vec<_>, _>>()?;
        info!(
            "event=resource_list module=remote status=ok kind={} count={}",
            R::KIND,
            decoded.len()
        );
        Ok(decoded)
    }

    /// `GET /{id}`. A 404 is `ApiError::NotFound`.
    pub async fn get_by_id(&self, id: &str) -> Result<R, ApiError> {
        let path = item_path(id)?;
        let response = self.send(HttpMethod::Get, &path, None, None).await?;
        decode(parse_body(&response.body)?)
    }

    /// `POST /` with the caller's identity; the server assigns `id`.
    pub async fn create(&self, resource: &R, caller: &Caller) -> Result<R, ApiError> {
        resource.validate()?;
        validate_caller(caller)?;

        let mut body = encode(resource)?;
        if let Value::Object(object) = &mut body {
            for field in SERVER_ASSIGNED_FIELDS {
                object.remove(*field);
            }
        }

        let response = self
            .send(HttpMethod::Post, COLLECTION_ROOT, Some(caller), Some(body))
            .await?;
        let created: R = decode(parse_body(&response.body)?)?;
        info!(
            "event=resource_create module=remote status=ok kind={}",
            R::KIND
        );
        Ok(created)
    }

    /// `DELETE /{id}` with the caller's identity. Any non-2xx fails.
    pub async fn remove(&self, id: &str, caller: &Caller) -> Result<(), ApiError> {
        let path = item_path(id)?;
        validate_caller(caller)?;
        self.send(HttpMethod::Delete, &path, Some(caller), None)
            .await?;
        info!(
            "event=resource_remove module=remote status=ok kind={}",
            R::KIND
        );
        Ok(())
    }

    /// Checks that the backend answers `GET /` with a success status.
    ///
    /// Network failures are still errors; a reachable backend answering
    /// non-2xx yields `Ok(false)`.
    pub async fn ping(&self) -> Result<bool, ApiError> {
        let response = self
            .transport
            .send(ApiRequest {
                method: HttpMethod::Get,
                path: COLLECTION_ROOT.to_string(),
                caller: None,
                body: None,
            })
            .await?;
        Ok(response.is_success())
    }

    async fn send(
        &self,
        method: HttpMethod,
        path: &str,
        caller: Option<&Caller>,
        body: Option<Value>,
    ) -> Result<ApiResponse, ApiError> {
        let response = self
            .transport
            .send(ApiRequest {
                method,
                path: path.to_string(),
                caller: caller.cloned(),
                body,
            })
            .await?;

        if response.is_success() {
            Ok(response)
        } else {
            Err(ApiError::from_status(response.status, path, &response.body))
        }
    }
}

impl<R: Updatable, T: Transport> ResourceClient<R, T> {
    /// `PUT /{id}` with a partial body and the caller's identity.
    pub async fn update(&self, id: &str, patch: &R::Patch, caller: &Caller) -> Result<R, ApiError> {
        let path = item_path(id)?;
        R::validate_patch(patch)?;
        validate_caller(caller)?;

        let body = encode(patch)?;
        let response = self
            .send(HttpMethod::Put, &path, Some(caller), Some(body))
            .await?;
        let updated: R = decode(parse_body(&response.body)?)?;
        info!(
            "event=resource_update module=remote status=ok kind={}",
            R::KIND
        );
        Ok(updated)
    }
}

fn item_path(id: &str) -> Result<String, ApiError> {
    let trimmed = id.trim();
    if trimmed.is_empty() {
        return Err(ResourceValidationError::EmptyField("id").into());
    }
    if trimmed.contains(['/', '?', '#']) {
        return Err(ResourceValidationError::InvalidId(trimmed.to_string()).into());
    }
    Ok(format!("/{trimmed}"))
}

fn validate_caller(caller: &Caller) -> Result<(), ResourceValidationError> {
    if caller.email.trim().is_empty() {
        return Err(ResourceValidationError::EmptyField("caller email"));
    }
    Ok(())
}

fn encode<S: Serialize>(value: &S) -> Result<Value, ApiError> {
    let local = serde_json::to_value(value)
        .map_err(|err| ApiError::Transport(format!("failed to encode request body: {err}")))?;
    Ok(to_remote(local))
}

fn decode<R: Resource>(value: Value) -> Result<R, ApiError> {
    Ok(serde_json::from_value(to_local(value))?)
}

fn parse_body(body: &str) -> Result<Value, ApiError> {
    Ok(serde_json::from_str(body)?)
}

fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}
