//! Shared plumbing for the forwarding handlers.
//!
//! A handler reads the inbound request once, runs its ownership check (if
//! any) and relays the request to the owning service under the same path.
//! Only the method, path, query, content type and body travel downstream;
//! the caller's `Authorization` header stays at the gateway.

use axum::{
    body::{Body, Bytes, to_bytes},
    extract::{OriginalUri, Request},
    http::{HeaderValue, Method, header},
    response::{IntoResponse, Response},
};
use serde::de::DeserializeOwned;

use crate::error::AppError;
use crate::middleware::http::MAX_BODY_BYTES;
use crate::services::auth::{Identity, Ownership, ResourceReference, ResourceType};
use crate::services::downstream::{ForwardedResponse, Service};
use crate::state::AppState;

pub(crate) struct Inbound {
    method: Method,
    path_and_query: String,
    content_type: Option<HeaderValue>,
    body: Bytes,
}

impl Inbound {
    pub(crate) async fn read(req: Request) -> Result<Self, AppError> {
        let (parts, body) = req.into_parts();

        // nest() strips the /api prefix from the request uri
        let uri = parts
            .extensions
            .get::<OriginalUri>()
            .map(|OriginalUri(uri)| uri.clone())
            .unwrap_or(parts.uri);
        let path_and_query = uri
            .path_and_query()
            .map(|pq| pq.as_str().to_string())
            .unwrap_or_else(|| uri.path().to_string());

        let body = to_bytes(body, MAX_BODY_BYTES)
            .await
            .map_err(|_| AppError::invalid_request("request body is unreadable or too large"))?;

        Ok(Self {
            method: parts.method,
            path_and_query,
            content_type: parts.headers.get(header::CONTENT_TYPE).cloned(),
            body,
        })
    }

    /// Body as a JSON document, for handlers whose target is named in the body.
    pub(crate) fn json<T: DeserializeOwned>(&self) -> Result<T, AppError> {
        serde_json::from_slice(&self.body)
            .map_err(|_| AppError::invalid_request("request body is not a valid document"))
    }
}

pub(crate) async fn forward(
    state: &AppState,
    service: Service,
    inbound: Inbound,
) -> Result<Response, AppError> {
    let forwarded = state
        .downstream
        .forward(
            service,
            inbound.method,
            &inbound.path_and_query,
            inbound.content_type,
            inbound.body,
        )
        .await?;

    Ok(forwarded.into_response())
}

impl IntoResponse for ForwardedResponse {
    fn into_response(self) -> Response {
        let mut res = Response::new(Body::from(self.body));
        *res.status_mut() = self.status;
        if let Some(ct) = self.content_type {
            res.headers_mut().insert(header::CONTENT_TYPE, ct);
        }
        res
    }
}

/// Resolve `resource_id` of `resource_type` and require the caller to own it.
pub(crate) async fn require_access(
    state: &AppState,
    identity: &Identity,
    resource_type: ResourceType,
    resource_id: &str,
) -> Result<(), AppError> {
    let reference = ResourceReference::new(resource_type, resource_id);
    state
        .guard
        .authorize(identity, &reference)
        .await
        .into_result()?;
    Ok(())
}

/// Like `require_access`, for an id read from a request body. A missing id
/// leaves the owner unknown.
pub(crate) async fn require_access_to(
    state: &AppState,
    identity: &Identity,
    resource_type: ResourceType,
    resource_id: Option<String>,
) -> Result<(), AppError> {
    match resource_id {
        Some(id) => require_access(state, identity, resource_type, &id).await,
        None => require_owner(state, identity, None),
    }
}

/// The owner is already known (path or body `userId`).
pub(crate) fn require_owner(
    state: &AppState,
    identity: &Identity,
    owner: Option<String>,
) -> Result<(), AppError> {
    let target = match owner {
        Some(id) if !id.trim().is_empty() => Ownership::Owned(id),
        _ => Ownership::Unresolvable,
    };
    state.guard.can_access(identity, &target).into_result()?;
    Ok(())
}
