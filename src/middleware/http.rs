//! HTTP-level middleware (cross-cutting concerns).
//!
//! Responsibility:
//! - Request-Id generation + propagation (X-Request-Id)
//! - Access logging / request tracing (TraceLayer)
//! - Body size limits
//! - Global timeout
//!
//! The timeout bounds the whole request: authentication lookup, up to three
//! sequential ownership hops, and the forwarded call.

use std::time::Duration;

use axum::Router;
use axum::error_handling::HandleErrorLayer;
use axum::http::{StatusCode, header::HeaderName};
use tower::timeout::TimeoutLayer;
use tower::{BoxError, ServiceBuilder};
use tower_http::limit::RequestBodyLimitLayer;
use tower_http::request_id::{MakeRequestUuid, PropagateRequestIdLayer, SetRequestIdLayer};
use tower_http::trace::TraceLayer;

/// Largest request body the gateway accepts (and buffers for ownership checks).
pub const MAX_BODY_BYTES: usize = 1024 * 1024;

/// Outer budget for a request whose downstream calls are each bounded by `downstream_timeout`.
pub fn request_timeout(downstream_timeout: Duration) -> Duration {
    // identity lookup + 3 hops + forward
    downstream_timeout
        .saturating_mul(5)
        .saturating_add(Duration::from_secs(1))
}

pub fn apply(router: Router, timeout: Duration) -> Router {
    let request_id_header = HeaderName::from_static("x-request-id");

    let layers = ServiceBuilder::new()
        // Make the service error `Infallible` by converting errors into responses.
        .layer(HandleErrorLayer::new(|err: BoxError| async move {
            if err.is::<tower::timeout::error::Elapsed>() {
                StatusCode::GATEWAY_TIMEOUT
            } else {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        }))
        .layer(SetRequestIdLayer::new(
            request_id_header.clone(),
            MakeRequestUuid,
        ))
        .layer(PropagateRequestIdLayer::new(request_id_header))
        .layer(RequestBodyLimitLayer::new(MAX_BODY_BYTES))
        .layer(TimeoutLayer::new(timeout))
        .layer(TraceLayer::new_for_http());

    router.layer(layers)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn request_budget_covers_every_downstream_call() {
        assert_eq!(
            request_timeout(Duration::from_secs(10)),
            Duration::from_secs(51)
        );
        assert_eq!(request_timeout(Duration::MAX), Duration::MAX);
    }
}
