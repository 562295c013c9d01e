//! Route-level role check.
//!
//! Runs after authentication has bound an `Identity` and before any handler,
//! so a denied request never reaches ownership resolution.

use axum::{
    Router,
    body::Body,
    extract::{OriginalUri, State},
    http::{Request, Uri},
    middleware::{self, Next},
    response::Response,
};

use crate::error::AppError;
use crate::services::auth::{AuthError, Identity, PolicyVerdict};
use crate::state::AppState;

pub fn apply(router: Router<AppState>, state: AppState) -> Router<AppState> {
    router.layer(middleware::from_fn_with_state(state, enforce))
}

async fn enforce(
    State(state): State<AppState>,
    OriginalUri(original_uri): OriginalUri,
    req: Request<Body>,
    next: Next,
) -> Result<Response, AppError> {
    check(&state, &original_uri, &req)?;
    Ok(next.run(req).await)
}

fn check(state: &AppState, original_uri: &Uri, req: &Request<Body>) -> Result<(), AuthError> {
    let anonymous = Identity::anonymous();
    let identity = req.extensions().get::<Identity>().unwrap_or(&anonymous);
    let path = original_uri.path();

    match state.policy.evaluate(req.method(), path, identity) {
        PolicyVerdict::Public | PolicyVerdict::Granted => Ok(()),
        PolicyVerdict::Denied => {
            tracing::info!(
                method = %req.method(),
                path,
                username = %identity.username,
                kind = AuthError::RoleDenied.kind(),
                "route denied for caller roles"
            );
            Err(AuthError::RoleDenied)
        }
        PolicyVerdict::Unmatched => {
            tracing::info!(method = %req.method(), path, "no route rule matched, denying");
            Err(AuthError::RoleDenied)
        }
    }
}
