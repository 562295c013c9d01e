//! Bearer token 検証 → Identity を extensions に入れる
//!
//! - `Authorization: Bearer <jwt>` が無ければ匿名 Identity のまま通す
//!   (公開ルートがあるため。拒否するかどうかは role policy が決める)
//! - token が壊れている / 署名不一致 / 期限切れ → 401 (handler は呼ばれない)
//! - username でアカウントを引き、無効・ロック・期限切れ、user id 不一致なら 401

use axum::{
    Router,
    body::Body,
    extract::State,
    http::{Request, header},
    middleware::{self, Next},
    response::Response,
};

use crate::error::AppError;
use crate::services::auth::{AuthError, Identity};
use crate::state::AppState;

/// 全ルートに認証を掛ける。role policy より外側 (先) に置くこと。
pub fn apply(router: Router<AppState>, state: AppState) -> Router<AppState> {
    router.layer(middleware::from_fn_with_state(state, authenticate))
}

fn bearer_token(req: &Request<Body>) -> Option<&str> {
    req.headers()
        .get(header::AUTHORIZATION)
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.strip_prefix("Bearer "))
        .map(str::trim)
}

async fn authenticate(
    State(state): State<AppState>,
    mut req: Request<Body>,
    next: Next,
) -> Result<Response, AppError> {
    // req (Body) は Sync でないので、await を跨ぐ前に token を取り出しておく
    let token = bearer_token(&req).map(str::to_owned);
    let identity = match token {
        None => Identity::anonymous(),
        Some(token) => resolve_identity(&state, &token).await?,
    };

    // middleware → policy / extractor への受け渡し
    req.extensions_mut().insert(identity);

    Ok(next.run(req).await)
}

async fn resolve_identity(state: &AppState, token: &str) -> Result<Identity, AuthError> {
    let claims = state.tokens.parse(token).map_err(|err| {
        let err = AuthError::from(err);
        tracing::warn!(kind = err.kind(), "bearer token rejected");
        err
    })?;

    let account = state
        .identities
        .lookup_by_username(&claims.sub)
        .await
        .map_err(|err| {
            tracing::warn!(username = %claims.sub, error = %err, "identity lookup failed");
            AuthError::IdentityLookupFailed
        })?;

    if !account.is_usable() {
        tracing::warn!(username = %claims.sub, "account disabled, locked or expired");
        return Err(AuthError::IdentityLookupFailed);
    }

    // token の userId は account の現在の user id と一致していること
    if account.user_id.as_deref() != Some(claims.user_id.as_str()) {
        tracing::warn!(
            username = %claims.sub,
            token_user_id = %claims.user_id,
            "token user id does not match account"
        );
        return Err(AuthError::IdentityLookupFailed);
    }

    let identity = Identity::new(claims.user_id.clone(), account.username, account.roles)
        .with_token_expiry(claims.expiry());

    if !state.tokens.validate(token, &identity) {
        tracing::warn!(subject = %claims.sub, "token subject does not match account");
        return Err(AuthError::IdentityLookupFailed);
    }

    Ok(identity)
}
