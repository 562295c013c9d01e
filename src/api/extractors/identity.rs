use axum::extract::FromRequestParts;
use axum::http::request::Parts;

use crate::error::AppError;
use crate::services::auth::Identity;
use crate::state::AppState;

/// Handler で認証済み Identity を受け取るための extractor
/// authenticate middleware が extensions に insert 済みである前提
/// 匿名 (token 無し) や未設定の場合は 401
pub struct CurrentIdentity(pub Identity);

impl FromRequestParts<AppState> for CurrentIdentity
where
    AppState: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut Parts,
        _state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        parts
            .extensions
            .get::<Identity>()
            .filter(|identity| identity.is_authenticated())
            .cloned()
            .map(CurrentIdentity)
            .ok_or(AppError::Unauthorized)
    }
}
