/*
 * Responsibility
 * - /api/users 系を user-service へ中継
 * - 個別ユーザーは path の userId がそのまま所有者 (chain なし)
 * - 一覧 / username 検索は role policy で admin に限定済み、登録 (POST) は公開
 */
use axum::{
    extract::{Path, Request, State},
    response::Response,
};

use crate::{
    api::{
        extractors::CurrentIdentity,
        handlers::proxy::{self, Inbound},
    },
    error::AppError,
    services::downstream::Service,
    state::AppState,
};

pub async fn relay(State(state): State<AppState>, req: Request) -> Result<Response, AppError> {
    proxy::forward(&state, Service::User, Inbound::read(req).await?).await
}

pub async fn by_id(
    State(state): State<AppState>,
    CurrentIdentity(identity): CurrentIdentity,
    Path(user_id): Path<String>,
    req: Request,
) -> Result<Response, AppError> {
    proxy::require_owner(&state, &identity, Some(user_id))?;
    proxy::forward(&state, Service::User, Inbound::read(req).await?).await
}
