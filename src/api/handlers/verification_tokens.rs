/*
 * Responsibility
 * - /api/verificationTokens 系を user-service へ中継
 * - 作成: body の credential.credentialId を credential chain で確認
 * - 一覧 / 参照 / 更新 / 削除は role policy で admin に限定済み
 */
use axum::{
    extract::{Request, State},
    response::Response,
};

use crate::{
    api::{
        extractors::CurrentIdentity,
        handlers::proxy::{self, Inbound},
    },
    error::AppError,
    services::{
        auth::ResourceType,
        downstream::{Service, records::VerificationTokenDocument},
    },
    state::AppState,
};

pub async fn relay(State(state): State<AppState>, req: Request) -> Result<Response, AppError> {
    proxy::forward(&state, Service::User, Inbound::read(req).await?).await
}

pub async fn create(
    State(state): State<AppState>,
    CurrentIdentity(identity): CurrentIdentity,
    req: Request,
) -> Result<Response, AppError> {
    let inbound = Inbound::read(req).await?;
    let token: VerificationTokenDocument = inbound.json()?;

    proxy::require_access_to(
        &state,
        &identity,
        ResourceType::Credentials,
        token.credential_id(),
    )
    .await?;
    proxy::forward(&state, Service::User, inbound).await
}
