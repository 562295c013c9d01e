/*
 * Responsibility
 * - /api/credentials 系を user-service へ中継
 * - 個別: credential → user.userId の chain で所有者確認
 * - 作成: body の user.userId で所有者確認
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
    services::{
        auth::ResourceType,
        downstream::{Service, records::CredentialDocument},
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
    let credential: CredentialDocument = inbound.json()?;

    proxy::require_owner(&state, &identity, credential.owner_id())?;
    proxy::forward(&state, Service::User, inbound).await
}

pub async fn by_id(
    State(state): State<AppState>,
    CurrentIdentity(identity): CurrentIdentity,
    Path(credential_id): Path<String>,
    req: Request,
) -> Result<Response, AppError> {
    proxy::require_access(&state, &identity, ResourceType::Credentials, &credential_id).await?;
    proxy::forward(&state, Service::User, Inbound::read(req).await?).await
}
