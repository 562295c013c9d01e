/*
 * Responsibility
 * - /api/address 系を user-service へ中継
 * - 個別: address → user.userId、作成: body の user.userId
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
        downstream::{Service, records::AddressDocument},
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
    let address: AddressDocument = inbound.json()?;

    proxy::require_owner(&state, &identity, address.owner_id())?;
    proxy::forward(&state, Service::User, inbound).await
}

pub async fn by_id(
    State(state): State<AppState>,
    CurrentIdentity(identity): CurrentIdentity,
    Path(address_id): Path<String>,
    req: Request,
) -> Result<Response, AppError> {
    proxy::require_access(&state, &identity, ResourceType::Addresses, &address_id).await?;
    proxy::forward(&state, Service::User, Inbound::read(req).await?).await
}
