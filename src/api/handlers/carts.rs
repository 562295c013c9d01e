/*
 * Responsibility
 * - /api/carts 系を order-service へ中継
 * - 個別: cart → userId、作成: body の userId
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
        downstream::{Service, records::CartDocument},
    },
    state::AppState,
};

pub async fn relay(State(state): State<AppState>, req: Request) -> Result<Response, AppError> {
    proxy::forward(&state, Service::Order, Inbound::read(req).await?).await
}

pub async fn create(
    State(state): State<AppState>,
    CurrentIdentity(identity): CurrentIdentity,
    req: Request,
) -> Result<Response, AppError> {
    let inbound = Inbound::read(req).await?;
    let cart: CartDocument = inbound.json()?;

    proxy::require_owner(&state, &identity, cart.owner_id())?;
    proxy::forward(&state, Service::Order, inbound).await
}

pub async fn by_id(
    State(state): State<AppState>,
    CurrentIdentity(identity): CurrentIdentity,
    Path(cart_id): Path<String>,
    req: Request,
) -> Result<Response, AppError> {
    proxy::require_access(&state, &identity, ResourceType::Carts, &cart_id).await?;
    proxy::forward(&state, Service::Order, Inbound::read(req).await?).await
}
