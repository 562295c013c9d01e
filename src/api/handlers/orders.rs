/*
 * Responsibility
 * - /api/orders 系を order-service へ中継
 * - 個別: order → cart → userId の chain
 * - 作成: body の cart.cartId を cart chain で確認
 * - status 更新 (PATCH) は role policy で admin に限定済み
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
        downstream::{Service, records::OrderDocument},
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
    let order: OrderDocument = inbound.json()?;

    proxy::require_access_to(&state, &identity, ResourceType::Carts, order.cart_id()).await?;
    proxy::forward(&state, Service::Order, inbound).await
}

pub async fn by_id(
    State(state): State<AppState>,
    CurrentIdentity(identity): CurrentIdentity,
    Path(order_id): Path<String>,
    req: Request,
) -> Result<Response, AppError> {
    proxy::require_access(&state, &identity, ResourceType::Orders, &order_id).await?;
    proxy::forward(&state, Service::Order, Inbound::read(req).await?).await
}
