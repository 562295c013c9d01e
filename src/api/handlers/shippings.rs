/*
 * Responsibility
 * - /api/shippings 系を shipping-service へ中継
 * - 出荷は order に紐づくので order chain で所有者確認
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
        downstream::{Service, records::ShippingDocument},
    },
    state::AppState,
};

pub async fn relay(State(state): State<AppState>, req: Request) -> Result<Response, AppError> {
    proxy::forward(&state, Service::Shipping, Inbound::read(req).await?).await
}

pub async fn create(
    State(state): State<AppState>,
    CurrentIdentity(identity): CurrentIdentity,
    req: Request,
) -> Result<Response, AppError> {
    let inbound = Inbound::read(req).await?;
    let shipping: ShippingDocument = inbound.json()?;

    proxy::require_access_to(&state, &identity, ResourceType::Orders, shipping.order_id()).await?;
    proxy::forward(&state, Service::Shipping, inbound).await
}

pub async fn by_order(
    State(state): State<AppState>,
    CurrentIdentity(identity): CurrentIdentity,
    Path(order_id): Path<String>,
    req: Request,
) -> Result<Response, AppError> {
    proxy::require_access(&state, &identity, ResourceType::Orders, &order_id).await?;
    proxy::forward(&state, Service::Shipping, Inbound::read(req).await?).await
}
