/*
 * Responsibility
 * - /api/payments 系を payment-service へ中継
 * - 個別: payment → order → cart → userId (最長の chain)
 * - 作成: body の order.orderId を order chain で確認
 * - PUT (状態更新) は role policy で admin に限定済み
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
        downstream::{Service, records::PaymentDocument},
    },
    state::AppState,
};

pub async fn relay(State(state): State<AppState>, req: Request) -> Result<Response, AppError> {
    proxy::forward(&state, Service::Payment, Inbound::read(req).await?).await
}

pub async fn create(
    State(state): State<AppState>,
    CurrentIdentity(identity): CurrentIdentity,
    req: Request,
) -> Result<Response, AppError> {
    let inbound = Inbound::read(req).await?;
    let payment: PaymentDocument = inbound.json()?;

    proxy::require_access_to(&state, &identity, ResourceType::Orders, payment.order_id()).await?;
    proxy::forward(&state, Service::Payment, inbound).await
}

pub async fn by_id(
    State(state): State<AppState>,
    CurrentIdentity(identity): CurrentIdentity,
    Path(payment_id): Path<String>,
    req: Request,
) -> Result<Response, AppError> {
    proxy::require_access(&state, &identity, ResourceType::Payments, &payment_id).await?;
    proxy::forward(&state, Service::Payment, Inbound::read(req).await?).await
}
