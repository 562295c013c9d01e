/*
 * Responsibility
 * - /api/favourites 系を favourite-service へ中継
 * - 個別の key は {userId}/{productId}、所有者は key に含まれる
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
        auth::ResourceReference,
        downstream::{Service, records::FavouriteDocument},
    },
    state::AppState,
};

pub async fn relay(State(state): State<AppState>, req: Request) -> Result<Response, AppError> {
    proxy::forward(&state, Service::Favourite, Inbound::read(req).await?).await
}

pub async fn create(
    State(state): State<AppState>,
    CurrentIdentity(identity): CurrentIdentity,
    req: Request,
) -> Result<Response, AppError> {
    let inbound = Inbound::read(req).await?;
    let favourite: FavouriteDocument = inbound.json()?;

    proxy::require_owner(&state, &identity, favourite.owner_id())?;
    proxy::forward(&state, Service::Favourite, inbound).await
}

pub async fn by_key(
    State(state): State<AppState>,
    CurrentIdentity(identity): CurrentIdentity,
    Path((user_id, product_id)): Path<(String, String)>,
    req: Request,
) -> Result<Response, AppError> {
    let reference = ResourceReference::favourite(&user_id, &product_id);
    proxy::require_access(&state, &identity, reference.resource_type, &reference.resource_id)
        .await?;
    proxy::forward(&state, Service::Favourite, Inbound::read(req).await?).await
}
