/*
 * Responsibility
 * - /api/products, /api/categories を product-service へ中継
 * - 所有者の概念なし (閲覧は公開、編集は role policy で admin 限定)
 */
use axum::{
    extract::{Request, State},
    response::Response,
};

use crate::{
    api::handlers::proxy::{self, Inbound},
    error::AppError,
    services::downstream::Service,
    state::AppState,
};

pub async fn relay(State(state): State<AppState>, req: Request) -> Result<Response, AppError> {
    proxy::forward(&state, Service::Product, Inbound::read(req).await?).await
}
