/*
 * Responsibility
 * - POST /api/authenticate (username/password → jwtToken)
 * - DTO validation → login service 呼び出し
 * - 失敗の詳細はクライアントに返さない (401 / 502 のみ)
 */
use axum::{Json, extract::State};

use crate::{
    api::dto::authenticate::{LoginRequest, LoginResponse},
    error::AppError,
    services::auth::login::login,
    state::AppState,
};

pub async fn authenticate(
    State(state): State<AppState>,
    Json(req): Json<LoginRequest>,
) -> Result<Json<LoginResponse>, AppError> {
    req.validate().map_err(AppError::invalid_request)?;

    let token = login(
        state.identities.as_ref(),
        &state.tokens,
        req.username.trim(),
        &req.password,
    )
    .await?;

    tracing::info!(username = %req.username.trim(), "token issued");

    Ok(Json(LoginResponse {
        jwt_token: token.into_string(),
    }))
}
