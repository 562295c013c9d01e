/*
 * Responsibility
 * - アプリ共通の AppError 定義
 * - IntoResponse 実装 (HTTP status / JSON error body)
 * - AuthError / LoginError / DownstreamError を統一的に変換
 */
use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde::Serialize;
use thiserror::Error;

use crate::services::auth::AuthError;
use crate::services::auth::login::LoginError;
use crate::services::downstream::DownstreamError;

#[derive(Debug, Error)]
pub enum AppError {
    #[error("invalid request: {0}")]
    InvalidRequest(String),

    #[error("unauthorized")]
    Unauthorized,

    #[error("forbidden")]
    Forbidden,

    #[error("bad gateway")]
    BadGateway,

    #[error("internal server error")]
    Internal,
}

impl AppError {
    pub fn invalid_request(message: impl Into<String>) -> Self {
        Self::InvalidRequest(message.into())
    }
}

#[derive(Serialize)]
struct ErrorResponseBody {
    error: ErrorBody,
}

#[derive(Serialize)]
struct ErrorBody {
    code: &'static str,
    message: String,
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, code) = match &self {
            AppError::InvalidRequest(_) => (StatusCode::BAD_REQUEST, "BAD_REQUEST"),
            AppError::Unauthorized => (StatusCode::UNAUTHORIZED, "UNAUTHORIZED"),
            AppError::Forbidden => (StatusCode::FORBIDDEN, "FORBIDDEN"),
            AppError::BadGateway => (StatusCode::BAD_GATEWAY, "BAD_GATEWAY"),
            AppError::Internal => (StatusCode::INTERNAL_SERVER_ERROR, "INTERNAL"),
        };

        let body = ErrorResponseBody {
            error: ErrorBody {
                code,
                message: self.to_string(),
            },
        };

        (status, Json(body)).into_response()
    }
}

// The kind is logged where the failure happens; the client only sees the status.
impl From<AuthError> for AppError {
    fn from(e: AuthError) -> Self {
        if e.status() == StatusCode::UNAUTHORIZED {
            AppError::Unauthorized
        } else {
            AppError::Forbidden
        }
    }
}

impl From<LoginError> for AppError {
    fn from(e: LoginError) -> Self {
        match e {
            LoginError::BadCredentials | LoginError::AccountUnavailable => AppError::Unauthorized,
            LoginError::IdentityProvider(_) => AppError::BadGateway,
            LoginError::Token(_) => AppError::Internal,
        }
    }
}

impl From<DownstreamError> for AppError {
    fn from(e: DownstreamError) -> Self {
        tracing::error!(error = %e, "downstream request failed");
        AppError::BadGateway
    }
}
