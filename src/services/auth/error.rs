use axum::http::StatusCode;
use thiserror::Error;

use crate::services::auth::token::TokenError;

/// Authentication / authorization failure taxonomy.
///
/// Token and identity failures answer 401, role and ownership denials 403.
/// The variants stay distinct so logs can tell them apart even though the
/// client only sees the status.
#[derive(Debug, Error, Clone, Copy, PartialEq, Eq)]
pub enum AuthError {
    #[error("token is malformed")]
    TokenMalformed,
    #[error("token signature is invalid")]
    TokenSignatureInvalid,
    #[error("token has expired")]
    TokenExpired,
    #[error("identity lookup failed")]
    IdentityLookupFailed,
    #[error("role does not permit this route")]
    RoleDenied,
    #[error("resource belongs to another user")]
    OwnershipDenied,
    #[error("resource owner could not be resolved")]
    OwnershipUnresolvable,
}

impl AuthError {
    pub fn status(&self) -> StatusCode {
        match self {
            Self::TokenMalformed
            | Self::TokenSignatureInvalid
            | Self::TokenExpired
            | Self::IdentityLookupFailed => StatusCode::UNAUTHORIZED,
            Self::RoleDenied | Self::OwnershipDenied | Self::OwnershipUnresolvable => {
                StatusCode::FORBIDDEN
            }
        }
    }

    /// Stable name for structured logs.
    pub fn kind(&self) -> &'static str {
        match self {
            Self::TokenMalformed => "token_malformed",
            Self::TokenSignatureInvalid => "token_signature_invalid",
            Self::TokenExpired => "token_expired",
            Self::IdentityLookupFailed => "identity_lookup_failed",
            Self::RoleDenied => "role_denied",
            Self::OwnershipDenied => "ownership_denied",
            Self::OwnershipUnresolvable => "ownership_unresolvable",
        }
    }
}

impl From<TokenError> for AuthError {
    fn from(e: TokenError) -> Self {
        match e {
            TokenError::Expired => Self::TokenExpired,
            TokenError::SignatureInvalid => Self::TokenSignatureInvalid,
            // `Signing` only comes out of `issue`, never out of `parse`.
            TokenError::Malformed | TokenError::Signing => Self::TokenMalformed,
        }
    }
}
