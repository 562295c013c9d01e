//! Stateless identity tokens (HS256 JWT).
//!
//! - `issue` signs `{sub, userId, iat, exp}` with the process-wide secret.
//! - `parse` is the only verification path; every accessor goes through it.
//! - `validate` never errors: anything but a verified, unexpired token whose
//!   subject matches the claimed identity is `false`.
use std::fmt;

use chrono::{DateTime, Duration, TimeZone, Utc};
use jsonwebtoken::errors::ErrorKind;
use jsonwebtoken::{Algorithm, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::services::auth::identity::Identity;

/// Why a token was refused.
///
/// The HTTP boundary answers 401 for all of them, but logs them apart.
#[derive(Debug, Error, Clone, Copy, PartialEq, Eq)]
pub enum TokenError {
    #[error("token is malformed")]
    Malformed,
    #[error("token signature is invalid")]
    SignatureInvalid,
    #[error("token has expired")]
    Expired,
    #[error("failed to sign token")]
    Signing,
}

impl From<jsonwebtoken::errors::Error> for TokenError {
    fn from(e: jsonwebtoken::errors::Error) -> Self {
        match e.kind() {
            ErrorKind::ExpiredSignature => Self::Expired,
            ErrorKind::InvalidSignature => Self::SignatureInvalid,
            _ => Self::Malformed,
        }
    }
}

/// Claims carried by every token.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Claims {
    pub sub: String,
    #[serde(rename = "userId")]
    pub user_id: String,
    pub iat: i64,
    pub exp: i64,
}

impl Claims {
    pub fn expiry(&self) -> Option<DateTime<Utc>> {
        Utc.timestamp_opt(self.exp, 0).single()
    }
}

/// A signed compact token. Opaque to everything but `TokenService`.
#[derive(Clone, PartialEq, Eq)]
pub struct Token(String);

impl Token {
    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn into_string(self) -> String {
        self.0
    }
}

impl From<&str> for Token {
    fn from(s: &str) -> Self {
        Self(s.to_string())
    }
}

impl fmt::Display for Token {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

// Tokens are bearer credentials; keep them out of logs.
impl fmt::Debug for Token {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("Token(..)")
    }
}

#[derive(Clone)]
pub struct TokenService {
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
    validation: Validation,
    lifetime: Duration,
    leeway_seconds: i64,
}

impl fmt::Debug for TokenService {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        // Do not print key material
        f.debug_struct("TokenService")
            .field("lifetime", &self.lifetime)
            .field("leeway_seconds", &self.leeway_seconds)
            .finish()
    }
}

impl TokenService {
    pub fn new(secret: &str, lifetime: Duration, leeway_seconds: u64) -> Self {
        let mut validation = Validation::new(Algorithm::HS256);
        validation.set_required_spec_claims(&["sub", "exp", "iat"]);
        validation.leeway = leeway_seconds;

        Self {
            encoding_key: EncodingKey::from_secret(secret.as_bytes()),
            decoding_key: DecodingKey::from_secret(secret.as_bytes()),
            validation,
            lifetime,
            leeway_seconds: leeway_seconds.try_into().unwrap_or(i64::MAX),
        }
    }

    pub fn lifetime(&self) -> Duration {
        self.lifetime
    }

    /// Issue a token for `identity`, valid from now for the configured lifetime.
    pub fn issue(&self, identity: &Identity) -> Result<Token, TokenError> {
        self.issue_at(identity, Utc::now())
    }

    pub(crate) fn issue_at(
        &self,
        identity: &Identity,
        issued_at: DateTime<Utc>,
    ) -> Result<Token, TokenError> {
        let claims = Claims {
            sub: identity.username.clone(),
            user_id: identity.subject_user_id.clone(),
            iat: issued_at.timestamp(),
            exp: (issued_at + self.lifetime).timestamp(),
        };

        let mut header = Header::new(Algorithm::HS256);
        header.typ = Some("JWT".to_string());

        jsonwebtoken::encode(&header, &claims, &self.encoding_key)
            .map(Token)
            .map_err(|e| {
                tracing::error!(error = %e, "failed to sign token");
                TokenError::Signing
            })
    }

    /// Verify signature and expiry, then decode the claims.
    pub fn parse(&self, token: &str) -> Result<Claims, TokenError> {
        let data = jsonwebtoken::decode::<Claims>(token, &self.decoding_key, &self.validation)?;
        let claims = data.claims;

        // jsonwebtoken still accepts `exp == now`; an expiry instant is already too late.
        if Utc::now().timestamp() >= claims.exp.saturating_add(self.leeway_seconds) {
            return Err(TokenError::Expired);
        }
        if claims.sub.trim().is_empty() {
            return Err(TokenError::Malformed);
        }

        Ok(claims)
    }

    pub fn validate(&self, token: &str, identity: &Identity) -> bool {
        match self.parse(token) {
            Ok(claims) => claims.sub == identity.username,
            Err(_) => false,
        }
    }

    pub fn extract_username(&self, token: &str) -> Result<String, TokenError> {
        self.parse(token).map(|c| c.sub)
    }

    pub fn extract_user_id(&self, token: &str) -> Result<String, TokenError> {
        self.parse(token).map(|c| c.user_id)
    }

    pub fn extract_expiry(&self, token: &str) -> Result<DateTime<Utc>, TokenError> {
        self.parse(token)?.expiry().ok_or(TokenError::Malformed)
    }
}
