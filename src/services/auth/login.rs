use thiserror::Error;
use tracing::{info, warn};

use crate::services::auth::identity::{Identity, IdentityLookup, LookupError};
use crate::services::auth::password::verify_password;
use crate::services::auth::token::{Token, TokenError, TokenService};

#[derive(Debug, Error)]
pub enum LoginError {
    #[error("bad credentials")]
    BadCredentials,
    #[error("account is disabled, locked or expired")]
    AccountUnavailable,
    #[error("identity provider failure: {0}")]
    IdentityProvider(LookupError),
    #[error(transparent)]
    Token(#[from] TokenError),
}

/// Check `username`/`password` against the identity provider and issue a token.
pub async fn login(
    identities: &dyn IdentityLookup,
    tokens: &TokenService,
    username: &str,
    password: &str,
) -> Result<Token, LoginError> {
    let account = match identities.lookup_by_username(username).await {
        Ok(account) => account,
        Err(LookupError::NotFound) => {
            info!(username, "login for unknown user");
            return Err(LoginError::BadCredentials);
        }
        Err(e) => {
            warn!(username, error = %e, "identity lookup failed during login");
            return Err(LoginError::IdentityProvider(e));
        }
    };

    if !verify_password(password, &account.credential_hash) {
        info!(username, "login with wrong password");
        return Err(LoginError::BadCredentials);
    }
    if !account.is_usable() {
        info!(username, "login for unusable account");
        return Err(LoginError::AccountUnavailable);
    }

    let user_id = account
        .user_id
        .clone()
        .filter(|id| !id.trim().is_empty())
        .ok_or_else(|| LoginError::IdentityProvider(LookupError::Malformed("missing user id".into())))?;

    let identity = Identity::new(user_id, account.username, account.roles);
    Ok(tokens.issue(&identity)?)
}
