//! Who the caller is, and where that is looked up.
use std::collections::BTreeSet;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use thiserror::Error;

pub const ROLE_ADMIN: &str = "ROLE_ADMIN";
pub const ROLE_USER: &str = "ROLE_USER";

/// The caller bound to a request.
///
/// Built by the authentication middleware from a verified token plus an
/// account lookup, and read by the role policy, the access guard and handlers.
/// Requests without a bearer credential carry [`Identity::anonymous`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Identity {
    pub subject_user_id: String,
    pub username: String,
    pub roles: BTreeSet<String>,
    pub token_expiry: Option<DateTime<Utc>>,
}

impl Identity {
    pub fn new<R, S>(subject_user_id: impl Into<String>, username: impl Into<String>, roles: R) -> Self
    where
        R: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            subject_user_id: subject_user_id.into(),
            username: username.into(),
            roles: roles.into_iter().map(Into::into).collect(),
            token_expiry: None,
        }
    }

    pub fn anonymous() -> Self {
        Self {
            subject_user_id: String::new(),
            username: String::new(),
            roles: BTreeSet::new(),
            token_expiry: None,
        }
    }

    pub fn with_token_expiry(mut self, expiry: Option<DateTime<Utc>>) -> Self {
        self.token_expiry = expiry;
        self
    }

    pub fn is_authenticated(&self) -> bool {
        !self.username.is_empty()
    }

    pub fn has_role(&self, role: &str) -> bool {
        self.roles.contains(role)
    }

    pub fn is_admin(&self) -> bool {
        self.has_role(ROLE_ADMIN)
    }
}

/// Account record returned by the identity provider.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UserAccount {
    pub username: String,
    pub user_id: Option<String>,
    pub credential_hash: String,
    pub roles: Vec<String>,
    pub enabled: bool,
    pub account_non_expired: bool,
    pub account_non_locked: bool,
    pub credentials_non_expired: bool,
}

impl UserAccount {
    /// Enabled, not locked, and neither the account nor its credentials expired.
    pub fn is_usable(&self) -> bool {
        self.enabled
            && self.account_non_expired
            && self.account_non_locked
            && self.credentials_non_expired
    }
}

/// Failures of a downstream lookup (identity or resource).
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum LookupError {
    #[error("not found")]
    NotFound,
    #[error("transport error: {0}")]
    Transport(String),
    #[error("malformed record: {0}")]
    Malformed(String),
}

#[async_trait]
pub trait IdentityLookup: Send + Sync {
    async fn lookup_by_username(&self, username: &str) -> Result<UserAccount, LookupError>;
}
