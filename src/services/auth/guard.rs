//! Final allow/deny decision for a single resource.
//!
//! Handlers call this only after the route-level role policy has passed.
use crate::services::auth::error::AuthError;
use crate::services::auth::identity::Identity;
use crate::services::auth::ownership::{Ownership, OwnershipResolver, ResourceReference};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DecisionReason {
    AdminOverride,
    Owner,
    OwnershipDenied,
    OwnershipUnresolvable,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AuthorizationDecision {
    pub allowed: bool,
    pub reason: DecisionReason,
}

impl AuthorizationDecision {
    fn allow(reason: DecisionReason) -> Self {
        Self {
            allowed: true,
            reason,
        }
    }

    fn deny(reason: DecisionReason) -> Self {
        Self {
            allowed: false,
            reason,
        }
    }

    pub fn into_result(self) -> Result<(), AuthError> {
        match self.reason {
            DecisionReason::AdminOverride | DecisionReason::Owner => Ok(()),
            DecisionReason::OwnershipDenied => Err(AuthError::OwnershipDenied),
            DecisionReason::OwnershipUnresolvable => Err(AuthError::OwnershipUnresolvable),
        }
    }
}

#[derive(Debug, Clone)]
pub struct AccessGuard {
    resolver: OwnershipResolver,
}

impl AccessGuard {
    pub fn new(resolver: OwnershipResolver) -> Self {
        Self { resolver }
    }

    pub fn can_access(&self, identity: &Identity, target: &Ownership) -> AuthorizationDecision {
        if identity.is_admin() {
            return AuthorizationDecision::allow(DecisionReason::AdminOverride);
        }

        match target {
            Ownership::Unresolvable => {
                tracing::warn!(
                    username = %identity.username,
                    "owner unresolvable, denying access"
                );
                AuthorizationDecision::deny(DecisionReason::OwnershipUnresolvable)
            }
            Ownership::Owned(owner)
                if !identity.subject_user_id.is_empty() && *owner == identity.subject_user_id =>
            {
                AuthorizationDecision::allow(DecisionReason::Owner)
            }
            Ownership::Owned(owner) => {
                tracing::info!(
                    username = %identity.username,
                    user_id = %identity.subject_user_id,
                    owner = %owner,
                    "access to another user's resource denied"
                );
                AuthorizationDecision::deny(DecisionReason::OwnershipDenied)
            }
        }
    }

    /// Resolve the owner of `reference`, then decide.
    pub async fn authorize(
        &self,
        identity: &Identity,
        reference: &ResourceReference,
    ) -> AuthorizationDecision {
        let owner = self.resolver.resolve(reference).await;
        self.can_access(identity, &owner)
    }
}
