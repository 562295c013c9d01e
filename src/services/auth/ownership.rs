//! Ownership resolution across downstream services.
//!
//! Each resource type has one fixed chain of lookups ending at a user id:
//!
//! | type        | chain                                              |
//! |-------------|----------------------------------------------------|
//! | credentials | credential(id).userId                              |
//! | addresses   | address(id).userId                                 |
//! | carts       | cart(id).userId                                    |
//! | orders      | order(id).cartId → cart.userId                     |
//! | payments    | payment(id).orderId → order.cartId → cart.userId   |
//! | favourites  | the key `{userId}/{productId}` names its owner     |
//!
//! Hops run one after another. Any failing hop (not found, transport,
//! missing foreign key) makes the whole chain unresolvable. Nothing is cached
//! or retried; every call walks the chain again.
use std::fmt;
use std::sync::Arc;

use async_trait::async_trait;

use crate::services::auth::identity::LookupError;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ResourceType {
    Credentials,
    Addresses,
    Carts,
    Orders,
    Payments,
    Favourites,
}

impl ResourceType {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Credentials => "credentials",
            Self::Addresses => "addresses",
            Self::Carts => "carts",
            Self::Orders => "orders",
            Self::Payments => "payments",
            Self::Favourites => "favourites",
        }
    }
}

impl fmt::Display for ResourceType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResourceReference {
    pub resource_type: ResourceType,
    pub resource_id: String,
}

impl ResourceReference {
    pub fn new(resource_type: ResourceType, resource_id: impl Into<String>) -> Self {
        Self {
            resource_type,
            resource_id: resource_id.into(),
        }
    }

    /// Favourites are keyed by `(userId, productId)`.
    pub fn favourite(user_id: &str, product_id: &str) -> Self {
        Self::new(ResourceType::Favourites, format!("{user_id}/{product_id}"))
    }
}

/// Result of walking an ownership chain.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Ownership {
    Owned(String),
    Unresolvable,
}

impl Ownership {
    pub fn owner(&self) -> Option<&str> {
        match self {
            Self::Owned(id) => Some(id),
            Self::Unresolvable => None,
        }
    }
}

/// A record whose owner is stored on it directly.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OwnedRecord {
    pub id: String,
    pub user_id: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OrderRecord {
    pub id: String,
    pub cart_id: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PaymentRecord {
    pub id: String,
    pub order_id: Option<String>,
}

/// Downstream lookups, one per hop kind.
#[async_trait]
pub trait ResourceLookup: Send + Sync {
    async fn credential(&self, id: &str) -> Result<OwnedRecord, LookupError>;
    async fn address(&self, id: &str) -> Result<OwnedRecord, LookupError>;
    async fn cart(&self, id: &str) -> Result<OwnedRecord, LookupError>;
    async fn order(&self, id: &str) -> Result<OrderRecord, LookupError>;
    async fn payment(&self, id: &str) -> Result<PaymentRecord, LookupError>;
}

#[derive(Debug)]
struct HopFailure {
    hop: &'static str,
    key: String,
    error: LookupError,
}

fn hop<T>(hop: &'static str, key: &str, result: Result<T, LookupError>) -> Result<T, HopFailure> {
    result.map_err(|error| HopFailure {
        hop,
        key: key.to_string(),
        error,
    })
}

fn require(
    hop: &'static str,
    key: &str,
    field: &'static str,
    value: Option<String>,
) -> Result<String, HopFailure> {
    match value {
        Some(v) if !v.trim().is_empty() => Ok(v),
        _ => Err(HopFailure {
            hop,
            key: key.to_string(),
            error: LookupError::Malformed(format!("missing '{field}'")),
        }),
    }
}

#[derive(Clone)]
pub struct OwnershipResolver {
    lookups: Arc<dyn ResourceLookup>,
}

impl fmt::Debug for OwnershipResolver {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("OwnershipResolver").finish_non_exhaustive()
    }
}

impl OwnershipResolver {
    pub fn new(lookups: Arc<dyn ResourceLookup>) -> Self {
        Self { lookups }
    }

    pub async fn resolve(&self, reference: &ResourceReference) -> Ownership {
        match self.walk(reference).await {
            Ok(owner) => Ownership::Owned(owner),
            Err(failure) => {
                tracing::warn!(
                    resource_type = %reference.resource_type,
                    resource_id = %reference.resource_id,
                    hop = failure.hop,
                    key = %failure.key,
                    error = %failure.error,
                    "ownership chain broken"
                );
                Ownership::Unresolvable
            }
        }
    }

    async fn walk(&self, reference: &ResourceReference) -> Result<String, HopFailure> {
        let id = reference.resource_id.as_str();
        if id.trim().is_empty() {
            return Err(HopFailure {
                hop: reference.resource_type.as_str(),
                key: String::new(),
                error: LookupError::Malformed("empty resource id".into()),
            });
        }

        match reference.resource_type {
            ResourceType::Credentials => {
                let credential = hop("credential", id, self.lookups.credential(id).await)?;
                require("credential", id, "userId", credential.user_id)
            }
            ResourceType::Addresses => {
                let address = hop("address", id, self.lookups.address(id).await)?;
                require("address", id, "userId", address.user_id)
            }
            ResourceType::Carts => self.cart_owner(id).await,
            ResourceType::Orders => self.order_owner(id).await,
            ResourceType::Payments => {
                let payment = hop("payment", id, self.lookups.payment(id).await)?;
                let order_id = require("payment", id, "orderId", payment.order_id)?;
                self.order_owner(&order_id).await
            }
            ResourceType::Favourites => favourite_owner(id),
        }
    }

    async fn order_owner(&self, order_id: &str) -> Result<String, HopFailure> {
        let order = hop("order", order_id, self.lookups.order(order_id).await)?;
        let cart_id = require("order", order_id, "cartId", order.cart_id)?;
        self.cart_owner(&cart_id).await
    }

    async fn cart_owner(&self, cart_id: &str) -> Result<String, HopFailure> {
        let cart = hop("cart", cart_id, self.lookups.cart(cart_id).await)?;
        require("cart", cart_id, "userId", cart.user_id)
    }
}

fn favourite_owner(key: &str) -> Result<String, HopFailure> {
    let owner = key
        .split_once('/')
        .filter(|(_, product)| !product.trim().is_empty())
        .map(|(user, _)| user.to_string());
    require("favourite", key, "userId", owner)
}
