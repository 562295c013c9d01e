//! Identity and ownership lookups backed by the backend services.
use async_trait::async_trait;

use crate::services::auth::identity::{IdentityLookup, LookupError, UserAccount};
use crate::services::auth::ownership::{OrderRecord, OwnedRecord, PaymentRecord, ResourceLookup};
use crate::services::downstream::client::{DownstreamClient, Service};
use crate::services::downstream::records::{
    AddressDocument, CartDocument, CredentialDocument, OrderDocument, PaymentDocument,
};

#[derive(Debug, Clone)]
pub struct HttpLookups {
    client: DownstreamClient,
}

impl HttpLookups {
    pub fn new(client: DownstreamClient) -> Self {
        Self { client }
    }
}

#[async_trait]
impl IdentityLookup for HttpLookups {
    async fn lookup_by_username(&self, username: &str) -> Result<UserAccount, LookupError> {
        let doc: CredentialDocument = self
            .client
            .get_json(Service::User, &["api", "credentials", "username", username])
            .await?;

        let user_id = doc.owner_id();
        let username = doc
            .username
            .filter(|u| !u.is_empty())
            .ok_or_else(|| LookupError::Malformed("credential without username".into()))?;

        // Missing flags count as "not ok".
        Ok(UserAccount {
            username,
            user_id,
            credential_hash: doc.password.unwrap_or_default(),
            roles: doc.role_based_authority.into_iter().collect(),
            enabled: doc.is_enabled.unwrap_or(false),
            account_non_expired: doc.is_account_non_expired.unwrap_or(false),
            account_non_locked: doc.is_account_non_locked.unwrap_or(false),
            credentials_non_expired: doc.is_credentials_non_expired.unwrap_or(false),
        })
    }
}

#[async_trait]
impl ResourceLookup for HttpLookups {
    async fn credential(&self, id: &str) -> Result<OwnedRecord, LookupError> {
        let doc: CredentialDocument = self
            .client
            .get_json(Service::User, &["api", "credentials", id])
            .await?;
        Ok(OwnedRecord {
            id: id.to_string(),
            user_id: doc.owner_id(),
        })
    }

    async fn address(&self, id: &str) -> Result<OwnedRecord, LookupError> {
        let doc: AddressDocument = self
            .client
            .get_json(Service::User, &["api", "address", id])
            .await?;
        Ok(OwnedRecord {
            id: id.to_string(),
            user_id: doc.owner_id(),
        })
    }

    async fn cart(&self, id: &str) -> Result<OwnedRecord, LookupError> {
        let doc: CartDocument = self
            .client
            .get_json(Service::Order, &["api", "carts", id])
            .await?;
        Ok(OwnedRecord {
            id: id.to_string(),
            user_id: doc.owner_id(),
        })
    }

    async fn order(&self, id: &str) -> Result<OrderRecord, LookupError> {
        let doc: OrderDocument = self
            .client
            .get_json(Service::Order, &["api", "orders", id])
            .await?;
        Ok(OrderRecord {
            id: id.to_string(),
            cart_id: doc.cart_id(),
        })
    }

    async fn payment(&self, id: &str) -> Result<PaymentRecord, LookupError> {
        let doc: PaymentDocument = self
            .client
            .get_json(Service::Payment, &["api", "payments", id])
            .await?;
        Ok(PaymentRecord {
            id: id.to_string(),
            order_id: doc.order_id(),
        })
    }
}
