//! JSON documents exchanged with the backend services.
//!
//! Only the fields the gateway reads are declared. Ids are numeric in the
//! backends but accepted as strings too; nested references accept both the
//! short (`user`) and the `…Dto` spelling.
use serde::Deserialize;

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(untagged)]
pub enum RawId {
    Number(i64),
    Text(String),
}

impl RawId {
    pub fn into_string(self) -> String {
        match self {
            RawId::Number(n) => n.to_string(),
            RawId::Text(s) => s,
        }
    }
}

fn id(raw: Option<RawId>) -> Option<String> {
    raw.map(RawId::into_string)
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserRef {
    pub user_id: Option<RawId>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CartRef {
    pub cart_id: Option<RawId>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OrderRef {
    pub order_id: Option<RawId>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CredentialRef {
    pub credential_id: Option<RawId>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CredentialDocument {
    pub credential_id: Option<RawId>,
    pub username: Option<String>,
    pub password: Option<String>,
    pub role_based_authority: Option<String>,
    pub is_enabled: Option<bool>,
    pub is_account_non_expired: Option<bool>,
    pub is_account_non_locked: Option<bool>,
    pub is_credentials_non_expired: Option<bool>,
    #[serde(alias = "userDto")]
    pub user: Option<UserRef>,
}

impl CredentialDocument {
    pub fn owner_id(&self) -> Option<String> {
        self.user.clone().and_then(|u| id(u.user_id))
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AddressDocument {
    pub address_id: Option<RawId>,
    #[serde(alias = "userDto")]
    pub user: Option<UserRef>,
}

impl AddressDocument {
    pub fn owner_id(&self) -> Option<String> {
        self.user.clone().and_then(|u| id(u.user_id))
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CartDocument {
    pub cart_id: Option<RawId>,
    pub user_id: Option<RawId>,
    #[serde(alias = "userDto")]
    pub user: Option<UserRef>,
}

impl CartDocument {
    /// Top-level `userId` first, then `user.userId`.
    pub fn owner_id(&self) -> Option<String> {
        id(self.user_id.clone()).or_else(|| self.user.clone().and_then(|u| id(u.user_id)))
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OrderDocument {
    pub order_id: Option<RawId>,
    #[serde(alias = "cartDto")]
    pub cart: Option<CartRef>,
}

impl OrderDocument {
    pub fn cart_id(&self) -> Option<String> {
        self.cart.clone().and_then(|c| id(c.cart_id))
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PaymentDocument {
    pub payment_id: Option<RawId>,
    #[serde(alias = "orderDto")]
    pub order: Option<OrderRef>,
}

impl PaymentDocument {
    pub fn order_id(&self) -> Option<String> {
        self.order.clone().and_then(|o| id(o.order_id))
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FavouriteDocument {
    pub user_id: Option<RawId>,
    pub product_id: Option<RawId>,
}

impl FavouriteDocument {
    pub fn owner_id(&self) -> Option<String> {
        id(self.user_id.clone())
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VerificationTokenDocument {
    pub verification_token_id: Option<RawId>,
    #[serde(alias = "credentialDto")]
    pub credential: Option<CredentialRef>,
}

impl VerificationTokenDocument {
    pub fn credential_id(&self) -> Option<String> {
        self.credential.clone().and_then(|c| id(c.credential_id))
    }
}

/// Shipping line (order item).
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ShippingDocument {
    pub order_id: Option<RawId>,
    pub product_id: Option<RawId>,
}

impl ShippingDocument {
    pub fn order_id(&self) -> Option<String> {
        id(self.order_id.clone())
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    #[test]
    fn numeric_and_string_ids_read_the_same() {
        let numeric: CartDocument = serde_json::from_value(json!({"cartId": 3, "userId": 5})).unwrap();
        let text: CartDocument = serde_json::from_value(json!({"cartId": "3", "userId": "5"})).unwrap();

        assert_eq!(numeric.owner_id().as_deref(), Some("5"));
        assert_eq!(text.owner_id().as_deref(), Some("5"));
    }

    #[test]
    fn cart_owner_falls_back_to_nested_user() {
        let doc: CartDocument =
            serde_json::from_value(json!({"cartId": 3, "user": {"userId": 42}})).unwrap();

        assert_eq!(doc.owner_id().as_deref(), Some("42"));
    }

    #[test]
    fn dto_spelling_is_accepted() {
        let payment: PaymentDocument =
            serde_json::from_value(json!({"paymentId": 12, "orderDto": {"orderId": 7}})).unwrap();
        let order: OrderDocument =
            serde_json::from_value(json!({"orderId": 7, "cartDto": {"cartId": 3}})).unwrap();

        assert_eq!(payment.order_id().as_deref(), Some("7"));
        assert_eq!(order.cart_id().as_deref(), Some("3"));

        let token: VerificationTokenDocument = serde_json::from_value(
            json!({"token": "abc", "credentialDto": {"credentialId": 2}}),
        )
        .unwrap();
        assert_eq!(token.credential_id().as_deref(), Some("2"));
    }

    #[test]
    fn null_reference_has_no_owner() {
        let doc: AddressDocument =
            serde_json::from_value(json!({"addressId": 2, "user": null})).unwrap();

        assert_eq!(doc.owner_id(), None);
    }
}
