pub mod error;
pub mod guard;
pub mod identity;
pub mod login;
pub mod ownership;
pub mod password;
pub mod policy;
pub mod token;

pub use error::AuthError;
pub use guard::{AccessGuard, AuthorizationDecision, DecisionReason};
pub use identity::{Identity, IdentityLookup, LookupError, UserAccount};
pub use ownership::{Ownership, OwnershipResolver, ResourceLookup, ResourceReference, ResourceType};
pub use policy::{PolicyVerdict, RolePolicy, RouteRule};
pub use token::{Claims, Token, TokenError, TokenService};
