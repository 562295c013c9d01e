//! Route-level role policy.
//!
//! An ordered list of rules evaluated top-to-bottom; the first rule whose
//! method and path pattern match decides. Paths no rule matches are denied.
//!
//! Patterns are ant-style over `/`-separated segments:
//! - `*` matches exactly one segment
//! - `**` matches zero or more segments
use std::collections::BTreeSet;

use axum::http::Method;

use crate::services::auth::identity::{Identity, ROLE_ADMIN, ROLE_USER};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RouteRule {
    /// `None` matches any method.
    pub method: Option<Method>,
    pub pattern: String,
    pub required_roles: BTreeSet<String>,
    pub public: bool,
}

impl RouteRule {
    pub fn public(method: Option<Method>, pattern: &str) -> Self {
        Self {
            method,
            pattern: pattern.to_string(),
            required_roles: BTreeSet::new(),
            public: true,
        }
    }

    pub fn roles(method: Option<Method>, pattern: &str, roles: &[&str]) -> Self {
        Self {
            method,
            pattern: pattern.to_string(),
            required_roles: roles.iter().map(|r| r.to_string()).collect(),
            public: false,
        }
    }

    pub fn matches(&self, method: &Method, path: &str) -> bool {
        if let Some(m) = &self.method {
            if m != method {
                return false;
            }
        }
        pattern_matches(&self.pattern, path)
    }

    fn admits(&self, identity: &Identity) -> bool {
        self.public || self.required_roles.iter().any(|r| identity.has_role(r))
    }
}

/// Outcome of a policy check.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PolicyVerdict {
    Public,
    Granted,
    Denied,
    /// No rule matched; treated as a denial.
    Unmatched,
}

impl PolicyVerdict {
    pub fn is_allowed(&self) -> bool {
        matches!(self, Self::Public | Self::Granted)
    }
}

#[derive(Debug, Clone, Default)]
pub struct RolePolicy {
    rules: Vec<RouteRule>,
}

impl RolePolicy {
    pub fn new(rules: Vec<RouteRule>) -> Self {
        Self { rules }
    }

    pub fn rules(&self) -> &[RouteRule] {
        &self.rules
    }

    pub fn matching_rule(&self, method: &Method, path: &str) -> Option<&RouteRule> {
        self.rules.iter().find(|r| r.matches(method, path))
    }

    pub fn evaluate(&self, method: &Method, path: &str, identity: &Identity) -> PolicyVerdict {
        match self.matching_rule(method, path) {
            None => PolicyVerdict::Unmatched,
            Some(rule) if rule.public => PolicyVerdict::Public,
            Some(rule) if rule.admits(identity) => PolicyVerdict::Granted,
            Some(_) => PolicyVerdict::Denied,
        }
    }

    /// The gateway's route table. Specific patterns precede general ones.
    pub fn gateway_default() -> Self {
        use Method as M;

        const ADMIN: &[&str] = &[ROLE_ADMIN];
        const ANY_USER: &[&str] = &[ROLE_ADMIN, ROLE_USER];

        let public = RouteRule::public;
        let roles = RouteRule::roles;

        let mut rules = vec![
            public(Some(M::OPTIONS), "/**"),
            public(Some(M::GET), "/health"),
            public(None, "/api/authenticate/**"),
            // users
            public(Some(M::POST), "/api/users"),
            roles(Some(M::GET), "/api/users", ADMIN),
            roles(Some(M::GET), "/api/users/username/*", ADMIN),
            roles(Some(M::GET), "/api/users/*", ANY_USER),
            roles(Some(M::PUT), "/api/users/*", ANY_USER),
            roles(Some(M::DELETE), "/api/users/*", ANY_USER),
            // credentials
            roles(Some(M::GET), "/api/credentials", ADMIN),
            roles(Some(M::GET), "/api/credentials/username/*", ADMIN),
            roles(Some(M::GET), "/api/credentials/*", ANY_USER),
            roles(Some(M::POST), "/api/credentials", ANY_USER),
            roles(Some(M::DELETE), "/api/credentials/*", ANY_USER),
            // addresses
            roles(Some(M::GET), "/api/address", ADMIN),
            roles(Some(M::GET), "/api/address/*", ANY_USER),
            roles(Some(M::POST), "/api/address", ANY_USER),
            roles(Some(M::PUT), "/api/address/*", ANY_USER),
            roles(Some(M::DELETE), "/api/address/*", ANY_USER),
            // verification tokens: users may only create one for their own credential
            roles(Some(M::GET), "/api/verificationTokens", ADMIN),
            roles(Some(M::GET), "/api/verificationTokens/*", ADMIN),
            roles(Some(M::POST), "/api/verificationTokens", ANY_USER),
            roles(Some(M::PUT), "/api/verificationTokens/*", ADMIN),
            roles(Some(M::DELETE), "/api/verificationTokens/*", ADMIN),
        ];

        // catalog: browsing is public, edits are admin only
        for resource in ["/api/products", "/api/categories"] {
            let item = format!("{resource}/*");
            rules.extend([
                public(Some(M::GET), resource),
                public(Some(M::GET), &item),
                roles(Some(M::POST), resource, ADMIN),
                roles(Some(M::PUT), &item, ADMIN),
                roles(Some(M::DELETE), &item, ADMIN),
            ]);
        }

        rules.extend([
            // carts
            roles(Some(M::GET), "/api/carts", ADMIN),
            roles(Some(M::GET), "/api/carts/*", ANY_USER),
            roles(Some(M::POST), "/api/carts", ANY_USER),
            roles(Some(M::DELETE), "/api/carts/*", ANY_USER),
            // orders
            roles(Some(M::GET), "/api/orders", ADMIN),
            roles(Some(M::GET), "/api/orders/*", ANY_USER),
            roles(Some(M::POST), "/api/orders", ANY_USER),
            roles(Some(M::PATCH), "/api/orders/*/status", ADMIN),
            roles(Some(M::PUT), "/api/orders/*", ANY_USER),
            roles(Some(M::DELETE), "/api/orders/*", ANY_USER),
            // favourites
            roles(Some(M::GET), "/api/favourites", ADMIN),
            roles(Some(M::GET), "/api/favourites/*/*", ANY_USER),
            roles(Some(M::POST), "/api/favourites", ANY_USER),
            roles(Some(M::DELETE), "/api/favourites/*/*", ANY_USER),
            // payments
            roles(Some(M::GET), "/api/payments", ADMIN),
            roles(Some(M::GET), "/api/payments/*", ANY_USER),
            roles(Some(M::POST), "/api/payments", ANY_USER),
            roles(Some(M::PUT), "/api/payments/*", ADMIN),
            roles(Some(M::DELETE), "/api/payments/*", ANY_USER),
            // shippings
            roles(Some(M::GET), "/api/shippings", ADMIN),
            roles(Some(M::GET), "/api/shippings/*", ANY_USER),
            roles(Some(M::POST), "/api/shippings", ANY_USER),
            roles(Some(M::DELETE), "/api/shippings/*", ANY_USER),
            // fallback
            roles(None, "/api/**", ANY_USER),
        ]);

        Self::new(rules)
    }
}

pub fn pattern_matches(pattern: &str, path: &str) -> bool {
    let pattern: Vec<&str> = pattern.split('/').filter(|s| !s.is_empty()).collect();
    let path: Vec<&str> = path.split('/').filter(|s| !s.is_empty()).collect();
    segments_match(&pattern, &path)
}

fn segments_match(pattern: &[&str], path: &[&str]) -> bool {
    match (pattern.split_first(), path.split_first()) {
        (None, None) => true,
        (Some((&"**", rest)), _) => {
            segments_match(rest, path) || (!path.is_empty() && segments_match(pattern, &path[1..]))
        }
        (Some((p, p_rest)), Some((s, s_rest))) => {
            (*p == "*" || p == s) && segments_match(p_rest, s_rest)
        }
        _ => false,
    }
}
