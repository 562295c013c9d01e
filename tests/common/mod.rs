//! Gateway wired against a wiremock backend standing in for every service.
#![allow(dead_code)]

use std::collections::HashMap;

use axum::{
    Router,
    body::Body,
    http::{Request, StatusCode, header},
};
use http_body_util::BodyExt;
use serde::Serialize;
use serde_json::{Value, json};
use tower::ServiceExt;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

use storefront_gateway::app::{build_router, build_state};
use storefront_gateway::config::Config;
use storefront_gateway::services::auth::password::hash_password;
use storefront_gateway::services::auth::{Identity, TokenService};
use storefront_gateway::state::AppState;

pub const SECRET: &str = "integration-signing-secret";
pub const SALT: &str = "c29tZXNhbHRzb21lc2FsdA";

pub struct Gateway {
    pub backend: MockServer,
    pub state: AppState,
    pub router: Router,
}

impl Gateway {
    pub async fn start() -> Self {
        let backend = MockServer::start().await;
        let base = backend.uri();

        let mut env: HashMap<&str, String> = HashMap::new();
        env.insert("JWT_SECRET", SECRET.to_string());
        env.insert("DOWNSTREAM_TIMEOUT_SECONDS", "2".to_string());
        for key in [
            "USER_SERVICE_URL",
            "ORDER_SERVICE_URL",
            "PAYMENT_SERVICE_URL",
            "FAVOURITE_SERVICE_URL",
            "PRODUCT_SERVICE_URL",
            "SHIPPING_SERVICE_URL",
        ] {
            env.insert(key, base.clone());
        }

        let config = Config::from_source(|key| env.get(key).cloned()).unwrap();
        let state = build_state(&config).unwrap();
        let router = build_router(state.clone(), &config);

        Self {
            backend,
            state,
            router,
        }
    }

    /// Register an account with the user service (what the authenticate step reads).
    pub async fn account(&self, username: &str, user_id: i64, role: &str, password: &str) {
        self.get_json(
            &format!("/api/credentials/username/{username}"),
            &credential(username, user_id, role, password),
        )
        .await;
    }

    pub async fn get_json<T: Serialize>(&self, endpoint: &str, body: &T) {
        Mock::given(method("GET"))
            .and(path(endpoint))
            .respond_with(ResponseTemplate::new(200).set_body_json(body))
            .mount(&self.backend)
            .await;
    }

    pub async fn respond(&self, verb: &str, endpoint: &str, template: ResponseTemplate) {
        Mock::given(method(verb))
            .and(path(endpoint))
            .respond_with(template)
            .mount(&self.backend)
            .await;
    }

    /// A token for `username`/`user_id`, signed with the gateway's secret.
    pub fn token(&self, username: &str, user_id: &str, role: &str) -> String {
        self.state
            .tokens
            .issue(&Identity::new(user_id, username, [role]))
            .unwrap()
            .into_string()
    }

    pub async fn send(&self, req: Request<Body>) -> (StatusCode, Value) {
        let res = self.router.clone().oneshot(req).await.unwrap();
        let status = res.status();
        let bytes = res.into_body().collect().await.unwrap().to_bytes();
        let body = if bytes.is_empty() {
            Value::Null
        } else {
            serde_json::from_slice(&bytes).unwrap_or(Value::Null)
        };
        (status, body)
    }

    /// How many requests the backend saw for `endpoint` with `verb`.
    pub async fn received(&self, verb: &str, endpoint: &str) -> usize {
        self.backend
            .received_requests()
            .await
            .unwrap_or_default()
            .iter()
            .filter(|r| r.method.as_str() == verb && r.url.path() == endpoint)
            .count()
    }
}

pub fn credential(username: &str, user_id: i64, role: &str, password: &str) -> Value {
    json!({
        "credentialId": user_id,
        "username": username,
        "password": hash_password(password, SALT).unwrap(),
        "roleBasedAuthority": role,
        "isEnabled": true,
        "isAccountNonExpired": true,
        "isAccountNonLocked": true,
        "isCredentialsNonExpired": true,
        "user": {"userId": user_id}
    })
}

pub fn get(uri: &str, token: Option<&str>) -> Request<Body> {
    request("GET", uri, token, None)
}

pub fn request(verb: &str, uri: &str, token: Option<&str>, body: Option<Value>) -> Request<Body> {
    let mut builder = Request::builder().method(verb).uri(uri);
    if let Some(token) = token {
        builder = builder.header(header::AUTHORIZATION, format!("Bearer {token}"));
    }
    match body {
        Some(body) => builder
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(body.to_string()))
            .unwrap(),
        None => builder.body(Body::empty()).unwrap(),
    }
}

/// Same identity, signed by a stranger.
pub fn foreign_token(username: &str, user_id: &str, role: &str) -> String {
    TokenService::new("someone-elses-secret", chrono::Duration::hours(1), 0)
        .issue(&Identity::new(user_id, username, [role]))
        .unwrap()
        .into_string()
}
