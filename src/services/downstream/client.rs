//! HTTP client for the backend services behind the gateway.
use std::fmt;
use std::time::Duration;

use axum::body::Bytes;
use axum::http::{HeaderValue, Method, StatusCode, header};
use serde::de::DeserializeOwned;
use thiserror::Error;
use url::Url;

use crate::services::auth::identity::LookupError;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Service {
    User,
    Order,
    Payment,
    Favourite,
    Product,
    Shipping,
}

impl fmt::Display for Service {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Service::User => "user-service",
            Service::Order => "order-service",
            Service::Payment => "payment-service",
            Service::Favourite => "favourite-service",
            Service::Product => "product-service",
            Service::Shipping => "shipping-service",
        };
        f.write_str(name)
    }
}

/// Base address of each backend service.
#[derive(Debug, Clone)]
pub struct ServiceUrls {
    pub user: Url,
    pub order: Url,
    pub payment: Url,
    pub favourite: Url,
    pub product: Url,
    pub shipping: Url,
}

impl ServiceUrls {
    /// Every service behind one address (tests, single-host setups).
    pub fn single(base: Url) -> Self {
        Self {
            user: base.clone(),
            order: base.clone(),
            payment: base.clone(),
            favourite: base.clone(),
            product: base.clone(),
            shipping: base,
        }
    }

    pub fn base(&self, service: Service) -> &Url {
        match service {
            Service::User => &self.user,
            Service::Order => &self.order,
            Service::Payment => &self.payment,
            Service::Favourite => &self.favourite,
            Service::Product => &self.product,
            Service::Shipping => &self.shipping,
        }
    }
}

#[derive(Debug, Error)]
pub enum DownstreamError {
    #[error("not found")]
    NotFound,
    #[error("unexpected status {0}")]
    Status(StatusCode),
    #[error("transport error: {0}")]
    Transport(String),
    #[error("invalid response body: {0}")]
    Decode(String),
    #[error("invalid url: {0}")]
    Url(String),
}

impl From<reqwest::Error> for DownstreamError {
    fn from(e: reqwest::Error) -> Self {
        if e.is_decode() {
            Self::Decode(e.to_string())
        } else {
            Self::Transport(e.to_string())
        }
    }
}

impl From<DownstreamError> for LookupError {
    fn from(e: DownstreamError) -> Self {
        match e {
            DownstreamError::NotFound => LookupError::NotFound,
            DownstreamError::Decode(msg) => LookupError::Malformed(msg),
            other => LookupError::Transport(other.to_string()),
        }
    }
}

/// A downstream response, relayed to the caller as is.
#[derive(Debug)]
pub struct ForwardedResponse {
    pub status: StatusCode,
    pub content_type: Option<HeaderValue>,
    pub body: Bytes,
}

#[derive(Debug, Clone)]
pub struct DownstreamClient {
    http: reqwest::Client,
    urls: ServiceUrls,
}

impl DownstreamClient {
    pub fn new(urls: ServiceUrls, timeout: Duration) -> Result<Self, DownstreamError> {
        let http = reqwest::Client::builder().timeout(timeout).build()?;
        Ok(Self { http, urls })
    }

    /// `{base}/{segments...}`, each segment percent-encoded.
    fn resource_url(&self, service: Service, segments: &[&str]) -> Result<Url, DownstreamError> {
        let mut url = self.urls.base(service).clone();
        url.path_segments_mut()
            .map_err(|_| DownstreamError::Url(format!("{service} base cannot hold a path")))?
            .pop_if_empty()
            .extend(segments);
        Ok(url)
    }

    /// GET a JSON document. 404 is `NotFound`, any other non-2xx is `Status`.
    pub async fn get_json<T: DeserializeOwned>(
        &self,
        service: Service,
        segments: &[&str],
    ) -> Result<T, DownstreamError> {
        let url = self.resource_url(service, segments)?;
        let res = self.http.get(url).send().await?;

        match res.status() {
            StatusCode::NOT_FOUND => Err(DownstreamError::NotFound),
            s if s.is_success() => Ok(res.json::<T>().await?),
            s => Err(DownstreamError::Status(s)),
        }
    }

    /// Relay a request to `service` under the same path and query.
    pub async fn forward(
        &self,
        service: Service,
        method: Method,
        path_and_query: &str,
        content_type: Option<HeaderValue>,
        body: Bytes,
    ) -> Result<ForwardedResponse, DownstreamError> {
        let base = self.urls.base(service).as_str().trim_end_matches('/');
        let url = format!("{base}{path_and_query}");

        let mut req = self.http.request(method, url);
        if let Some(ct) = content_type {
            req = req.header(header::CONTENT_TYPE, ct);
        }
        if !body.is_empty() {
            req = req.body(body);
        }

        let res = req.send().await?;
        let status = res.status();
        let content_type = res.headers().get(header::CONTENT_TYPE).cloned();
        let body = res.bytes().await?;

        Ok(ForwardedResponse {
            status,
            content_type,
            body,
        })
    }
}
