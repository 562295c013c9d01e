/*
 * Responsibility
 * - 環境変数の読み込み (signing secret, token lifetime, downstream service URLs)
 * - 設定値のバリデーション (不足・不正なら起動失敗)
 */
use std::net::SocketAddr;
use std::ops::RangeInclusive;
use std::str::FromStr;
use std::time::Duration;

use thiserror::Error;
use url::Url;

use crate::services::downstream::ServiceUrls;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AppEnv {
    Development,
    Production,
}

impl AppEnv {
    fn parse(value: Option<String>) -> Self {
        match value
            .unwrap_or_else(|| "development".to_string())
            .to_ascii_lowercase()
            .as_str()
        {
            "production" | "prod" => Self::Production,
            _ => Self::Development,
        }
    }

    pub fn is_production(&self) -> bool {
        matches!(self, Self::Production)
    }
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error("missing configuration: {0}")]
    Missing(&'static str),
    #[error("invalid configuration: {0}")]
    Invalid(&'static str),
}

const MAX_TOKEN_LIFETIME_SECONDS: i64 = 30 * 24 * 60 * 60;
const MAX_TOKEN_LEEWAY_SECONDS: u64 = 300;
const MAX_DOWNSTREAM_TIMEOUT_SECONDS: u64 = 120;

/// `key` as a number inside `range`; `default` when unset.
fn bounded<F, T>(
    get: &F,
    key: &'static str,
    default: T,
    range: RangeInclusive<T>,
) -> Result<T, ConfigError>
where
    F: Fn(&str) -> Option<String>,
    T: FromStr + PartialOrd,
{
    let value = match get(key) {
        Some(v) => v.trim().parse::<T>().map_err(|_| ConfigError::Invalid(key))?,
        None => default,
    };
    if !range.contains(&value) {
        return Err(ConfigError::Invalid(key));
    }
    Ok(value)
}

#[derive(Clone, Debug)]
pub struct Config {
    pub addr: SocketAddr,
    pub app_env: AppEnv,

    pub jwt_secret: String,
    pub token_lifetime_seconds: i64,
    pub token_leeway_seconds: u64,

    pub downstream_timeout: Duration,
    pub services: ServiceUrls,
}

impl Config {
    pub fn from_env() -> Result<Self, ConfigError> {
        dotenvy::dotenv().ok();
        Self::from_source(|key| std::env::var(key).ok())
    }

    /// Build from any key reader (the process environment in production).
    pub fn from_source<F>(get: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let port: u16 = match get("PORT") {
            Some(v) => v.parse().map_err(|_| ConfigError::Invalid("PORT"))?,
            None => 8080,
        };
        let addr = SocketAddr::from_str(&format!("0.0.0.0:{}", port))
            .map_err(|_| ConfigError::Invalid("PORT"))?;

        let app_env = AppEnv::parse(get("APP_ENV"));

        let jwt_secret = get("JWT_SECRET")
            .filter(|s| !s.is_empty())
            .ok_or(ConfigError::Missing("JWT_SECRET"))?;

        let token_lifetime_seconds = bounded(
            &get,
            "TOKEN_LIFETIME_SECONDS",
            36_000, // 10 hours
            1..=MAX_TOKEN_LIFETIME_SECONDS,
        )?;
        let token_leeway_seconds =
            bounded(&get, "TOKEN_LEEWAY_SECONDS", 0, 0..=MAX_TOKEN_LEEWAY_SECONDS)?;
        let downstream_timeout_seconds = bounded(
            &get,
            "DOWNSTREAM_TIMEOUT_SECONDS",
            10,
            1..=MAX_DOWNSTREAM_TIMEOUT_SECONDS,
        )?;

        let url = |key: &'static str| -> Result<Url, ConfigError> {
            let raw = get(key).ok_or(ConfigError::Missing(key))?;
            let url = Url::parse(raw.trim()).map_err(|_| ConfigError::Invalid(key))?;
            if url.cannot_be_a_base() {
                return Err(ConfigError::Invalid(key));
            }
            Ok(url)
        };

        let services = ServiceUrls {
            user: url("USER_SERVICE_URL")?,
            order: url("ORDER_SERVICE_URL")?,
            payment: url("PAYMENT_SERVICE_URL")?,
            favourite: url("FAVOURITE_SERVICE_URL")?,
            product: url("PRODUCT_SERVICE_URL")?,
            shipping: url("SHIPPING_SERVICE_URL")?,
        };

        Ok(Self {
            addr,
            app_env,
            jwt_secret,
            token_lifetime_seconds,
            token_leeway_seconds,
            downstream_timeout: Duration::from_secs(downstream_timeout_seconds),
            services,
        })
    }
}
