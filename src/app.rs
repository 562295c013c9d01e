/*
 * Responsibility
 * - Config読み込み → 依存生成 (TokenService / downstream client / guard) → Router 組み立て
 * - Middleware の適用順: http (最外) → authenticate → role policy → handler
 * - axum::serve() で起動
 */
use std::{panic, process, sync::Arc};

use anyhow::{Context, Result};
use axum::{Router, routing::get};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use crate::api;
use crate::api::handlers::health::health;
use crate::config::Config;
use crate::middleware::{auth, http};
use crate::services::auth::{AccessGuard, OwnershipResolver, RolePolicy, TokenService};
use crate::services::downstream::{DownstreamClient, HttpLookups};
use crate::state::AppState;

fn init_tracing() {
    // RUST_LOG があればそちらを優先
    // ex) RUST_LOG=info,storefront_gateway=debug,tower_http=debug cargo run
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info,tower_http=info"));

    tracing_subscriber::registry()
        .with(filter)
        .with(tracing_subscriber::fmt::layer())
        .init();
}

fn init_panic_hook(abort_on_panic: bool) {
    let default_hook = panic::take_hook();

    panic::set_hook(Box::new(move |info| {
        // stderr は起動方法によっては見えないので tracing にも必ず出す
        tracing::error!(?info, "panic");

        // development は即落として気づけるようにする
        if abort_on_panic {
            process::abort();
        } else {
            default_hook(info);
        }
    }))
}

pub async fn run() -> Result<()> {
    init_tracing();
    let config = Config::from_env().context("failed to load configuration")?;

    init_panic_hook(!config.app_env.is_production());

    tracing::info!(
        "starting gateway in {:?} mode on {}",
        config.app_env,
        config.addr
    );

    let state = build_state(&config)?;
    let app = build_router(state, &config);

    let listener = tokio::net::TcpListener::bind(config.addr)
        .await
        .with_context(|| format!("failed to bind {}", config.addr))?;
    axum::serve(listener, app).await?;
    Ok(())
}

/// プロセス単位のサービスを一度だけ組み立てて AppState に詰める
pub fn build_state(config: &Config) -> Result<AppState> {
    let tokens = TokenService::new(
        &config.jwt_secret,
        chrono::Duration::seconds(config.token_lifetime_seconds),
        config.token_leeway_seconds,
    );

    let downstream = DownstreamClient::new(config.services.clone(), config.downstream_timeout)
        .context("failed to build downstream http client")?;

    // identity も ownership も同じ backend 群から引く
    let lookups = Arc::new(HttpLookups::new(downstream.clone()));
    let guard = AccessGuard::new(OwnershipResolver::new(lookups.clone()));

    Ok(AppState::new(
        Arc::new(tokens),
        lookups,
        Arc::new(RolePolicy::gateway_default()),
        Arc::new(guard),
        Arc::new(downstream),
    ))
}

pub fn build_router(state: AppState, config: &Config) -> Router {
    let router = Router::new()
        .route("/health", get(health))
        .nest("/api", api::routes());

    // 後から layer したものが外側。authenticate → policy → handler の順に通る
    let router = auth::policy::apply(router, state.clone());
    let router = auth::authenticate::apply(router, state.clone());

    http::apply(
        router.with_state(state),
        http::request_timeout(config.downstream_timeout),
    )
}
