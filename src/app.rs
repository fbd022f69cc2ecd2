/*
 * Responsibility
 * - Config読み込み → 依存生成 (契約, TokenVerifier, 下流サービス) → Router 組み立て
 * - Middleware の適用順: http → contract → auth → handler
 * - axum::serve() で起動
 */
use std::{panic, process, sync::Arc};

use anyhow::{Context, Result};
use axum::{Router, routing::get};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use crate::config::Config;
use crate::services::{
    auth::build_bearer_strategy, contract::ContractValidator, example::NoopExampleService,
};
use crate::state::AppState;
use crate::{api, middleware};

fn init_tracing() {
    // RUST_LOG=info,line_gateway=debug
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
        tracing::error!(?info, "panic");

        if abort_on_panic {
            process::abort();
        } else {
            default_hook(info);
        }
    }))
}

pub async fn run() -> Result<()> {
    init_tracing();
    let config = Config::from_env()?;

    init_panic_hook(!config.app_env.is_production());

    tracing::info!(
        "starting gateway in {:?} mode on {}",
        config.app_env,
        config.addr
    );

    let state = build_state(&config)?;
    let app = build_router(state);

    let listener = tokio::net::TcpListener::bind(config.addr)
        .await
        .with_context(|| format!("failed to bind {}", config.addr))?;
    tracing::info!("Started on port {}.", config.addr.port());

    axum::serve(listener, app).await?;
    Ok(())
}

/// Build process-level collaborators and inject them into the shared application state.
pub fn build_state(config: &Config) -> Result<AppState> {
    let contract = ContractValidator::load(&config.openapi_spec_path).with_context(|| {
        format!(
            "failed to load contract {}",
            config.openapi_spec_path.display()
        )
    })?;
    tracing::info!(routes = contract.route_count(), "contract loaded");

    let auth = build_bearer_strategy(&config.verifier)?;
    tracing::info!(verifier = auth.verifier_name(), "token verifier ready");

    Ok(AppState::new(
        Arc::new(contract),
        auth,
        Arc::new(NoopExampleService),
    ))
}

pub fn build_router(state: AppState) -> Router {
    // everything except /health passes the contract check
    let gated = Router::new()
        .nest("/v1", api::v1::routes(state.clone()))
        .fallback(api::not_found);
    let gated = middleware::contract::apply(gated, state.clone());

    let health = Router::new()
        .route("/health", get(api::health::health))
        .method_not_allowed_fallback(api::method_not_allowed);

    let router = Router::new()
        .merge(health)
        .merge(gated)
        .with_state(state);

    middleware::http::apply(router)
}
