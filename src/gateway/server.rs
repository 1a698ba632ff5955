use super::handlers::{handle_chat, handle_health, handle_reset};
use super::{AppState, MAX_BODY_SIZE};

use crate::agent::ChatAgent;
use crate::config::{Config, GatewayConfig};
use crate::llm;
use crate::prompt::PromptSelector;
use crate::session::ConversationStore;
use anyhow::{Context, Result};
use axum::{
    Router,
    http::StatusCode,
    routing::{get, post},
};
use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;
use tower_http::cors::CorsLayer;
use tower_http::limit::RequestBodyLimitLayer;
use tower_http::services::ServeDir;
use tower_http::timeout::TimeoutLayer;

const EVICTION_INTERVAL: Duration = Duration::from_secs(60);

/// Returns true when the bind address is not a loopback address.
pub fn is_public_bind(host: &str) -> bool {
    !matches!(
        host,
        "127.0.0.1" | "localhost" | "::1" | "[::1]" | "0:0:0:0:0:0:0:1"
    )
}

/// Run the HTTP gateway on `host:port`.
pub async fn run_gateway(host: &str, port: u16, config: Arc<Config>) -> Result<()> {
    if is_public_bind(host) && !config.gateway.allow_public_bind {
        anyhow::bail!(
            "Refusing to bind to {host}: the gateway would be reachable from other machines.\n\
             Fix: use --host 127.0.0.1 (default), or set\n\
             [gateway] allow_public_bind = true in config.toml."
        );
    }

    let addr: SocketAddr = format!("{host}:{port}")
        .parse()
        .context("parse gateway bind address")?;
    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .context("bind gateway socket")?;

    run_gateway_with_listener(host, listener, config).await
}

/// Wire provider, prompts and conversation store from config.
pub fn build_state(config: &Config) -> Result<AppState> {
    let provider: Arc<dyn llm::Provider> = Arc::from(
        llm::create_resilient_provider(
            config.provider_name(),
            config.api_key.as_deref(),
            &config.reliability,
        )
        .context("create resilient LLM provider")?,
    );
    let prompts = Arc::new(PromptSelector::new().context("render system prompts")?);

    let agent = ChatAgent::new(provider, prompts, config.model_name())
        .with_temperature(config.default_temperature)
        .with_phase_timeout(Duration::from_secs(config.reliability.phase_timeout_secs));

    Ok(AppState {
        agent: Arc::new(agent),
        conversations: Arc::new(ConversationStore::new(&config.session)),
        default_language: config.default_language,
    })
}

/// Run the HTTP gateway from a pre-bound listener.
pub async fn run_gateway_with_listener(
    host: &str,
    listener: tokio::net::TcpListener,
    config: Arc<Config>,
) -> Result<()> {
    let actual_port = listener
        .local_addr()
        .context("get gateway listener local address")?
        .port();
    let display_addr = format!("{host}:{actual_port}");

    let state = build_state(&config)?;
    if let Err(e) = state.agent.warmup().await {
        tracing::warn!("Provider warmup failed: {e}");
    }
    spawn_eviction(Arc::clone(&state.conversations));

    print_gateway_banner(&display_addr, &config.gateway);
    let app = build_app(state, &config.gateway);
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("serve HTTP gateway")?;

    Ok(())
}

fn spawn_eviction(conversations: Arc<ConversationStore>) {
    tokio::spawn(async move {
        let mut interval = tokio::time::interval(EVICTION_INTERVAL);
        loop {
            interval.tick().await;
            let evicted = conversations.evict_idle();
            if evicted > 0 {
                tracing::debug!(evicted, "Evicted idle conversations");
            }
        }
    });
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::warn!("Failed to listen for ctrl-c: {e}");
        std::future::pending::<()>().await;
    }
    tracing::info!("Shutting down gateway");
}

fn print_gateway_banner(display_addr: &str, gateway: &GatewayConfig) {
    println!("Gateway listening on {display_addr}");
    println!("  POST /api/chat");
    println!("  POST /api/reset");
    println!("  GET  /health");
    if let Some(dir) = &gateway.static_dir {
        println!("  GET  /      -> {}", dir.display());
    }
}

pub fn build_app(state: AppState, gateway: &GatewayConfig) -> Router {
    let mut app = Router::new()
        .route("/health", get(handle_health))
        .route("/api/chat", post(handle_chat))
        .route("/api/reset", post(handle_reset));

    if let Some(dir) = &gateway.static_dir {
        app = app.fallback_service(ServeDir::new(dir));
    }

    let mut app = app
        .with_state(state)
        .layer(RequestBodyLimitLayer::new(MAX_BODY_SIZE))
        .layer(TimeoutLayer::with_status_code(
            StatusCode::REQUEST_TIMEOUT,
            Duration::from_secs(gateway.request_timeout_secs),
        ));

    if !gateway.cors_origins.is_empty() {
        let origins: Vec<_> = gateway
            .cors_origins
            .iter()
            .filter_map(|o| o.parse().ok())
            .collect();
        app = app.layer(
            CorsLayer::new()
                .allow_origin(origins)
                .allow_methods([axum::http::Method::GET, axum::http::Method::POST])
                .allow_headers([axum::http::header::CONTENT_TYPE]),
        );
    }

    app
}
