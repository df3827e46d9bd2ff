use std::sync::Arc;
use std::time::Duration;

use anyhow::Context;
use axum::http::HeaderValue;
use talent_match_core::engine::MatchAggregator;
use talent_match_server::api::{AppState, create_router};
use talent_match_server::config::ServerConfig;
use talent_match_server::db::init_pool_and_migrate;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

const CONFIG_PATH: &str = "talent-match.toml";

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    init_tracing()?;

    info!("starting talent-match server");
    let config = ServerConfig::load(CONFIG_PATH)
        .with_context(|| format!("failed to load server config from {CONFIG_PATH}"))?;

    let db = init_pool_and_migrate(config.database_url()?)
        .await
        .context("failed to connect to the database")?;
    let state = Arc::new(AppState::new(db, &config).context("failed to build application state")?);

    state
        .aggregator
        .rebuild()
        .await
        .context("failed to warm up match aggregates")?;
    spawn_rebuild_sweep(
        state.aggregator.clone(),
        Duration::from_secs(config.engine.rebuild_interval_secs),
    );

    let app = create_router(state)
        .layer(cors_layer(&config.cors.allowed_origins))
        .layer(TraceLayer::new_for_http());

    let listener = tokio::net::TcpListener::bind(&config.bind_addr)
        .await
        .with_context(|| format!("failed to bind {}", config.bind_addr))?;
    info!(addr = %config.bind_addr, "server is ready, press Ctrl+C to shut down");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("server terminated unexpectedly")?;

    info!("server shutdown complete");
    Ok(())
}

fn init_tracing() -> anyhow::Result<()> {
    let env_filter = EnvFilter::try_from_default_env().or_else(|_| EnvFilter::try_new("info"))?;

    tracing_subscriber::fmt().with_env_filter(env_filter).init();
    Ok(())
}

fn cors_layer(allowed_origins: &[String]) -> CorsLayer {
    let layer = CorsLayer::new().allow_methods(Any).allow_headers(Any);
    if allowed_origins.is_empty() {
        return layer.allow_origin(Any);
    }

    let origins: Vec<HeaderValue> = allowed_origins
        .iter()
        .filter_map(|origin| match HeaderValue::from_str(origin) {
            Ok(value) => Some(value),
            Err(err) => {
                warn!(origin = %origin, error = %err, "ignoring invalid CORS origin");
                None
            }
        })
        .collect();
    layer.allow_origin(origins)
}

/// Periodically re-derives every aggregate from a full scan. Picks up writes
/// made by other server instances sharing the database.
fn spawn_rebuild_sweep(aggregator: Arc<MatchAggregator>, period: Duration) {
    if period.is_zero() {
        return;
    }

    tokio::spawn(async move {
        let mut ticker = tokio::time::interval(period);
        ticker.tick().await;
        loop {
            ticker.tick().await;
            if let Err(err) = aggregator.rebuild().await {
                warn!(error = %err, "periodic aggregate rebuild failed");
            }
        }
    });
}

async fn shutdown_signal() {
    if let Err(err) = tokio::signal::ctrl_c().await {
        warn!(error = %err, "failed to listen for shutdown signal");
        std::future::pending::<()>().await;
    }
    info!("shutdown signal received, stopping server");
}
