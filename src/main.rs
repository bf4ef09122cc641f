use std::sync::Arc;

use anyhow::Context;
use tracing_subscriber::EnvFilter;

use condo_gate::config::config;
use condo_gate::database::{DatabaseManager, PgUserStore};
use condo_gate::{app, AppState};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load .env if present so cargo run picks up DATABASE_URL, JWT_SECRET, etc.
    let _ = dotenvy::dotenv();

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("condo_gate=info,tower_http=info")),
        )
        .init();

    // Initialize configuration (this loads the config singleton)
    let config = config();
    tracing::info!("Starting condo-gate in {:?} mode", config.environment);
    config.validate().context("invalid configuration")?;
    if condo_gate::is_production!() && !config.security.require_https {
        tracing::warn!("Session cookies are issued without the Secure flag in production");
    }

    let pool = DatabaseManager::connect_lazy(&config.database)?;
    if config.database.run_migrations {
        DatabaseManager::migrate(&pool).await?;
    }

    let state = AppState::new(config.clone(), Arc::new(PgUserStore::new(pool.clone())))?;
    let app = app(state);

    let bind_addr = format!("0.0.0.0:{}", config.server.port);
    let listener = tokio::net::TcpListener::bind(&bind_addr)
        .await
        .with_context(|| format!("failed to bind {}", bind_addr))?;

    tracing::info!(
        "condo-gate listening on http://{}, forwarding to {}",
        bind_addr,
        config.gateway.upstream_url
    );

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    DatabaseManager::close(&pool).await;
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!("Failed to listen for shutdown signal: {}", e);
    }
    tracing::info!("Shutting down");
}
