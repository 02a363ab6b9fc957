//! Warehouse dashboard API server.
//!
//! Main entry point for the warehouse operations service.

use anyhow::Context;
use chrono_tz::Tz;
use tokio::net::TcpListener;
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use warehouse_api::{AppState, create_router};
use warehouse_db::connect;
use warehouse_shared::AppConfig;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load environment variables from .env file
    dotenvy::dotenv().ok();

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "warehouse=debug,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    // Missing backend URL or key ends the process here
    let config = AppConfig::load().context("failed to load configuration")?;

    let tz: Tz = config
        .dashboard
        .timezone
        .parse()
        .map_err(|e| anyhow::anyhow!("invalid dashboard.timezone {:?}: {e}", config.dashboard.timezone))?;

    let backend = connect(&config.backend)?;
    info!(timezone = tz.name(), "dashboard week boundaries configured");

    let app = create_router(AppState::new(backend, tz));

    let addr = format!("{}:{}", config.server.host, config.server.port);
    let listener = TcpListener::bind(&addr).await?;
    info!("Server listening on {}", addr);

    axum::serve(listener, app).await?;

    Ok(())
}
