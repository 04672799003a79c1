use actix_web::{web, App, HttpServer};
use anyhow::Context;
use sqlx::postgres::PgPoolOptions;
use std::sync::Arc;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

mod activity;
mod config;
mod domain;
mod http;
mod metrics;
mod store;

use activity::ActivityService;
use config::Config;
use http::handlers::AppState;
use metrics::Metrics;
use store::{EntityStore, PgEntityStore};

#[actix_web::main]
async fn main() -> anyhow::Result<()> {
    // Initialize structured logging with environment-based filtering
    // Default to INFO level, can be overridden with RUST_LOG env var
    // Example: RUST_LOG=debug cargo run
    tracing_subscriber::registry()
        .with(fmt::layer().with_target(true).with_thread_ids(true))
        .with(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("info,market_activity=debug")),
        )
        .init();

    tracing::info!("🚀 Starting market activity service");

    // === 1. Load configuration ===
    let config = Config::from_env()?;

    // === 2. Connect to Postgres ===
    tracing::info!("Connecting to Postgres...");
    let pool = PgPoolOptions::new()
        .max_connections(config.db_max_connections)
        .connect(&config.database_url)
        .await
        .context("failed to connect to Postgres")?;

    let store: Arc<dyn EntityStore> = Arc::new(PgEntityStore::new(pool));

    // === 3. Initialize Prometheus metrics ===
    tracing::info!("Initializing metrics");
    let metrics = Arc::new(Metrics::new()?);

    // === 4. Start the HTTP server ===
    let enforce_ownership = config.enforce_ownership;
    if enforce_ownership {
        tracing::info!("🔒 Ownership enforcement is on; gateway identity headers are required");
    }
    tracing::info!("🌐 Serving activity views on http://{}", config.bind_addr);

    HttpServer::new(move || {
        let state = AppState {
            service: ActivityService::new(store.clone()),
            store: store.clone(),
            metrics: metrics.clone(),
            enforce_ownership,
        };
        App::new()
            .app_data(web::Data::new(state))
            .app_data(web::Data::new(metrics.clone()))
            .configure(http::routes)
    })
    .bind(&config.bind_addr)?
    .run()
    .await?;

    Ok(())
}
