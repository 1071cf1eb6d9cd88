//! Admin export service.
//!
//! Serves stored narrative reports as CSV or printable HTML downloads and
//! builds financial, orders and reconciliation summaries over a date range.

mod config;
mod error;
mod routes;
mod state;

use std::sync::Arc;

use database::Database;
use tower_http::trace::TraceLayer;
use tracing::info;
use tracing_subscriber::EnvFilter;

use crate::config::Config;
use crate::state::AppState;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Load .env file if present
    let _ = dotenvy::dotenv();

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("admin_web=info,database=info,tower_http=info")),
        )
        .init();

    // Load configuration
    let config = Config::from_env()?;
    info!(
        addr = %config.addr,
        duplicate_policy = ?config.duplicate_policy,
        "Starting admin export server"
    );

    // Connect to database
    let db = Database::connect(&config.database_url).await?;
    db.migrate().await?;

    // Build application state
    let state = AppState::new(Arc::new(db.clone()), config.brand.as_str())
        .with_duplicate_policy(config.duplicate_policy);

    // Build router
    let app = routes::router()
        .layer(TraceLayer::new_for_http())
        .with_state(state);

    // Start server
    info!(addr = %config.addr, "Admin export server listening");
    let listener = tokio::net::TcpListener::bind(config.addr).await?;
    axum::serve(listener, app).await?;

    db.close().await;
    info!("Admin export server stopped");
    Ok(())
}
