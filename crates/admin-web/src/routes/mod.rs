//! Route handlers for the export service.

pub mod export;
pub mod health;

use axum::routing::get;
use axum::Router;

use crate::state::AppState;

/// Build the router with all routes.
pub fn router() -> Router<AppState> {
    Router::new()
        // Health check
        .route("/health", get(health::health))
        // Report downloads and summary exports
        .route(
            "/api/reports/export",
            get(export::export_report).post(export::export_summary),
        )
}
