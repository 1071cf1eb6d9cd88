//! Health check endpoint.

use axum::Json;
use serde::Serialize;

#[derive(Serialize)]
pub struct Health {
    pub status: &'static str,
}

/// Liveness probe. Does not touch the record store.
pub async fn health() -> Json<Health> {
    Json(Health { status: "ok" })
}
