//! Health check endpoint

use axum::Json;
use serde::Serialize;

/// Health check response
#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: String,
    pub module: String,
    pub version: String,
    pub message: String,
}

/// GET /api/health
///
/// Liveness probe; never touches the record store.
pub async fn health_check() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok".to_string(),
        module: "nfeasy-api".to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
        message: "NF-easy API is running".to_string(),
    })
}
