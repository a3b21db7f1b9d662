//! Liveness check.

use axum::Json;
use serde::Serialize;

#[derive(Serialize)]
pub struct HealthResponse {
    pub ok: bool,
    pub build: &'static str,
}

/// `GET /health` — static ok flag plus the build identifier.
pub async fn health() -> Json<HealthResponse> {
    Json(HealthResponse {
        ok: true,
        build: env!("CARGO_PKG_VERSION"),
    })
}
