//! Service banner and operational health endpoints.

use std::sync::Arc;

use axum::extract::State;
use axum::Json;
use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::state::AppState;

pub const SERVICE_NAME: &str = "Gridwatch API";
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

#[derive(Serialize, utoipa::ToSchema)]
pub struct RootResponse {
    pub service: &'static str,
    pub status: &'static str,
    pub version: &'static str,
    pub timestamp: DateTime<Utc>,
}

/// API banner / liveness check.
#[utoipa::path(get, path = "/", tag = "Health",
    responses((status = 200, body = RootResponse)))]
pub async fn root() -> Json<RootResponse> {
    Json(RootResponse {
        service: SERVICE_NAME,
        status: "operational",
        version: VERSION,
        timestamp: Utc::now(),
    })
}

#[derive(Serialize, utoipa::ToSchema)]
pub struct HealthResponse {
    pub status: &'static str,
    pub zones: usize,
    pub alerts_total: usize,
    pub started_at: DateTime<Utc>,
    pub timestamp: DateTime<Utc>,
}

/// Detailed health: zone count and total stored alerts.
#[utoipa::path(get, path = "/api/health", tag = "Health",
    responses((status = 200, body = HealthResponse)))]
pub async fn health(State(state): State<Arc<AppState>>) -> Json<HealthResponse> {
    let engine = state.engine.read().await;
    Json(HealthResponse {
        status: "healthy",
        zones: engine.zone_count(),
        alerts_total: engine.total_alert_count(),
        started_at: state.started_at,
        timestamp: Utc::now(),
    })
}
