//! Per-zone health index endpoint.

use std::sync::Arc;

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::Json;
use chrono::{DateTime, Utc};
use serde::Serialize;

use gridwatch_health::{BghiComponents, HealthStatus};

use crate::state::AppState;

use super::{error_response, ErrorBody};

#[derive(Debug, Serialize, utoipa::ToSchema)]
pub struct BghiResponse {
    pub zone_id: String,
    pub bghi_score: f64,
    #[schema(value_type = String)]
    pub health_status: HealthStatus,
    pub color: &'static str,
    #[schema(value_type = Object)]
    pub components: BghiComponents,
    pub timestamp: DateTime<Utc>,
    pub transformer_load_pct: f64,
}

/// Current BGHI score for a zone with the component breakdown.
#[utoipa::path(get, path = "/api/bghi/{zone_id}", tag = "Health Index",
    params(("zone_id" = String, Path, description = "Zone identifier")),
    responses(
        (status = 200, body = BghiResponse),
        (status = 404, body = ErrorBody),
    ))]
pub async fn get_bghi(
    State(state): State<Arc<AppState>>,
    Path(zone_id): Path<String>,
) -> Result<Json<BghiResponse>, (StatusCode, Json<ErrorBody>)> {
    let engine = state.engine.read().await;
    let health = engine
        .health(&zone_id, Utc::now())
        .map_err(error_response)?;

    Ok(Json(BghiResponse {
        zone_id: health.zone_id,
        bghi_score: health.bghi.bghi_score,
        health_status: health.bghi.status,
        color: health.bghi.color,
        components: health.components,
        timestamp: health.timestamp,
        transformer_load_pct: health.transformer_load_pct,
    }))
}
