//! Alert listing and escalation endpoints.

use std::sync::Arc;

use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::Json;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::info;
use uuid::Uuid;

use gridwatch_engine::AlertRecord;

use crate::state::AppState;

use super::{error_response, ErrorBody};

/// Query parameters for GET /api/alerts/{zone_id}.
#[derive(Debug, Deserialize, utoipa::IntoParams)]
pub struct AlertsQueryParams {
    /// Maximum alerts to return (default 10, capped at 100).
    pub limit: Option<usize>,
}

#[derive(Debug, Serialize, utoipa::ToSchema)]
pub struct AlertsResponse {
    pub zone_id: String,
    #[schema(value_type = Vec<Object>)]
    pub alerts: Vec<AlertRecord>,
    pub count: usize,
}

/// Recent alerts for a zone, newest first.
#[utoipa::path(get, path = "/api/alerts/{zone_id}", tag = "Alerts",
    params(
        ("zone_id" = String, Path, description = "Zone identifier"),
        AlertsQueryParams,
    ),
    responses(
        (status = 200, body = AlertsResponse),
        (status = 404, body = ErrorBody),
    ))]
pub async fn get_alerts(
    State(state): State<Arc<AppState>>,
    Path(zone_id): Path<String>,
    Query(params): Query<AlertsQueryParams>,
) -> Result<Json<AlertsResponse>, (StatusCode, Json<ErrorBody>)> {
    let limit = params.limit.unwrap_or(10).min(100);
    let engine = state.engine.read().await;
    let alerts = engine.alerts(&zone_id, limit).map_err(error_response)?;

    Ok(Json(AlertsResponse {
        count: alerts.len(),
        zone_id,
        alerts,
    }))
}

/// Request to escalate a stored alert to the external operations system.
#[derive(Debug, Deserialize, utoipa::ToSchema)]
pub struct EscalateRequest {
    pub zone_id: String,
    pub alert_id: Uuid,
    pub escalated_by: String,
    #[serde(default)]
    pub notes: Option<String>,
}

#[derive(Debug, Serialize, utoipa::ToSchema)]
pub struct EscalateResponse {
    pub status: &'static str,
    pub alert_id: Uuid,
    pub escalated_at: DateTime<Utc>,
    pub escalated_by: String,
}

/// Mark an alert escalated and hand it to the operations forwarder.
///
/// Delivery to the external system is a collaborator concern; this endpoint
/// records the escalation and logs it.
#[utoipa::path(post, path = "/api/escalate", tag = "Alerts",
    request_body = EscalateRequest,
    responses(
        (status = 201, body = EscalateResponse),
        (status = 404, body = ErrorBody),
    ))]
pub async fn escalate_alert(
    State(state): State<Arc<AppState>>,
    Json(request): Json<EscalateRequest>,
) -> Result<(StatusCode, Json<EscalateResponse>), (StatusCode, Json<ErrorBody>)> {
    let now = Utc::now();
    let mut engine = state.engine.write().await;
    let receipt = engine
        .escalate(
            &request.zone_id,
            request.alert_id,
            &request.escalated_by,
            request.notes.clone(),
            now,
        )
        .map_err(error_response)?;

    info!(
        zone_id = %request.zone_id,
        alert_id = %receipt.alert_id,
        escalated_by = %receipt.escalated_by,
        "alert escalated to operations"
    );

    Ok((
        StatusCode::CREATED,
        Json(EscalateResponse {
            status: "escalated",
            alert_id: receipt.alert_id,
            escalated_at: receipt.escalated_at,
            escalated_by: receipt.escalated_by,
        }),
    ))
}
