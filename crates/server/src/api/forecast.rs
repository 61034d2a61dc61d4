//! Per-zone 24-hour forecast endpoint.

use std::sync::Arc;

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::Json;
use chrono::Utc;

use gridwatch_engine::ZoneForecast;

use crate::state::AppState;

use super::{error_response, ErrorBody};

/// 24-hour load forecast with risk levels and the optional predictive
/// overload alert.
///
/// Zones without a configured baseline return 409: forecasting is a
/// configuration error there, not a silent zero-forecast.
#[utoipa::path(get, path = "/api/forecast/{zone_id}", tag = "Forecast",
    params(("zone_id" = String, Path, description = "Zone identifier")),
    responses(
        (status = 200, body = Object),
        (status = 404, body = ErrorBody),
        (status = 409, body = ErrorBody),
    ))]
pub async fn get_forecast(
    State(state): State<Arc<AppState>>,
    Path(zone_id): Path<String>,
) -> Result<Json<ZoneForecast>, (StatusCode, Json<ErrorBody>)> {
    let engine = state.engine.read().await;
    let forecast = engine
        .forecast(&zone_id, Utc::now())
        .map_err(error_response)?;
    Ok(Json(forecast))
}
