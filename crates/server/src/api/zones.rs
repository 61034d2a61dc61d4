//! Zone listing endpoint.

use std::sync::Arc;

use axum::extract::State;
use axum::Json;
use serde::Serialize;

use gridwatch_engine::ZoneInfo;

use crate::state::AppState;

#[derive(Debug, Serialize, utoipa::ToSchema)]
pub struct ZonesResponse {
    #[schema(value_type = Vec<Object>)]
    pub zones: Vec<ZoneInfo>,
}

/// All monitored zones with transformer capacity.
#[utoipa::path(get, path = "/api/zones", tag = "Zones",
    responses((status = 200, body = ZonesResponse)))]
pub async fn get_zones(State(state): State<Arc<AppState>>) -> Json<ZonesResponse> {
    let engine = state.engine.read().await;
    Json(ZonesResponse {
        zones: engine.zone_infos(),
    })
}
