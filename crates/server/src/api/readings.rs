//! Telemetry ingestion endpoint.

use std::sync::Arc;

use axum::extract::State;
use axum::http::StatusCode;
use axum::Json;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::info;

use gridwatch_core::{EnvironmentSample, FeederReading, Reading};

use crate::state::AppState;

/// Batch of telemetry from the field.
///
/// `readings` is the node-meter stream; feeder measurements and ambient
/// conditions ride along in the same batch when available.
#[derive(Debug, Deserialize, utoipa::ToSchema)]
pub struct BulkReadings {
    #[schema(value_type = Vec<Object>)]
    pub readings: Vec<Reading>,
    #[serde(default)]
    #[schema(value_type = Vec<Object>)]
    pub feeder_readings: Vec<FeederReading>,
    #[serde(default)]
    pub environment: Vec<ZoneEnvironment>,
}

/// Ambient conditions at a zone's transformer site.
#[derive(Debug, Deserialize, utoipa::ToSchema)]
pub struct ZoneEnvironment {
    pub zone_id: String,
    pub ambient_temp_c: f64,
    #[serde(default)]
    pub humidity_pct: Option<f64>,
}

#[derive(Debug, Serialize, utoipa::ToSchema)]
pub struct IngestResponse {
    pub status: &'static str,
    pub readings_received: usize,
    pub readings_rejected: usize,
    pub anomalies_detected: usize,
    pub timestamp: DateTime<Utc>,
}

/// Ingest a telemetry batch and run detection synchronously.
#[utoipa::path(post, path = "/api/readings", tag = "Telemetry",
    request_body = BulkReadings,
    responses((status = 201, body = IngestResponse)))]
pub async fn ingest_readings(
    State(state): State<Arc<AppState>>,
    Json(batch): Json<BulkReadings>,
) -> (StatusCode, Json<IngestResponse>) {
    let now = Utc::now();
    let mut engine = state.engine.write().await;

    let mut summary = engine.ingest_batch(&batch.readings, now);

    for feeder in &batch.feeder_readings {
        match engine.ingest_feeder(feeder, now) {
            Ok(Some(anomaly)) => summary.anomalies.push(anomaly),
            Ok(None) => {}
            Err(e) => {
                tracing::warn!("feeder reading dropped: {e}");
                summary.rejected += 1;
            }
        }
    }

    for env in &batch.environment {
        let sample = EnvironmentSample {
            ambient_temp_c: env.ambient_temp_c,
            humidity_pct: env.humidity_pct,
        };
        if let Err(e) = engine.record_environment(&env.zone_id, sample) {
            tracing::warn!("environment sample dropped: {e}");
            summary.rejected += 1;
        }
    }

    if !summary.anomalies.is_empty() {
        info!(
            anomalies = summary.anomalies.len(),
            accepted = summary.accepted,
            "ingestion batch raised anomalies"
        );
    }

    (
        StatusCode::CREATED,
        Json(IngestResponse {
            status: "success",
            readings_received: summary.accepted,
            readings_rejected: summary.rejected,
            anomalies_detected: summary.anomalies.len(),
            timestamp: now,
        }),
    )
}
