//! HTTP handlers, grouped by concern.

pub mod alerts;
pub mod bghi;
pub mod doc;
pub mod forecast;
pub mod health;
pub mod readings;
pub mod zones;

use axum::http::StatusCode;
use axum::Json;
use serde::Serialize;

use gridwatch_core::GridwatchError;

/// JSON error body returned by every failing endpoint.
#[derive(Debug, Serialize, utoipa::ToSchema)]
pub struct ErrorBody {
    pub error: String,
}

/// Map core errors onto HTTP status codes.
pub fn error_response(err: GridwatchError) -> (StatusCode, Json<ErrorBody>) {
    let status = match &err {
        GridwatchError::ZoneNotFound(_) | GridwatchError::AlertNotFound(_) => {
            StatusCode::NOT_FOUND
        }
        GridwatchError::InvalidReading(_) | GridwatchError::InvalidWeights(_) => {
            StatusCode::BAD_REQUEST
        }
        GridwatchError::BaselineNotSet(_) => StatusCode::CONFLICT,
        _ => StatusCode::INTERNAL_SERVER_ERROR,
    };
    (
        status,
        Json(ErrorBody {
            error: err.to_string(),
        }),
    )
}
