//! HTTP router construction.
//!
//! Assembles all Axum routes, middleware, and OpenAPI docs into a single
//! `Router`.

use std::sync::Arc;

use axum::http::{HeaderValue, Method};
use axum::routing::{get, post};
use axum::Router;
use tower_http::cors::CorsLayer;
use tracing::warn;
use utoipa::OpenApi;
use utoipa_scalar::{Scalar, Servable};

use crate::api;
use crate::state::AppState;

/// Build the complete application router with all routes and middleware.
pub fn build_router(state: Arc<AppState>, cors_origin: &str) -> Router {
    let cors = match cors_origin.parse::<HeaderValue>() {
        Ok(origin) => CorsLayer::new()
            .allow_origin(origin)
            .allow_methods([Method::GET, Method::POST])
            .allow_headers(tower_http::cors::Any),
        Err(_) => {
            warn!("invalid CORS origin {cors_origin:?}, allowing any origin");
            CorsLayer::permissive()
        }
    };

    Router::new()
        .route("/", get(api::health::root))
        .route("/api/health", get(api::health::health))
        .route("/api/readings", post(api::readings::ingest_readings))
        .route("/api/bghi/{zone_id}", get(api::bghi::get_bghi))
        .route("/api/forecast/{zone_id}", get(api::forecast::get_forecast))
        .route("/api/alerts/{zone_id}", get(api::alerts::get_alerts))
        .route("/api/escalate", post(api::alerts::escalate_alert))
        .route("/api/zones", get(api::zones::get_zones))
        .merge(Scalar::with_url("/docs", api::doc::ApiDoc::openapi()))
        .layer(cors)
        .with_state(state)
}
