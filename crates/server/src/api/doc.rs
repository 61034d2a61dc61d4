//! OpenAPI documentation aggregator.
//!
//! Collects all `#[utoipa::path]`-annotated handlers and `ToSchema`-derived
//! types into a single OpenAPI spec, served via Scalar UI at `/docs`.

use utoipa::OpenApi;

#[derive(OpenApi)]
#[openapi(
    info(
        title = "Gridwatch API",
        version = "0.1.0",
        description = "Grid-health telemetry: anomaly detection, BGHI health index, and 24-hour load forecasting for distribution zones.",
    ),
    tags(
        (name = "Health", description = "Service banner and operational health"),
        (name = "Telemetry", description = "Reading ingestion and synchronous detection"),
        (name = "Health Index", description = "Composite BGHI score per zone"),
        (name = "Forecast", description = "24-hour load forecast with predictive overload alerts"),
        (name = "Alerts", description = "Anomaly alert listing and escalation"),
        (name = "Zones", description = "Monitored zone metadata"),
    ),
    paths(
        crate::api::health::root,
        crate::api::health::health,
        crate::api::readings::ingest_readings,
        crate::api::bghi::get_bghi,
        crate::api::forecast::get_forecast,
        crate::api::alerts::get_alerts,
        crate::api::alerts::escalate_alert,
        crate::api::zones::get_zones,
    )
)]
pub struct ApiDoc;
