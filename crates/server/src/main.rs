use std::sync::Arc;

use tracing::info;

use gridwatch_engine::{Engine, MonitorParams};
use gridwatch_server::router::build_router;
use gridwatch_server::state::AppState;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_target(false)
        .with_level(true)
        .init();

    gridwatch_core::config::load_dotenv();
    let config = gridwatch_core::Config::from_env();

    let mut defaults = MonitorParams {
        sample_interval_secs: config.sample_interval_secs,
        ..MonitorParams::default()
    };
    defaults.spike.sample_interval_secs = config.sample_interval_secs;
    let engine = Engine::from_zone_file(&config.zones_file, &defaults)?;
    info!("Engine ready with {} zones", engine.zone_count());

    let state = Arc::new(AppState::new(engine));
    let app = build_router(state, &config.server.cors_origin);

    let addr = format!("{}:{}", config.server.host, config.server.port);
    let listener = tokio::net::TcpListener::bind(&addr).await?;
    info!("Server listening on http://{addr}");
    axum::serve(listener, app).await?;

    Ok(())
}
