use chrono::{DateTime, Utc};
use tokio::sync::RwLock;

use gridwatch_engine::Engine;

/// Shared application state: the engine behind a read-write lock.
///
/// Queries (health, forecast, alerts) take read locks; ingestion and
/// escalation take the write lock. Zone monitors are mutated only under the
/// write lock, which serializes calls per instance as the engine requires.
pub struct AppState {
    pub engine: RwLock<Engine>,
    pub started_at: DateTime<Utc>,
}

impl AppState {
    pub fn new(engine: Engine) -> Self {
        Self {
            engine: RwLock::new(engine),
            started_at: Utc::now(),
        }
    }
}
