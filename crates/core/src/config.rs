use std::env;
use std::path::PathBuf;

use serde::{Deserialize, Serialize};

/// Load .env file (silently ignores if missing).
pub fn load_dotenv() {
    dotenvy::dotenv().ok();
}

fn env_or(key: &str, default: &str) -> String {
    env::var(key).unwrap_or_else(|_| default.to_string())
}

fn env_u16(key: &str, default: u16) -> u16 {
    env::var(key)
        .ok()
        .and_then(|v| v.parse().ok())
        .unwrap_or(default)
}

fn env_f64(key: &str, default: f64) -> f64 {
    env::var(key)
        .ok()
        .and_then(|v| v.parse().ok())
        .unwrap_or(default)
}

// ── Top-level config ──────────────────────────────────────────

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    pub server: ServerConfig,
    /// Path to the zone topology YAML file.
    pub zones_file: PathBuf,
    /// Expected seconds between successive samples from one node.
    pub sample_interval_secs: f64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
    /// Origin allowed by the CORS layer (the operator dashboard).
    pub cors_origin: String,
}

impl Config {
    /// Build config from environment variables (call `load_dotenv()` first).
    pub fn from_env() -> Self {
        Self {
            server: ServerConfig {
                host: env_or("GRIDWATCH_HOST", "0.0.0.0"),
                port: env_u16("GRIDWATCH_PORT", 8000),
                cors_origin: env_or("GRIDWATCH_CORS_ORIGIN", "http://localhost:3000"),
            },
            zones_file: PathBuf::from(env_or("GRIDWATCH_ZONES_FILE", "config/zones.yml")),
            sample_interval_secs: env_f64("GRIDWATCH_SAMPLE_INTERVAL_SECS", 5.0),
        }
    }
}
