//! BGHI (grid health index) calculation.
//!
//! Maps six normalized deterioration sub-scores plus a validated weight
//! vector to a composite 0–100 health index with a status band and color
//! tag. Pure functions throughout: no state, no side effects, consistent
//! output for the same inputs.

pub mod scores;
pub mod weights;

use serde::{Deserialize, Serialize};

pub use scores::{PowerQualityInput, ScoreParams};
pub use weights::BghiWeights;

/// The six component sub-scores, each pre-clamped to [0, 100].
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BghiComponents {
    pub load_stress: f64,
    pub outage_score: f64,
    pub power_quality: f64,
    pub anomaly_frequency: f64,
    pub environmental_stress: f64,
    pub mismatch_score: f64,
}

/// Health status band derived from the composite score.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum HealthStatus {
    Good,
    Warning,
    Critical,
}

impl HealthStatus {
    pub fn color(self) -> &'static str {
        match self {
            HealthStatus::Good => "green",
            HealthStatus::Warning => "amber",
            HealthStatus::Critical => "red",
        }
    }
}

/// Composite index result. Derived, stateless, recomputed on demand.
#[derive(Debug, Clone, Serialize)]
pub struct BghiResult {
    pub bghi_score: f64,
    pub deterioration: f64,
    pub status: HealthStatus,
    pub color: &'static str,
}

fn round2(v: f64) -> f64 {
    (v * 100.0).round() / 100.0
}

/// Calculate the composite BGHI from component scores.
///
/// `deterioration` is the weighted sum of the sub-scores; the index is its
/// inverse (`100 − deterioration`). Status bands: ≥80 Good, ≥60 Warning,
/// else Critical.
pub fn calculate_bghi(components: &BghiComponents, weights: &BghiWeights) -> BghiResult {
    let deterioration = weights.load_stress * components.load_stress
        + weights.outage_score * components.outage_score
        + weights.power_quality * components.power_quality
        + weights.anomaly_frequency * components.anomaly_frequency
        + weights.environmental_stress * components.environmental_stress
        + weights.mismatch_score * components.mismatch_score;

    let bghi_score = 100.0 - deterioration;

    let status = if bghi_score >= 80.0 {
        HealthStatus::Good
    } else if bghi_score >= 60.0 {
        HealthStatus::Warning
    } else {
        HealthStatus::Critical
    };

    BghiResult {
        bghi_score: round2(bghi_score),
        deterioration: round2(deterioration),
        status,
        color: status.color(),
    }
}
