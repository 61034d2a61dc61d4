//! Component sub-score computation.
//!
//! Each function maps a raw measurement onto a 0–100 deterioration scale
//! (0 = no stress, 100 = maximum) and clamps its own output, so the
//! composite calculation never sees out-of-range components.

use serde::{Deserialize, Serialize};

/// Normalizers and thresholds for the sub-score ramps.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(deny_unknown_fields, default)]
pub struct ScoreParams {
    /// Load percentage where stress begins.
    pub safe_load_pct: f64,
    /// Load percentage at maximum stress.
    pub critical_load_pct: f64,
    /// Outage minutes in 24 h that score 100.
    pub max_outage_minutes: f64,
    /// Deterioration points per power-quality proxy event.
    pub event_weight: f64,
    /// Anomaly events in 24 h that score 100.
    pub max_anomaly_events: u32,
    /// Ambient temperature where stress begins (°C).
    pub temp_safe_c: f64,
    /// Ambient temperature at maximum stress (°C).
    pub temp_critical_c: f64,
    /// Humidity above this comfort level scales up thermal stress (%).
    pub humidity_comfort_pct: f64,
    /// Mismatch ratio that scores 100.
    pub max_mismatch_ratio: f64,
}

impl Default for ScoreParams {
    fn default() -> Self {
        Self {
            safe_load_pct: 70.0,
            critical_load_pct: 100.0,
            max_outage_minutes: 60.0,
            event_weight: 5.0,
            max_anomaly_events: 10,
            temp_safe_c: 30.0,
            temp_critical_c: 45.0,
            humidity_comfort_pct: 70.0,
            max_mismatch_ratio: 0.3,
        }
    }
}

/// Source for the power-quality sub-score.
///
/// Voltage deviation is preferred when voltage telemetry exists; the event
/// proxy covers meters that only report power. The caller chooses the
/// variant explicitly.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum PowerQualityInput {
    /// Fraction of time voltage sat outside the acceptable band, in [0, 1].
    VoltageDeviation(f64),
    /// Count of power-quality events (spikes) in the last 24 h.
    EventProxy(u32),
}

fn clamp100(v: f64) -> f64 {
    v.clamp(0.0, 100.0)
}

/// Load stress: linear ramp from the safe threshold to the critical one.
pub fn compute_load_stress(transformer_load_pct: f64, params: &ScoreParams) -> f64 {
    if transformer_load_pct <= params.safe_load_pct {
        return 0.0;
    }
    let range = params.critical_load_pct - params.safe_load_pct;
    clamp100((transformer_load_pct - params.safe_load_pct) / range * 100.0)
}

/// Outage score: linear in outage minutes over the normalizer.
pub fn compute_outage_score(outage_minutes_24h: f64, params: &ScoreParams) -> f64 {
    clamp100(outage_minutes_24h / params.max_outage_minutes * 100.0)
}

/// Power quality: voltage-deviation fraction, or an event-count proxy.
pub fn compute_power_quality_score(input: PowerQualityInput, params: &ScoreParams) -> f64 {
    match input {
        PowerQualityInput::VoltageDeviation(fraction) => clamp100(fraction * 100.0),
        PowerQualityInput::EventProxy(events) => {
            clamp100(f64::from(events) * params.event_weight)
        }
    }
}

/// Anomaly frequency: linear in event count over the normalizer.
pub fn compute_anomaly_frequency_score(events_last_24h: u32, params: &ScoreParams) -> f64 {
    clamp100(f64::from(events_last_24h) / f64::from(params.max_anomaly_events) * 100.0)
}

/// Environmental stress: temperature ramp, scaled up by humidity above the
/// comfort threshold.
pub fn compute_environmental_stress_score(
    ambient_temp_c: f64,
    humidity_pct: Option<f64>,
    params: &ScoreParams,
) -> f64 {
    let mut score = if ambient_temp_c <= params.temp_safe_c {
        0.0
    } else {
        let range = params.temp_critical_c - params.temp_safe_c;
        (ambient_temp_c - params.temp_safe_c) / range * 100.0
    };

    if let Some(h) = humidity_pct {
        let humidity_factor = 1.0 + (h - params.humidity_comfort_pct).max(0.0) / 100.0;
        score *= humidity_factor;
    }

    clamp100(score)
}

/// Mismatch score: linear in |ratio| over the normalizer.
pub fn compute_mismatch_score(mismatch_ratio: f64, params: &ScoreParams) -> f64 {
    clamp100(mismatch_ratio.abs() / params.max_mismatch_ratio * 100.0)
}
