//! EWMA forecaster: baseline plus exponentially decayed trend adjustment.

use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};

use gridwatch_core::GridwatchError;

use crate::baseline::HourlyBaseline;

/// Number of future slots produced per forecast.
pub const FORECAST_HORIZON: u32 = 24;

/// Time constant of the trend-adjustment decay (`exp(-offset / 12)`,
/// half-life ≈ 8.3 hours).
const DECAY_HOURS: f64 = 12.0;

/// Risk band for a forecast slot's load-to-capacity ratio.
///
/// Bands are contiguous and exhaustive: every non-negative ratio maps to
/// exactly one level.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum RiskLevel {
    Minimal,
    Low,
    Moderate,
    High,
    Critical,
}

impl RiskLevel {
    pub fn classify(risk_ratio: f64) -> Self {
        if risk_ratio >= 0.90 {
            RiskLevel::Critical
        } else if risk_ratio >= 0.80 {
            RiskLevel::High
        } else if risk_ratio >= 0.70 {
            RiskLevel::Moderate
        } else if risk_ratio >= 0.50 {
            RiskLevel::Low
        } else {
            RiskLevel::Minimal
        }
    }
}

/// One hour of the 24-slot forecast.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ForecastSlot {
    pub hour: u32,
    pub offset_hours: u32,
    pub timestamp: DateTime<Utc>,
    pub predicted_load_kw: f64,
    pub baseline_load_kw: f64,
    pub adjustment_kw: f64,
    pub risk_ratio: f64,
    pub risk_level: RiskLevel,
}

fn round2(v: f64) -> f64 {
    (v * 100.0).round() / 100.0
}

fn round3(v: f64) -> f64 {
    (v * 1000.0).round() / 1000.0
}

/// Exponentially-weighted forecaster over an hourly baseline.
///
/// The baseline must be set before forecasting; a missing baseline is a
/// configuration error, never a silent zero-forecast.
#[derive(Debug, Clone)]
pub struct EwmaForecaster {
    alpha: f64,
    baseline: Option<HourlyBaseline>,
}

impl EwmaForecaster {
    /// `alpha` is the smoothing parameter in [0, 1]; higher weights recent
    /// data more. Out-of-range values are clamped.
    pub fn new(alpha: f64) -> Self {
        Self {
            alpha: alpha.clamp(0.0, 1.0),
            baseline: None,
        }
    }

    pub fn with_baseline(alpha: f64, baseline: HourlyBaseline) -> Self {
        let mut f = Self::new(alpha);
        f.set_baseline(baseline);
        f
    }

    pub fn set_baseline(&mut self, baseline: HourlyBaseline) {
        self.baseline = Some(baseline);
    }

    pub fn has_baseline(&self) -> bool {
        self.baseline.is_some()
    }

    /// Produce the 24-slot forecast.
    ///
    /// `adjustment = α × (recent_mean − baseline[current_hour])` decays as
    /// `exp(-offset / 12)` across the horizon; predictions are floored at
    /// zero. Slot timestamps are offsets from the supplied `now`.
    pub fn forecast_24h(
        &self,
        current_hour: u32,
        recent_mean_kw: f64,
        capacity_kw: f64,
        now: DateTime<Utc>,
    ) -> Result<Vec<ForecastSlot>, GridwatchError> {
        let baseline = self.baseline.as_ref().ok_or_else(|| {
            GridwatchError::BaselineNotSet("call set_baseline before forecasting".to_string())
        })?;

        let adjustment = self.alpha * (recent_mean_kw - baseline.get(current_hour));

        let mut slots = Vec::with_capacity(FORECAST_HORIZON as usize);
        for offset in 0..FORECAST_HORIZON {
            let future_hour = (current_hour + offset) % 24;
            let baseline_load = baseline.get(future_hour);

            let decay = (-f64::from(offset) / DECAY_HOURS).exp();
            let decayed_adjustment = adjustment * decay;
            let predicted = (baseline_load + decayed_adjustment).max(0.0);

            let risk_ratio = predicted / capacity_kw;

            slots.push(ForecastSlot {
                hour: future_hour,
                offset_hours: offset,
                timestamp: now + Duration::hours(i64::from(offset)),
                predicted_load_kw: round2(predicted),
                baseline_load_kw: round2(baseline_load),
                adjustment_kw: round2(decayed_adjustment),
                risk_ratio: round3(risk_ratio),
                risk_level: RiskLevel::classify(risk_ratio),
            });
        }

        Ok(slots)
    }
}

/// Slot with the maximum risk ratio, if the forecast is non-empty.
pub fn peak_risk(slots: &[ForecastSlot]) -> Option<&ForecastSlot> {
    slots
        .iter()
        .max_by(|a, b| a.risk_ratio.total_cmp(&b.risk_ratio))
}
