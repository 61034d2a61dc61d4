//! Sustained-overdraw detection: rolling mean persistently above baseline.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::debug;

use gridwatch_core::{Anomaly, AnomalyEvidence, AnomalyType, Severity};

/// Tunables for [`SustainedOverdrawDetector`].
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(deny_unknown_fields, default)]
pub struct OverdrawConfig {
    /// Multiplier over the hourly baseline that counts as overdraw.
    pub overdraw_threshold: f64,
    /// Seconds the condition must hold before emitting.
    pub min_duration_seconds: f64,
}

impl Default for OverdrawConfig {
    fn default() -> Self {
        Self {
            overdraw_threshold: 1.2,
            min_duration_seconds: 600.0,
        }
    }
}

/// Detects sustained high power consumption above an hourly baseline.
///
/// Once the episode passes `min_duration_seconds` this detector re-emits on
/// every subsequent call while the condition persists: continued monitoring
/// of a live episode, not a one-shot edge trigger. State clears only when the
/// condition ceases.
#[derive(Debug)]
pub struct SustainedOverdrawDetector {
    config: OverdrawConfig,
    episode_start: Option<DateTime<Utc>>,
    /// Baseline captured when the episode opened; kept for observability.
    episode_baseline: Option<f64>,
}

impl SustainedOverdrawDetector {
    pub fn new(config: OverdrawConfig) -> Self {
        Self {
            config,
            episode_start: None,
            episode_baseline: None,
        }
    }

    /// Evaluate the 10-minute rolling mean against the expected baseline for
    /// the current hour.
    pub fn detect(
        &mut self,
        rolling_mean_10min: f64,
        baseline_hourly_mean: f64,
        zone_id: &str,
        now: DateTime<Utc>,
    ) -> Option<Anomaly> {
        let threshold = baseline_hourly_mean * self.config.overdraw_threshold;

        if rolling_mean_10min <= threshold {
            if self.episode_start.is_some() {
                debug!(zone_id, "overdraw episode ended");
            }
            self.episode_start = None;
            self.episode_baseline = None;
            return None;
        }

        let start = match self.episode_start {
            Some(s) => s,
            None => {
                debug!(
                    zone_id,
                    rolling_mean_10min, baseline_hourly_mean, "overdraw episode opened"
                );
                self.episode_start = Some(now);
                self.episode_baseline = Some(baseline_hourly_mean);
                now
            }
        };

        let duration = (now - start).num_milliseconds() as f64 / 1000.0;
        if duration < self.config.min_duration_seconds {
            return None;
        }

        let overdraw_ratio = rolling_mean_10min / baseline_hourly_mean;

        let severity = if overdraw_ratio >= 1.5 {
            Severity::High
        } else if overdraw_ratio >= 1.3 {
            Severity::Medium
        } else {
            Severity::Low
        };

        let confidence = (0.6 + duration / 3600.0).min(0.90);

        Some(Anomaly {
            anomaly_type: AnomalyType::SustainedOverdraw,
            zone_id: zone_id.to_string(),
            timestamp: now,
            severity,
            confidence,
            evidence: AnomalyEvidence {
                mean: rolling_mean_10min,
                std: 0.0,
                z_score: 0.0,
                duration_seconds: duration,
                threshold,
                samples_analyzed: 0,
            },
            recommended_action: "Sustained high load detected. Consider load management or \
                                 capacity upgrade."
                .to_string(),
        })
    }
}
