//! Outage detection: total loss of supply sustained over time.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::debug;

use gridwatch_core::{Anomaly, AnomalyEvidence, AnomalyType, Severity};

/// Tunables for [`OutageDetector`].
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(deny_unknown_fields, default)]
pub struct OutageConfig {
    /// Power at or below this is treated as no supply.
    pub outage_threshold_w: f64,
    /// Seconds of continuous low power before emitting.
    /// Production deployments use 1800; the default suits demo cadence.
    pub min_duration_seconds: f64,
    /// Consecutive low readings required, so a single bad sample cannot alert.
    pub min_consecutive_samples: u32,
    /// Seconds after an emitted alert during which re-detection is suppressed.
    pub alert_cooldown_seconds: f64,
}

impl Default for OutageConfig {
    fn default() -> Self {
        Self {
            outage_threshold_w: 5.0,
            min_duration_seconds: 30.0,
            min_consecutive_samples: 3,
            alert_cooldown_seconds: 300.0,
        }
    }
}

/// Detects power outages.
///
/// Three-phase state machine: Normal → Candidate (timer and counter running)
/// → Cooldown (post-alert, suppressing re-detection) → back to Normal on
/// restoration. The cooldown check runs before condition evaluation, and one
/// above-threshold sample clears the episode, the counter, AND the cooldown;
/// power restoration immediately re-arms alerting.
#[derive(Debug)]
pub struct OutageDetector {
    config: OutageConfig,
    episode_start: Option<DateTime<Utc>>,
    consecutive_low: u32,
    last_alert: Option<DateTime<Utc>>,
}

impl OutageDetector {
    pub fn new(config: OutageConfig) -> Self {
        Self {
            config,
            episode_start: None,
            consecutive_low: 0,
            last_alert: None,
        }
    }

    pub fn detect(&mut self, current_value: f64, zone_id: &str, now: DateTime<Utc>) -> Option<Anomaly> {
        if let Some(last) = self.last_alert {
            let since = (now - last).num_milliseconds() as f64 / 1000.0;
            if since < self.config.alert_cooldown_seconds {
                return None;
            }
        }

        if current_value > self.config.outage_threshold_w {
            // Power restored: clear episode state and re-arm alerting.
            if self.episode_start.is_some() || self.last_alert.is_some() {
                debug!(zone_id, current_value, "power restored, outage state cleared");
            }
            self.episode_start = None;
            self.consecutive_low = 0;
            self.last_alert = None;
            return None;
        }

        self.consecutive_low += 1;
        let start = match self.episode_start {
            Some(s) => s,
            None => {
                self.episode_start = Some(now);
                now
            }
        };

        let duration = (now - start).num_milliseconds() as f64 / 1000.0;

        if duration < self.config.min_duration_seconds
            || self.consecutive_low < self.config.min_consecutive_samples
        {
            return None;
        }

        let evidence = AnomalyEvidence {
            mean: current_value,
            std: 0.0,
            z_score: 0.0,
            duration_seconds: duration,
            threshold: self.config.outage_threshold_w,
            samples_analyzed: self.consecutive_low as usize,
        };

        // Alert emitted: enter cooldown and reset the episode.
        self.last_alert = Some(now);
        self.episode_start = None;
        self.consecutive_low = 0;

        Some(Anomaly {
            anomaly_type: AnomalyType::Outage,
            zone_id: zone_id.to_string(),
            timestamp: now,
            severity: Severity::High,
            confidence: 0.95,
            evidence,
            recommended_action: "Power outage detected. Dispatch crew immediately. Notify \
                                 affected residents."
                .to_string(),
        })
    }
}
