//! Feeder-to-node mismatch detection (potential non-technical loss).

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::debug;

use gridwatch_core::{Anomaly, AnomalyEvidence, AnomalyType, Severity};

/// Tunables for [`MismatchDetector`].
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(deny_unknown_fields, default)]
pub struct MismatchConfig {
    /// Fraction of feeder power unaccounted for that counts as a mismatch.
    pub mismatch_threshold: f64,
    /// Seconds the mismatch must persist before emitting.
    pub min_duration_seconds: f64,
}

impl Default for MismatchConfig {
    fn default() -> Self {
        Self {
            mismatch_threshold: 0.12,
            min_duration_seconds: 1800.0,
        }
    }
}

/// Detects persistent divergence between feeder draw and the sum of node
/// measurements.
///
/// One-shot per episode: once an alert has been emitted the episode is
/// marked fired and stays silent until the condition ceases and a new
/// episode opens. Near-zero feeder power (< 1 W) is never evaluated.
#[derive(Debug)]
pub struct MismatchDetector {
    config: MismatchConfig,
    episode_start: Option<DateTime<Utc>>,
    fired: bool,
}

impl MismatchDetector {
    pub fn new(config: MismatchConfig) -> Self {
        Self {
            config,
            episode_start: None,
            fired: false,
        }
    }

    pub fn detect(
        &mut self,
        feeder_power: f64,
        sum_node_power: f64,
        zone_id: &str,
        now: DateTime<Utc>,
    ) -> Option<Anomaly> {
        // Guard against division blow-up on a dead or near-dead feeder.
        if feeder_power < 1.0 {
            return None;
        }

        let mismatch_ratio = (feeder_power - sum_node_power).abs() / feeder_power;

        if mismatch_ratio < self.config.mismatch_threshold {
            if self.episode_start.is_some() {
                debug!(zone_id, "mismatch episode ended");
            }
            self.episode_start = None;
            self.fired = false;
            return None;
        }

        let start = match self.episode_start {
            Some(s) => s,
            None => {
                debug!(zone_id, mismatch_ratio, "mismatch episode opened");
                self.episode_start = Some(now);
                self.fired = false;
                now
            }
        };

        let duration = (now - start).num_milliseconds() as f64 / 1000.0;
        if duration < self.config.min_duration_seconds || self.fired {
            return None;
        }

        let severity = if mismatch_ratio >= 0.25 {
            Severity::High
        } else if mismatch_ratio >= 0.18 {
            Severity::Medium
        } else {
            Severity::Low
        };

        let confidence = (0.5 + duration / 7200.0).min(0.85);

        self.fired = true;

        Some(Anomaly {
            anomaly_type: AnomalyType::MeterMismatch,
            zone_id: zone_id.to_string(),
            timestamp: now,
            severity,
            confidence,
            evidence: AnomalyEvidence {
                mean: mismatch_ratio,
                std: 0.0,
                z_score: 0.0,
                duration_seconds: duration,
                threshold: self.config.mismatch_threshold,
                samples_analyzed: 0,
            },
            recommended_action: "Significant mismatch detected. Possible NTL or meter \
                                 calibration issue. Schedule investigation."
                .to_string(),
        })
    }
}
