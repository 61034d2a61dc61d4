//! Sudden power-spike detection.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::debug;

use gridwatch_core::{Anomaly, AnomalyEvidence, AnomalyType, Severity};

use crate::window::RollingWindow;

/// Tunables for [`SpikeDetector`].
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(deny_unknown_fields, default)]
pub struct SpikeConfig {
    /// Standard deviations above the rolling mean that count as a breach.
    pub z_threshold: f64,
    /// Consecutive breaching samples required before emitting.
    pub persistence_samples: u32,
    /// Floor on the breach threshold, so a flat window cannot alert on noise.
    pub absolute_min_w: f64,
    /// Assumed seconds between samples; used to estimate episode duration.
    pub sample_interval_secs: f64,
}

impl Default for SpikeConfig {
    fn default() -> Self {
        Self {
            z_threshold: 3.0,
            persistence_samples: 3,
            absolute_min_w: 50.0,
            sample_interval_secs: 5.0,
        }
    }
}

/// Detects sudden spikes in power consumption.
///
/// State is a single consecutive-breach counter, reset whenever the breach
/// condition is false. Each qualifying episode emits exactly once: the
/// counter resets after emission, so an immediate repeat breach needs a
/// fresh full run of `persistence_samples` to emit again.
#[derive(Debug)]
pub struct SpikeDetector {
    config: SpikeConfig,
    spike_counter: u32,
}

impl SpikeDetector {
    pub fn new(config: SpikeConfig) -> Self {
        Self {
            config,
            spike_counter: 0,
        }
    }

    /// Evaluate the latest reading against the rolling window.
    ///
    /// `duration_seconds` in the evidence is `counter × sample_interval`, an
    /// estimate from the sample cadence, not measured wall-clock time.
    pub fn detect(
        &mut self,
        current_value: f64,
        window: &RollingWindow,
        zone_id: &str,
        now: DateTime<Utc>,
    ) -> Option<Anomaly> {
        let mean = window.mean();
        let std = window.std();

        let threshold = (mean + self.config.z_threshold * std).max(self.config.absolute_min_w);

        if current_value > threshold {
            self.spike_counter += 1;
        } else {
            self.spike_counter = 0;
        }

        if self.spike_counter < self.config.persistence_samples {
            return None;
        }

        let z_score = if std > 0.0 {
            (current_value - mean) / std
        } else {
            0.0
        };

        let evidence = AnomalyEvidence {
            mean,
            std,
            z_score,
            duration_seconds: f64::from(self.spike_counter) * self.config.sample_interval_secs,
            threshold,
            samples_analyzed: window.len(),
        };

        let severity = if z_score >= 5.0 {
            Severity::High
        } else if z_score >= 3.5 {
            Severity::Medium
        } else {
            Severity::Low
        };

        let confidence = (0.5 + z_score / 10.0).min(0.95);

        debug!(
            zone_id,
            current_value, threshold, z_score, "spike persistence reached, emitting"
        );
        self.spike_counter = 0;

        Some(Anomaly {
            anomaly_type: AnomalyType::Spike,
            zone_id: zone_id.to_string(),
            timestamp: now,
            severity,
            confidence,
            evidence,
            recommended_action: "Investigate sudden load increase. Check for equipment \
                                 malfunction or unauthorized connection."
                .to_string(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ts(secs: i64) -> DateTime<Utc> {
        DateTime::from_timestamp(1_700_000_000 + secs, 0).unwrap()
    }

    /// Window of 30 steady readings around 100 W with a little variance.
    fn steady_window() -> RollingWindow {
        let mut w = RollingWindow::new(60);
        for i in 0..30 {
            let v = if i % 2 == 0 { 98.0 } else { 102.0 };
            w.add(v, ts(i));
        }
        w
    }

    #[test]
    fn below_persistence_never_emits() {
        let mut d = SpikeDetector::new(SpikeConfig::default());
        let w = steady_window();

        // persistence_samples - 1 breaches, then one normal sample.
        assert!(d.detect(500.0, &w, "BGY-001", ts(100)).is_none());
        assert!(d.detect(500.0, &w, "BGY-001", ts(105)).is_none());
        assert!(d.detect(100.0, &w, "BGY-001", ts(110)).is_none());
        // Counter was reset: two more breaches still do not emit.
        assert!(d.detect(500.0, &w, "BGY-001", ts(115)).is_none());
        assert!(d.detect(500.0, &w, "BGY-001", ts(120)).is_none());
    }

    #[test]
    fn emits_once_at_persistence_then_resets() {
        let mut d = SpikeDetector::new(SpikeConfig::default());
        let w = steady_window();

        assert!(d.detect(500.0, &w, "BGY-001", ts(0)).is_none());
        assert!(d.detect(500.0, &w, "BGY-001", ts(5)).is_none());
        let anomaly = d.detect(500.0, &w, "BGY-001", ts(10)).unwrap();

        assert_eq!(anomaly.anomaly_type, AnomalyType::Spike);
        assert_eq!(anomaly.zone_id, "BGY-001");
        assert_eq!(anomaly.evidence.samples_analyzed, 30);
        // 3 samples at the default 5s cadence.
        assert_eq!(anomaly.evidence.duration_seconds, 15.0);

        // An immediate repeat breach needs a fresh full run.
        assert!(d.detect(500.0, &w, "BGY-001", ts(15)).is_none());
        assert!(d.detect(500.0, &w, "BGY-001", ts(20)).is_none());
        assert!(d.detect(500.0, &w, "BGY-001", ts(25)).is_some());
    }

    #[test]
    fn severity_bands_follow_z_score() {
        let w = steady_window();
        let mean = w.mean();
        let std = w.std();
        assert!(std > 0.0);

        // Build values that land in each z band.
        let high = mean + 6.0 * std;
        let medium = mean + 4.0 * std;

        let mut d = SpikeDetector::new(SpikeConfig {
            persistence_samples: 1,
            ..SpikeConfig::default()
        });
        let a = d.detect(high, &w, "Z", ts(0)).unwrap();
        assert_eq!(a.severity, Severity::High);

        let a = d.detect(medium, &w, "Z", ts(5)).unwrap();
        assert_eq!(a.severity, Severity::Medium);
    }

    #[test]
    fn zero_std_yields_zero_z_score() {
        // Flat window: every value identical, std == 0.
        let mut w = RollingWindow::new(10);
        for i in 0..10 {
            w.add(100.0, ts(i));
        }
        let mut d = SpikeDetector::new(SpikeConfig {
            persistence_samples: 1,
            ..SpikeConfig::default()
        });
        let a = d.detect(400.0, &w, "Z", ts(20)).unwrap();
        assert_eq!(a.evidence.z_score, 0.0);
        assert_eq!(a.severity, Severity::Low);
        assert_eq!(a.confidence, 0.5);
    }

    #[test]
    fn absolute_floor_suppresses_noise_alerts() {
        // Tiny loads: mean + 3*std is far below the 50 W floor.
        let mut w = RollingWindow::new(10);
        for i in 0..10 {
            w.add(1.0, ts(i));
        }
        let mut d = SpikeDetector::new(SpikeConfig {
            persistence_samples: 1,
            ..SpikeConfig::default()
        });
        // 40 W would be a huge z-score but is under the absolute floor.
        assert!(d.detect(40.0, &w, "Z", ts(20)).is_none());
        // Above the floor it fires.
        assert!(d.detect(60.0, &w, "Z", ts(25)).is_some());
    }

    #[test]
    fn config_fills_omitted_fields_with_defaults() {
        // Zone files override detectors partially; omitted fields must fall
        // back to defaults.
        let c: SpikeConfig = serde_json::from_str(r#"{"z_threshold": 2.5}"#).unwrap();
        assert_eq!(c.z_threshold, 2.5);
        assert_eq!(c.persistence_samples, 3);
        assert_eq!(c.absolute_min_w, 50.0);
    }

    #[test]
    fn confidence_is_capped() {
        let mut w = RollingWindow::new(10);
        for i in 0..10 {
            let v = if i % 2 == 0 { 99.0 } else { 101.0 };
            w.add(v, ts(i));
        }
        let mut d = SpikeDetector::new(SpikeConfig {
            persistence_samples: 1,
            ..SpikeConfig::default()
        });
        let a = d.detect(10_000.0, &w, "Z", ts(20)).unwrap();
        assert_eq!(a.confidence, 0.95);
    }
}
