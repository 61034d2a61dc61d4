//! Anomaly event types produced by the detectors.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Kind of grid anomaly a detector can raise.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum AnomalyType {
    Spike,
    SustainedOverdraw,
    Outage,
    MeterMismatch,
}

/// Severity tier attached to a detection.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Severity {
    High,
    Medium,
    Low,
}

/// Snapshot of the statistics that justified a detection.
///
/// Purely informational; never mutated after creation. Fields that do not
/// apply to a given detector are left at zero.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnomalyEvidence {
    pub mean: f64,
    pub std: f64,
    pub z_score: f64,
    pub duration_seconds: f64,
    pub threshold: f64,
    pub samples_analyzed: usize,
}

/// A detected anomaly with metadata.
///
/// Created only by a detector's `detect` call when its condition and gating
/// policy are satisfied; ownership transfers to the caller.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Anomaly {
    pub anomaly_type: AnomalyType,
    pub zone_id: String,
    pub timestamp: DateTime<Utc>,
    pub severity: Severity,
    pub confidence: f64,
    pub evidence: AnomalyEvidence,
    pub recommended_action: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn anomaly_type_wire_names() {
        let j = serde_json::to_string(&AnomalyType::SustainedOverdraw).unwrap();
        assert_eq!(j, "\"SUSTAINED_OVERDRAW\"");
        let j = serde_json::to_string(&AnomalyType::MeterMismatch).unwrap();
        assert_eq!(j, "\"METER_MISMATCH\"");
    }

    #[test]
    fn severity_wire_names() {
        assert_eq!(serde_json::to_string(&Severity::High).unwrap(), "\"HIGH\"");
        assert_eq!(serde_json::to_string(&Severity::Low).unwrap(), "\"LOW\"");
    }

    #[test]
    fn anomaly_round_trips() {
        let a = Anomaly {
            anomaly_type: AnomalyType::Spike,
            zone_id: "BGY-001".to_string(),
            timestamp: Utc::now(),
            severity: Severity::Medium,
            confidence: 0.82,
            evidence: AnomalyEvidence {
                mean: 100.0,
                std: 5.0,
                z_score: 4.0,
                duration_seconds: 15.0,
                threshold: 115.0,
                samples_analyzed: 60,
            },
            recommended_action: "Investigate sudden load increase.".to_string(),
        };
        let json = serde_json::to_string(&a).unwrap();
        let back: Anomaly = serde_json::from_str(&json).unwrap();
        assert_eq!(back.anomaly_type, AnomalyType::Spike);
        assert_eq!(back.evidence, a.evidence);
    }
}
