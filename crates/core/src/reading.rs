//! Telemetry reading types shared across the workspace.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::error::GridwatchError;

/// A single power reading from a smart-meter node.
///
/// Immutable once produced. `power_w` is instantaneous draw in watts;
/// voltage and current are optional depending on meter capability.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Reading {
    pub node_id: String,
    pub zone_id: String,
    pub timestamp: DateTime<Utc>,
    pub power_w: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub voltage_v: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub current_a: Option<f64>,
}

impl Reading {
    /// Validate numeric fields at the ingestion boundary.
    ///
    /// The analytic core assumes finite, non-negative power values; readings
    /// that fail here must be rejected before they reach any detector.
    pub fn validate(&self) -> Result<(), GridwatchError> {
        if !self.power_w.is_finite() {
            return Err(GridwatchError::InvalidReading(format!(
                "power_w is not finite for node {}",
                self.node_id
            )));
        }
        if self.power_w < 0.0 {
            return Err(GridwatchError::InvalidReading(format!(
                "power_w is negative ({}) for node {}",
                self.power_w, self.node_id
            )));
        }
        if let Some(v) = self.voltage_v {
            if !v.is_finite() || v < 0.0 {
                return Err(GridwatchError::InvalidReading(format!(
                    "voltage_v is invalid ({}) for node {}",
                    v, self.node_id
                )));
            }
        }
        if let Some(a) = self.current_a {
            if !a.is_finite() || a < 0.0 {
                return Err(GridwatchError::InvalidReading(format!(
                    "current_a is invalid ({}) for node {}",
                    a, self.node_id
                )));
            }
        }
        Ok(())
    }
}

/// A feeder-level measurement paired with the sum of its downstream nodes.
///
/// The feeder is the upstream supply point; absent loss or miscalibration the
/// node sum should approximately match the feeder draw.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FeederReading {
    pub zone_id: String,
    pub timestamp: DateTime<Utc>,
    pub feeder_power_w: f64,
    pub sum_node_power_w: f64,
}

/// An ambient-conditions sample attached to a zone's transformer site.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct EnvironmentSample {
    pub ambient_temp_c: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub humidity_pct: Option<f64>,
}
