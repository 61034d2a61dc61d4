//! Validated weight vector for the six BGHI components.

use serde::{Deserialize, Serialize};

use gridwatch_core::GridwatchError;

/// Tolerance when checking that weights sum to 1.0.
const SUM_TOLERANCE: f64 = 1e-6;

/// Component weights for the BGHI deterioration sum.
///
/// Invariant: every weight is non-negative and the six weights sum to 1.0.
/// Enforced at construction; out-of-spec vectors are rejected, not silently
/// renormalized.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BghiWeights {
    pub load_stress: f64,
    pub outage_score: f64,
    pub power_quality: f64,
    pub anomaly_frequency: f64,
    pub environmental_stress: f64,
    pub mismatch_score: f64,
}

impl BghiWeights {
    pub fn new(
        load_stress: f64,
        outage_score: f64,
        power_quality: f64,
        anomaly_frequency: f64,
        environmental_stress: f64,
        mismatch_score: f64,
    ) -> Result<Self, GridwatchError> {
        let w = Self {
            load_stress,
            outage_score,
            power_quality,
            anomaly_frequency,
            environmental_stress,
            mismatch_score,
        };
        w.validate()?;
        Ok(w)
    }

    fn validate(&self) -> Result<(), GridwatchError> {
        let parts = [
            ("load_stress", self.load_stress),
            ("outage_score", self.outage_score),
            ("power_quality", self.power_quality),
            ("anomaly_frequency", self.anomaly_frequency),
            ("environmental_stress", self.environmental_stress),
            ("mismatch_score", self.mismatch_score),
        ];
        for (name, v) in parts {
            if !v.is_finite() || v < 0.0 {
                return Err(GridwatchError::InvalidWeights(format!(
                    "{name} must be a non-negative finite number, got {v}"
                )));
            }
        }
        let sum: f64 = parts.iter().map(|(_, v)| v).sum();
        if (sum - 1.0).abs() > SUM_TOLERANCE {
            return Err(GridwatchError::InvalidWeights(format!(
                "weights must sum to 1.0, got {sum}"
            )));
        }
        Ok(())
    }
}

impl Default for BghiWeights {
    /// Standard operator weighting: load stress dominates, mismatch trails.
    fn default() -> Self {
        Self {
            load_stress: 0.35,
            outage_score: 0.25,
            power_quality: 0.15,
            anomaly_frequency: 0.10,
            environmental_stress: 0.10,
            mismatch_score: 0.05,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_weights_sum_to_one() {
        let w = BghiWeights::default();
        let sum = w.load_stress
            + w.outage_score
            + w.power_quality
            + w.anomaly_frequency
            + w.environmental_stress
            + w.mismatch_score;
        assert!((sum - 1.0).abs() < 1e-10);
        // And the default passes its own validation.
        assert!(w.validate().is_ok());
    }

    #[test]
    fn accepts_custom_unit_sum() {
        let w = BghiWeights::new(0.25, 0.25, 0.2, 0.1, 0.1, 0.1);
        assert!(w.is_ok());
    }

    #[test]
    fn rejects_non_unit_sum() {
        let w = BghiWeights::new(0.5, 0.5, 0.5, 0.0, 0.0, 0.0);
        assert!(w.is_err());
    }

    #[test]
    fn rejects_negative_component() {
        let w = BghiWeights::new(0.7, 0.5, -0.2, 0.0, 0.0, 0.0);
        assert!(w.is_err());
    }

    #[test]
    fn rejects_nan() {
        let w = BghiWeights::new(f64::NAN, 0.25, 0.25, 0.25, 0.25, 0.0);
        assert!(w.is_err());
    }
}
