//! Zone topology configuration, loaded from YAML at startup.

use std::collections::HashSet;
use std::path::Path;

use serde::{Deserialize, Serialize};

use gridwatch_core::GridwatchError;
use gridwatch_detect::{MismatchConfig, OutageConfig, OverdrawConfig, SpikeConfig};
use gridwatch_forecast::BaselinePattern;

/// Top-level zone topology document.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ZoneFile {
    pub zones: Vec<ZoneSpec>,
}

/// One monitored zone: a transformer service area with its metered nodes.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ZoneSpec {
    pub zone_id: String,
    pub name: String,
    pub transformer_capacity_kw: f64,
    /// Diurnal baseline pattern; zones without one get no overdraw
    /// detection or forecasting until a baseline is supplied.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub baseline: Option<BaselinePattern>,
    /// Per-zone detector tuning. Absent sections use crate defaults.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub detectors: Option<DetectorOverrides>,
}

/// Optional per-detector tuning blocks. Each block replaces that detector's
/// defaults wholesale; fields omitted inside a block fall back to the
/// detector's own defaults.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct DetectorOverrides {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub spike: Option<SpikeConfig>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub overdraw: Option<OverdrawConfig>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub outage: Option<OutageConfig>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub mismatch: Option<MismatchConfig>,
}

impl ZoneFile {
    /// Read and validate a zone topology file.
    pub fn load(path: &Path) -> Result<Self, GridwatchError> {
        let yaml = std::fs::read_to_string(path).map_err(|e| {
            GridwatchError::ZoneConfig(format!("failed to read {}: {e}", path.display()))
        })?;
        Self::parse(&yaml)
    }

    pub fn parse(yaml: &str) -> Result<Self, GridwatchError> {
        let file: ZoneFile = serde_yaml::from_str(yaml)
            .map_err(|e| GridwatchError::ZoneConfig(e.to_string()))?;
        file.validate()?;
        Ok(file)
    }

    fn validate(&self) -> Result<(), GridwatchError> {
        if self.zones.is_empty() {
            return Err(GridwatchError::ZoneConfig(
                "zone file defines no zones".to_string(),
            ));
        }
        let mut seen = HashSet::new();
        for zone in &self.zones {
            if !seen.insert(zone.zone_id.as_str()) {
                return Err(GridwatchError::ZoneConfig(format!(
                    "duplicate zone_id: {}",
                    zone.zone_id
                )));
            }
            if !zone.transformer_capacity_kw.is_finite() || zone.transformer_capacity_kw <= 0.0 {
                return Err(GridwatchError::ZoneConfig(format!(
                    "zone {} has non-positive transformer capacity",
                    zone.zone_id
                )));
            }
        }
        Ok(())
    }
}
