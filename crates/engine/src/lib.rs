//! Zone registry and batch evaluation.
//!
//! The [`Engine`] owns one [`ZoneMonitor`] per configured zone and routes
//! telemetry to it. Zones are independent, so batch ingestion fans out
//! across them with rayon; within one zone, readings are applied in
//! timestamp order on a single thread (monitors are not safe for concurrent
//! calls on the same instance).

pub mod alerts;
pub mod monitor;
pub mod zones;

use std::collections::HashMap;
use std::path::Path;

use chrono::{DateTime, Utc};
use rayon::prelude::*;
use serde::Serialize;
use tracing::{info, warn};
use uuid::Uuid;

use gridwatch_core::{Anomaly, EnvironmentSample, FeederReading, GridwatchError, Reading};

pub use alerts::{AlertRecord, EscalationReceipt};
pub use monitor::{MonitorParams, ZoneForecast, ZoneHealth, ZoneMonitor};
pub use zones::{DetectorOverrides, ZoneFile, ZoneSpec};

/// Outcome of one ingestion batch.
#[derive(Debug, Default, Serialize)]
pub struct IngestSummary {
    pub accepted: usize,
    pub rejected: usize,
    pub anomalies: Vec<Anomaly>,
}

/// Zone metadata for listing endpoints.
#[derive(Debug, Clone, Serialize)]
pub struct ZoneInfo {
    pub zone_id: String,
    pub name: String,
    pub transformer_capacity_kw: f64,
}

/// Holds every zone's monitoring state.
pub struct Engine {
    zones: HashMap<String, ZoneMonitor>,
}

impl Engine {
    /// Build monitors for each zone spec using shared defaults.
    pub fn from_specs(specs: &[ZoneSpec], defaults: &MonitorParams) -> Self {
        let zones = specs
            .iter()
            .map(|spec| {
                (
                    spec.zone_id.clone(),
                    ZoneMonitor::from_spec(spec, defaults),
                )
            })
            .collect();
        Self { zones }
    }

    /// Load the zone topology file and build the engine from it.
    pub fn from_zone_file(path: &Path, defaults: &MonitorParams) -> Result<Self, GridwatchError> {
        let file = ZoneFile::load(path)?;
        info!("Loaded {} zones from {}", file.zones.len(), path.display());
        Ok(Self::from_specs(&file.zones, defaults))
    }

    pub fn zone_count(&self) -> usize {
        self.zones.len()
    }

    pub fn total_alert_count(&self) -> usize {
        self.zones.values().map(|m| m.alert_count()).sum()
    }

    /// Metadata for all configured zones, sorted by id.
    pub fn zone_infos(&self) -> Vec<ZoneInfo> {
        let mut infos: Vec<ZoneInfo> = self
            .zones
            .values()
            .map(|m| ZoneInfo {
                zone_id: m.zone_id().to_string(),
                name: m.name().to_string(),
                transformer_capacity_kw: m.capacity_kw(),
            })
            .collect();
        infos.sort_by(|a, b| a.zone_id.cmp(&b.zone_id));
        infos
    }

    /// Validate, route, and evaluate a batch of node readings.
    ///
    /// Readings for unknown zones or with malformed numerics are counted as
    /// rejected. Each zone's slice is applied in timestamp order; distinct
    /// zones run in parallel.
    pub fn ingest_batch(&mut self, readings: &[Reading], now: DateTime<Utc>) -> IngestSummary {
        let mut summary = IngestSummary::default();
        let mut grouped: HashMap<&str, Vec<&Reading>> = HashMap::new();

        for reading in readings {
            if let Err(e) = reading.validate() {
                warn!("rejected reading: {e}");
                summary.rejected += 1;
                continue;
            }
            if !self.zones.contains_key(&reading.zone_id) {
                warn!(zone_id = %reading.zone_id, "reading for unknown zone rejected");
                summary.rejected += 1;
                continue;
            }
            grouped.entry(reading.zone_id.as_str()).or_default().push(reading);
            summary.accepted += 1;
        }

        let mut work: Vec<(&mut ZoneMonitor, Vec<&Reading>)> = self
            .zones
            .iter_mut()
            .filter_map(|(id, monitor)| grouped.remove(id.as_str()).map(|rs| (monitor, rs)))
            .collect();

        let batches: Vec<Vec<Anomaly>> = work
            .par_iter_mut()
            .map(|(monitor, batch)| {
                batch.sort_by_key(|r| r.timestamp);
                batch
                    .iter()
                    .flat_map(|r| monitor.ingest(r, now))
                    .collect()
            })
            .collect();

        summary.anomalies = batches.into_iter().flatten().collect();
        summary
    }

    /// Evaluate a feeder-vs-nodes measurement for one zone.
    pub fn ingest_feeder(
        &mut self,
        feeder: &FeederReading,
        now: DateTime<Utc>,
    ) -> Result<Option<Anomaly>, GridwatchError> {
        let monitor = self.monitor_mut(&feeder.zone_id)?;
        Ok(monitor.ingest_feeder(feeder.feeder_power_w, feeder.sum_node_power_w, now))
    }

    /// Attach the latest ambient-conditions sample to a zone.
    pub fn record_environment(
        &mut self,
        zone_id: &str,
        sample: EnvironmentSample,
    ) -> Result<(), GridwatchError> {
        self.monitor_mut(zone_id)?.record_environment(sample);
        Ok(())
    }

    pub fn health(&self, zone_id: &str, now: DateTime<Utc>) -> Result<ZoneHealth, GridwatchError> {
        Ok(self.monitor(zone_id)?.health(now))
    }

    pub fn forecast(
        &self,
        zone_id: &str,
        now: DateTime<Utc>,
    ) -> Result<ZoneForecast, GridwatchError> {
        self.monitor(zone_id)?.forecast(now)
    }

    pub fn alerts(&self, zone_id: &str, limit: usize) -> Result<Vec<AlertRecord>, GridwatchError> {
        Ok(self.monitor(zone_id)?.alerts(limit))
    }

    pub fn escalate(
        &mut self,
        zone_id: &str,
        alert_id: Uuid,
        escalated_by: &str,
        notes: Option<String>,
        now: DateTime<Utc>,
    ) -> Result<EscalationReceipt, GridwatchError> {
        self.monitor_mut(zone_id)?
            .escalate(alert_id, escalated_by, notes, now)
    }

    fn monitor(&self, zone_id: &str) -> Result<&ZoneMonitor, GridwatchError> {
        self.zones
            .get(zone_id)
            .ok_or_else(|| GridwatchError::ZoneNotFound(zone_id.to_string()))
    }

    fn monitor_mut(&mut self, zone_id: &str) -> Result<&mut ZoneMonitor, GridwatchError> {
        self.zones
            .get_mut(zone_id)
            .ok_or_else(|| GridwatchError::ZoneNotFound(zone_id.to_string()))
    }
}
