//! Per-zone monitoring state.
//!
//! A [`ZoneMonitor`] owns everything stateful for one zone: the rolling
//! windows, the four detectors, the bounded alert log, and the bookkeeping
//! that feeds the health-index sub-scores. Calls on one monitor must be
//! serialized; distinct monitors are independent and safe to evaluate in
//! parallel.

use std::collections::VecDeque;

use chrono::{DateTime, Duration, Timelike, Utc};
use serde::Serialize;
use tracing::debug;
use uuid::Uuid;

use gridwatch_core::{Anomaly, AnomalyType, EnvironmentSample, GridwatchError, Reading};
use gridwatch_detect::{
    MismatchConfig, MismatchDetector, OutageConfig, OutageDetector, OverdrawConfig,
    RollingWindow, SpikeConfig, SpikeDetector, SustainedOverdrawDetector,
};
use gridwatch_forecast::{
    assess_overload_risk, peak_risk, AlertParams, EwmaForecaster, ForecastSlot, HourlyBaseline,
    PredictiveAlert,
};
use gridwatch_health::{
    calculate_bghi, scores, BghiComponents, BghiResult, BghiWeights, PowerQualityInput,
    ScoreParams,
};

use crate::alerts::{AlertRecord, EscalationReceipt};
use crate::zones::ZoneSpec;

/// Seconds of history that feed the 24-hour sub-scores.
const DAY_SECONDS: i64 = 24 * 3600;

/// Per-zone tuning assembled from defaults and the zone spec.
#[derive(Debug, Clone)]
pub struct MonitorParams {
    /// Samples kept for spike statistics and voltage-deviation tracking.
    pub window_size: usize,
    /// Expected seconds between samples; drives the 10-minute window size
    /// and outage-minute accounting.
    pub sample_interval_secs: f64,
    pub spike: SpikeConfig,
    pub overdraw: OverdrawConfig,
    pub outage: OutageConfig,
    pub mismatch: MismatchConfig,
    pub alert_params: AlertParams,
    pub score_params: ScoreParams,
    pub weights: BghiWeights,
    /// EWMA smoothing parameter.
    pub alpha: f64,
    /// Nominal service voltage and acceptable deviation band.
    pub nominal_voltage_v: f64,
    pub voltage_band_pct: f64,
    /// Alert log capacity (oldest evicted).
    pub max_alerts: usize,
}

impl Default for MonitorParams {
    fn default() -> Self {
        Self {
            window_size: 60,
            sample_interval_secs: 5.0,
            spike: SpikeConfig::default(),
            overdraw: OverdrawConfig::default(),
            outage: OutageConfig::default(),
            mismatch: MismatchConfig::default(),
            alert_params: AlertParams::default(),
            score_params: ScoreParams::default(),
            weights: BghiWeights::default(),
            alpha: 0.5,
            nominal_voltage_v: 230.0,
            voltage_band_pct: 10.0,
            max_alerts: 500,
        }
    }
}

/// Health-index snapshot for a zone.
#[derive(Debug, Clone, Serialize)]
pub struct ZoneHealth {
    pub zone_id: String,
    pub timestamp: DateTime<Utc>,
    pub bghi: BghiResult,
    pub components: BghiComponents,
    pub transformer_load_pct: f64,
}

/// 24-hour forecast for a zone, with peak risk and the optional alert.
#[derive(Debug, Clone, Serialize)]
pub struct ZoneForecast {
    pub zone_id: String,
    pub timestamp: DateTime<Utc>,
    pub predictions: Vec<ForecastSlot>,
    pub max_risk_hour: u32,
    pub max_risk_ratio: f64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub predictive_alert: Option<PredictiveAlert>,
}

/// All monitoring state for one zone.
#[derive(Debug)]
pub struct ZoneMonitor {
    zone_id: String,
    name: String,
    capacity_kw: f64,
    params: MonitorParams,

    // Windows over the zone's reading stream.
    power_window: RollingWindow,
    ten_min_window: RollingWindow,
    /// 1.0 per sample whose voltage sat outside the acceptable band, 0.0
    /// otherwise; the mean is the deviation fraction.
    voltage_dev_window: RollingWindow,

    spike: SpikeDetector,
    overdraw: SustainedOverdrawDetector,
    outage: OutageDetector,
    mismatch: MismatchDetector,

    baseline: Option<HourlyBaseline>,

    /// Timestamps of at-or-below-outage-threshold samples in the last 24 h.
    low_sample_times: VecDeque<DateTime<Utc>>,
    /// (timestamp, type) of anomalies raised in the last 24 h.
    recent_anomalies: VecDeque<(DateTime<Utc>, AnomalyType)>,
    latest_mismatch_ratio: f64,
    environment: Option<EnvironmentSample>,

    alert_log: VecDeque<AlertRecord>,
}

impl ZoneMonitor {
    pub fn from_spec(spec: &ZoneSpec, defaults: &MonitorParams) -> Self {
        let mut params = defaults.clone();
        if let Some(overrides) = &spec.detectors {
            if let Some(c) = &overrides.spike {
                params.spike = c.clone();
            }
            if let Some(c) = &overrides.overdraw {
                params.overdraw = c.clone();
            }
            if let Some(c) = &overrides.outage {
                params.outage = c.clone();
            }
            if let Some(c) = &overrides.mismatch {
                params.mismatch = c.clone();
            }
        }

        let ten_min_samples =
            ((600.0 / params.sample_interval_secs).round() as usize).max(1);

        Self {
            zone_id: spec.zone_id.clone(),
            name: spec.name.clone(),
            capacity_kw: spec.transformer_capacity_kw,
            power_window: RollingWindow::new(params.window_size),
            ten_min_window: RollingWindow::new(ten_min_samples),
            voltage_dev_window: RollingWindow::new(params.window_size),
            spike: SpikeDetector::new(params.spike.clone()),
            overdraw: SustainedOverdrawDetector::new(params.overdraw.clone()),
            outage: OutageDetector::new(params.outage.clone()),
            mismatch: MismatchDetector::new(params.mismatch.clone()),
            baseline: spec.baseline.as_ref().map(|p| p.build()),
            low_sample_times: VecDeque::new(),
            recent_anomalies: VecDeque::new(),
            latest_mismatch_ratio: 0.0,
            environment: None,
            alert_log: VecDeque::new(),
            params,
        }
    }

    pub fn zone_id(&self) -> &str {
        &self.zone_id
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn capacity_kw(&self) -> f64 {
        self.capacity_kw
    }

    pub fn has_baseline(&self) -> bool {
        self.baseline.is_some()
    }

    /// Replace the hourly baseline (e.g. learned from history by a caller).
    pub fn set_baseline(&mut self, baseline: HourlyBaseline) {
        self.baseline = Some(baseline);
    }

    pub fn record_environment(&mut self, sample: EnvironmentSample) {
        self.environment = Some(sample);
    }

    /// Feed one node reading through the per-zone detectors.
    ///
    /// Returns the anomalies raised by this sample (each detector emits at
    /// most one). Spike statistics are taken from the window *before* the
    /// sample is appended, so a reading is never compared against itself.
    pub fn ingest(&mut self, reading: &Reading, now: DateTime<Utc>) -> Vec<Anomaly> {
        let mut raised = Vec::new();
        let power_w = reading.power_w;

        if let Some(anomaly) = self.spike.detect(power_w, &self.power_window, &self.zone_id, now)
        {
            raised.push(anomaly);
        }

        self.power_window.add(power_w, reading.timestamp);
        self.ten_min_window.add(power_w, reading.timestamp);

        if let Some(v) = reading.voltage_v {
            let deviation_pct =
                (v - self.params.nominal_voltage_v).abs() / self.params.nominal_voltage_v * 100.0;
            let outside = deviation_pct > self.params.voltage_band_pct;
            self.voltage_dev_window.add(f64::from(u8::from(outside)), reading.timestamp);
        }

        match &self.baseline {
            Some(baseline) => {
                // Baseline is configured in kW; the reading stream is watts.
                let baseline_w = baseline.get(now.hour()) * 1000.0;
                if let Some(anomaly) = self.overdraw.detect(
                    self.ten_min_window.mean(),
                    baseline_w,
                    &self.zone_id,
                    now,
                ) {
                    raised.push(anomaly);
                }
            }
            None => {
                debug!(zone_id = %self.zone_id, "no baseline, skipping overdraw detection");
            }
        }

        if let Some(anomaly) = self.outage.detect(power_w, &self.zone_id, now) {
            raised.push(anomaly);
        }

        if power_w <= self.params.outage.outage_threshold_w {
            self.low_sample_times.push_back(now);
        }
        self.prune_24h(now);

        for anomaly in &raised {
            self.record_alert(anomaly.clone(), now);
        }
        raised
    }

    /// Evaluate a feeder-vs-nodes measurement for mismatch.
    pub fn ingest_feeder(
        &mut self,
        feeder_power_w: f64,
        sum_node_power_w: f64,
        now: DateTime<Utc>,
    ) -> Option<Anomaly> {
        if feeder_power_w >= 1.0 {
            self.latest_mismatch_ratio =
                (feeder_power_w - sum_node_power_w).abs() / feeder_power_w;
        }

        let anomaly =
            self.mismatch
                .detect(feeder_power_w, sum_node_power_w, &self.zone_id, now)?;
        self.record_alert(anomaly.clone(), now);
        Some(anomaly)
    }

    /// Compute the current BGHI snapshot.
    pub fn health(&self, now: DateTime<Utc>) -> ZoneHealth {
        let p = &self.params.score_params;

        let recent_mean_kw = self.ten_min_window.mean() / 1000.0;
        let load_pct = recent_mean_kw / self.capacity_kw * 100.0;

        let outage_minutes = self.low_sample_times.len() as f64
            * self.params.sample_interval_secs
            / 60.0;

        let pq_input = if self.voltage_dev_window.is_empty() {
            PowerQualityInput::EventProxy(self.spike_count_24h())
        } else {
            PowerQualityInput::VoltageDeviation(self.voltage_dev_window.mean())
        };

        let environmental_stress = match self.environment {
            Some(env) => scores::compute_environmental_stress_score(
                env.ambient_temp_c,
                env.humidity_pct,
                p,
            ),
            None => 0.0,
        };

        let components = BghiComponents {
            load_stress: scores::compute_load_stress(load_pct, p),
            outage_score: scores::compute_outage_score(outage_minutes, p),
            power_quality: scores::compute_power_quality_score(pq_input, p),
            anomaly_frequency: scores::compute_anomaly_frequency_score(
                self.recent_anomalies.len() as u32,
                p,
            ),
            environmental_stress,
            mismatch_score: scores::compute_mismatch_score(self.latest_mismatch_ratio, p),
        };

        ZoneHealth {
            zone_id: self.zone_id.clone(),
            timestamp: now,
            bghi: calculate_bghi(&components, &self.params.weights),
            components,
            transformer_load_pct: load_pct,
        }
    }

    /// Produce the 24-hour forecast with the optional predictive alert.
    pub fn forecast(&self, now: DateTime<Utc>) -> Result<ZoneForecast, GridwatchError> {
        let baseline = self
            .baseline
            .clone()
            .ok_or_else(|| GridwatchError::BaselineNotSet(self.zone_id.clone()))?;

        let current_hour = now.hour();
        // An empty window forecasts from the baseline itself (no adjustment).
        let recent_mean_kw = if self.ten_min_window.is_empty() {
            baseline.get(current_hour)
        } else {
            self.ten_min_window.mean() / 1000.0
        };

        let forecaster = EwmaForecaster::with_baseline(self.params.alpha, baseline);
        let slots = forecaster.forecast_24h(current_hour, recent_mean_kw, self.capacity_kw, now)?;

        let (max_risk_hour, max_risk_ratio) = match peak_risk(&slots) {
            Some(peak) => (peak.hour, peak.risk_ratio),
            None => (current_hour, 0.0),
        };

        let predictive_alert = assess_overload_risk(&slots, &self.params.alert_params);

        Ok(ZoneForecast {
            zone_id: self.zone_id.clone(),
            timestamp: now,
            predictions: slots,
            max_risk_hour,
            max_risk_ratio,
            predictive_alert,
        })
    }

    /// Most recent alerts, newest first.
    pub fn alerts(&self, limit: usize) -> Vec<AlertRecord> {
        self.alert_log.iter().rev().take(limit).cloned().collect()
    }

    pub fn alert_count(&self) -> usize {
        self.alert_log.len()
    }

    /// Mark a stored alert as escalated.
    pub fn escalate(
        &mut self,
        alert_id: Uuid,
        escalated_by: &str,
        notes: Option<String>,
        now: DateTime<Utc>,
    ) -> Result<EscalationReceipt, GridwatchError> {
        let record = self
            .alert_log
            .iter_mut()
            .find(|r| r.alert_id == alert_id)
            .ok_or_else(|| GridwatchError::AlertNotFound(alert_id.to_string()))?;

        record.escalated = true;
        record.escalated_by = Some(escalated_by.to_string());
        record.escalated_at = Some(now);
        record.notes = notes;

        Ok(EscalationReceipt {
            alert_id,
            escalated_at: now,
            escalated_by: escalated_by.to_string(),
        })
    }

    fn spike_count_24h(&self) -> u32 {
        self.recent_anomalies
            .iter()
            .filter(|(_, t)| *t == AnomalyType::Spike)
            .count() as u32
    }

    fn record_alert(&mut self, anomaly: Anomaly, now: DateTime<Utc>) {
        self.recent_anomalies.push_back((now, anomaly.anomaly_type));
        if self.alert_log.len() == self.params.max_alerts {
            self.alert_log.pop_front();
        }
        self.alert_log.push_back(AlertRecord::new(anomaly));
    }

    fn prune_24h(&mut self, now: DateTime<Utc>) {
        let cutoff = now - Duration::seconds(DAY_SECONDS);
        while matches!(self.low_sample_times.front(), Some(ts) if *ts <= cutoff) {
            self.low_sample_times.pop_front();
        }
        while matches!(self.recent_anomalies.front(), Some((ts, _)) if *ts <= cutoff) {
            self.recent_anomalies.pop_front();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::zones::ZoneFile;

    fn ts(secs: i64) -> DateTime<Utc> {
        DateTime::from_timestamp(1_700_000_000 + secs, 0).unwrap()
    }

    fn spec() -> ZoneSpec {
        let yaml = r#"
zones:
  - zone_id: BGY-001
    name: Barangay San Antonio
    transformer_capacity_kw: 150
    baseline:
      peak_hour: 19
      peak_load_kw: 120
      base_load_kw: 60
"#;
        ZoneFile::parse(yaml).unwrap().zones.remove(0)
    }

    fn reading(power_w: f64, at: DateTime<Utc>) -> Reading {
        Reading {
            node_id: "SM-001".to_string(),
            zone_id: "BGY-001".to_string(),
            timestamp: at,
            power_w,
            voltage_v: None,
            current_a: None,
        }
    }

    #[test]
    fn spike_surfaces_through_monitor() {
        let mut m = ZoneMonitor::from_spec(&spec(), &MonitorParams::default());

        // Warm the window with steady load.
        for i in 0..30 {
            let v = if i % 2 == 0 { 990.0 } else { 1010.0 };
            assert!(m.ingest(&reading(v, ts(i * 5)), ts(i * 5)).is_empty());
        }

        // Three consecutive extreme samples: the third emits a spike.
        assert!(m.ingest(&reading(5000.0, ts(200)), ts(200)).is_empty());
        assert!(m.ingest(&reading(5000.0, ts(205)), ts(205)).is_empty());
        let raised = m.ingest(&reading(5000.0, ts(210)), ts(210));
        assert_eq!(raised.len(), 1);
        assert_eq!(raised[0].anomaly_type, AnomalyType::Spike);
        assert_eq!(m.alert_count(), 1);
    }

    #[test]
    fn outage_minutes_feed_health() {
        let mut m = ZoneMonitor::from_spec(&spec(), &MonitorParams::default());
        // 36 dead samples at the 5s cadence = 3 outage minutes.
        for i in 0..36 {
            m.ingest(&reading(0.0, ts(i * 5)), ts(i * 5));
        }
        let health = m.health(ts(200));
        // 3 min / 60 max × 100 = 5 points of outage deterioration.
        assert!((health.components.outage_score - 5.0).abs() < 1e-9);
        // An outage alert was also raised along the way.
        assert!(m.alert_count() >= 1);
    }

    #[test]
    fn voltage_deviation_preferred_over_event_proxy() {
        let mut m = ZoneMonitor::from_spec(&spec(), &MonitorParams::default());
        for i in 0..10 {
            let mut r = reading(1000.0, ts(i * 5));
            // Half the samples sit 15% under nominal.
            r.voltage_v = Some(if i % 2 == 0 { 230.0 } else { 195.0 });
            m.ingest(&r, ts(i * 5));
        }
        let health = m.health(ts(60));
        // 5 of 10 samples outside the band → 50% deviation → PQ score 50.
        assert!((health.components.power_quality - 50.0).abs() < 1e-9);
    }

    #[test]
    fn forecast_requires_baseline() {
        let yaml = r#"
zones:
  - zone_id: BGY-009
    name: No Baseline
    transformer_capacity_kw: 100
"#;
        let spec = ZoneFile::parse(yaml).unwrap().zones.remove(0);
        let mut m = ZoneMonitor::from_spec(&spec, &MonitorParams::default());
        assert!(!m.has_baseline());
        assert!(matches!(
            m.forecast(ts(0)),
            Err(GridwatchError::BaselineNotSet(_))
        ));

        // Supplying a baseline later (e.g. learned from history) enables it.
        m.set_baseline(gridwatch_forecast::HourlyBaseline::new([100.0; 24]));
        assert!(m.forecast(ts(0)).is_ok());
    }

    #[test]
    fn forecast_with_empty_window_tracks_baseline() {
        let m = ZoneMonitor::from_spec(&spec(), &MonitorParams::default());
        let f = m.forecast(ts(0)).unwrap();
        assert_eq!(f.predictions.len(), 24);
        for s in &f.predictions {
            assert_eq!(s.predicted_load_kw, s.baseline_load_kw);
        }
    }

    #[test]
    fn feeder_mismatch_updates_ratio_and_log() {
        let mut m = ZoneMonitor::from_spec(&spec(), &MonitorParams::default());
        assert!(m.ingest_feeder(1000.0, 850.0, ts(0)).is_none());
        let anomaly = m.ingest_feeder(1000.0, 850.0, ts(1800)).unwrap();
        assert_eq!(anomaly.anomaly_type, AnomalyType::MeterMismatch);

        let health = m.health(ts(1800));
        // ratio 0.15 over the 0.3 normalizer → 50.
        assert!((health.components.mismatch_score - 50.0).abs() < 1e-9);
    }

    #[test]
    fn escalation_marks_stored_alert() {
        let mut m = ZoneMonitor::from_spec(&spec(), &MonitorParams::default());
        m.ingest_feeder(1000.0, 700.0, ts(0));
        m.ingest_feeder(1000.0, 700.0, ts(1800));
        let alert_id = m.alerts(10)[0].alert_id;

        let receipt = m
            .escalate(alert_id, "operator-7", Some("verified on site".to_string()), ts(2000))
            .unwrap();
        assert_eq!(receipt.escalated_by, "operator-7");

        let record = &m.alerts(10)[0];
        assert!(record.escalated);
        assert_eq!(record.escalated_by.as_deref(), Some("operator-7"));

        // Unknown ids are an error, not a silent no-op.
        assert!(m.escalate(Uuid::new_v4(), "x", None, ts(2100)).is_err());
    }

    #[test]
    fn alert_log_is_bounded() {
        let defaults = MonitorParams {
            max_alerts: 5,
            ..MonitorParams::default()
        };
        let mut m = ZoneMonitor::from_spec(&spec(), &defaults);
        // Drive the log through repeated mismatch episodes.
        for i in 0..20 {
            let t = ts(i * 10_000);
            m.ingest_feeder(1000.0, 700.0, t);
            assert!(m
                .ingest_feeder(1000.0, 700.0, t + Duration::seconds(1800))
                .is_some());
            // Break the episode so the next iteration can fire again.
            m.ingest_feeder(1000.0, 1000.0, t + Duration::seconds(1900));
        }
        assert_eq!(m.alert_count(), 5);
    }

    #[test]
    fn anomaly_frequency_prunes_after_24h() {
        let mut m = ZoneMonitor::from_spec(&spec(), &MonitorParams::default());
        m.ingest_feeder(1000.0, 700.0, ts(0));
        assert!(m.ingest_feeder(1000.0, 700.0, ts(1800)).is_some());
        let fresh = m.health(ts(1800));
        assert!(fresh.components.anomaly_frequency > 0.0);

        // A reading a day later prunes the stale frequency bookkeeping.
        m.ingest(&reading(1000.0, ts(90_000)), ts(90_000));
        let stale = m.health(ts(90_000));
        assert_eq!(stale.components.anomaly_frequency, 0.0);
        // The alert log itself is retained for operators.
        assert_eq!(m.alert_count(), 1);
    }

    #[test]
    fn environment_snapshot_feeds_health() {
        let mut m = ZoneMonitor::from_spec(&spec(), &MonitorParams::default());
        let none = m.health(ts(0));
        assert_eq!(none.components.environmental_stress, 0.0);

        m.record_environment(EnvironmentSample {
            ambient_temp_c: 37.5,
            humidity_pct: None,
        });
        let hot = m.health(ts(0));
        assert!((hot.components.environmental_stress - 50.0).abs() < 1e-9);
    }
}
