//! Smart-meter load simulation.

use chrono::{DateTime, Datelike, Duration, Timelike, Utc};
use rand::rngs::StdRng;
use rand::Rng;
use rand_distr::{Distribution, Normal};
use serde::Serialize;

/// One simulated minute of instantaneous load.
#[derive(Debug, Clone, Serialize)]
pub struct LoadPoint {
    pub timestamp: DateTime<Utc>,
    pub load_kw: f64,
}

/// Simulates a smart meter producing instantaneous load (kW) every minute.
///
/// The pattern has morning/evening peaks, weekday/weekend differences,
/// minute-to-minute smoothing, and optional temperature-driven AC load.
/// Per-meter amplitudes are randomized at construction to reflect diverse
/// customers.
#[derive(Debug, Clone)]
pub struct SmartMeter {
    pub meter_id: String,
    min_kw: f64,
    max_kw: f64,
    base_kw: f64,
    morning_amp: f64,
    evening_amp: f64,
    noise_scale: f64,
    /// kW of AC load per °C above the comfort point.
    ac_sensitivity: f64,
}

/// Comfort temperature; hotter days add AC load.
const COMFORT_TEMP_C: f64 = 26.0;

impl SmartMeter {
    pub fn new(meter_id: &str, min_kw: f64, max_kw: f64, base_kw: f64, rng: &mut StdRng) -> Self {
        Self {
            meter_id: meter_id.to_string(),
            min_kw,
            max_kw,
            base_kw,
            morning_amp: rng.gen_range(0.8..3.0) * base_kw,
            evening_amp: rng.gen_range(1.0..4.0) * base_kw,
            noise_scale: rng.gen_range(0.02..0.15) * max_kw,
            ac_sensitivity: rng.gen_range(0.01..0.05),
        }
    }

    /// Deterministic part of the daily shape: two Gaussian-like peaks
    /// (morning ~08:00, evening ~19:00) plus a small midday business bump.
    fn daily_profile(&self, at: DateTime<Utc>) -> f64 {
        let hour = f64::from(at.hour()) + f64::from(at.minute()) / 60.0;
        let morning = self.morning_amp * (-0.5 * ((hour - 8.0) / 1.8).powi(2)).exp();
        let evening = self.evening_amp * (-0.5 * ((hour - 19.0) / 2.2).powi(2)).exp();
        let midday = 0.3 * self.base_kw * (-0.5 * ((hour - 13.0) / 3.0).powi(2)).exp();
        morning + midday + evening
    }

    /// Generate a minute-by-minute load series starting at `start`.
    ///
    /// `external_temps`, when given, is aligned to minutes and adds AC load
    /// proportional to degrees above the comfort point.
    pub fn generate_loads(
        &self,
        start: DateTime<Utc>,
        num_minutes: usize,
        external_temps: Option<&[f64]>,
        rng: &mut StdRng,
    ) -> Vec<LoadPoint> {
        let noise = Normal::new(0.0, self.noise_scale).expect("valid std dev");
        let mut points = Vec::with_capacity(num_minutes);
        let mut prev_load: Option<f64> = None;

        for i in 0..num_minutes {
            let at = start + Duration::minutes(i as i64);
            let mut base_profile = self.base_kw + self.daily_profile(at);

            if at.weekday().number_from_monday() >= 6 {
                base_profile *= rng.gen_range(0.6..0.9);
            }

            let temp_influence = external_temps
                .and_then(|temps| temps.get(i))
                .map(|t| (t - COMFORT_TEMP_C).max(0.0) * self.ac_sensitivity)
                .unwrap_or(0.0);

            let spike = if rng.gen::<f64>() < 0.002 {
                rng.gen_range(0.5..3.0) * self.base_kw
            } else {
                0.0
            };

            let raw = base_profile + temp_influence + noise.sample(rng) + spike;

            // Small inertia so minute-to-minute output doesn't jump unrealistically.
            let load = match prev_load {
                Some(prev) => prev + (raw - prev) * rng.gen_range(0.2..0.6),
                None => raw,
            };
            let load = (load.clamp(self.min_kw, self.max_kw) * 1000.0).round() / 1000.0;

            points.push(LoadPoint {
                timestamp: at,
                load_kw: load,
            });
            prev_load = Some(load);
        }

        points
    }
}
