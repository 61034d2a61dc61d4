//! Transformer thermal simulation.

use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::meter::LoadPoint;

/// One minute of transformer state.
#[derive(Debug, Clone, Serialize)]
pub struct TransformerSnapshot {
    pub timestamp: DateTime<Utc>,
    pub latitude: f64,
    pub longitude: f64,
    pub zone_name: String,
    pub total_load_kw: f64,
    pub transformer_temp_c: f64,
    pub external_temp_c: f64,
}

/// First-order thermal model of a distribution transformer fed by a set of
/// smart meters.
///
/// `dT = (load_factor·load + k_amb·(ambient − T)) / thermal_mass` per
/// one-minute step, clamped to a realistic 20–120 °C operating range.
#[derive(Debug, Clone)]
pub struct Transformer {
    pub zone_name: String,
    pub location: (f64, f64),
    thermal_mass: f64,
    load_factor: f64,
    k_amb: f64,
    prev_temp: f64,
}

impl Transformer {
    pub fn new(zone_name: &str, location: (f64, f64)) -> Self {
        Self {
            zone_name: zone_name.to_string(),
            location,
            thermal_mass: 50.0,
            load_factor: 0.8,
            k_amb: 0.5,
            prev_temp: 25.0,
        }
    }

    /// Advance the thermal state one minute and return the new temperature.
    pub fn step_temperature(&mut self, total_load_kw: f64, external_temp_c: f64) -> f64 {
        let heat_gen = self.load_factor * total_load_kw;
        let heat_transfer = self.k_amb * (external_temp_c - self.prev_temp);
        let dt = (heat_gen + heat_transfer) / self.thermal_mass;
        let new_temp = (self.prev_temp + dt).clamp(20.0, 120.0);
        self.prev_temp = new_temp;
        (new_temp * 100.0).round() / 100.0
    }

    /// Aggregate per-meter series into per-minute transformer snapshots.
    ///
    /// All series must be aligned: same start, same length. Total load is
    /// the sum across meters at each minute.
    pub fn generate_timeseries(
        &mut self,
        meter_series: &[Vec<LoadPoint>],
        external_temps: &[f64],
    ) -> Vec<TransformerSnapshot> {
        let num_minutes = meter_series
            .iter()
            .map(|s| s.len())
            .min()
            .unwrap_or(0)
            .min(external_temps.len());

        let mut snapshots = Vec::with_capacity(num_minutes);
        for i in 0..num_minutes {
            let total_load_kw: f64 = meter_series.iter().map(|s| s[i].load_kw).sum();
            let total_load_kw = (total_load_kw * 1000.0).round() / 1000.0;
            let external_temp_c = external_temps[i];
            let transformer_temp_c = self.step_temperature(total_load_kw, external_temp_c);

            snapshots.push(TransformerSnapshot {
                timestamp: meter_series[0][i].timestamp,
                latitude: self.location.0,
                longitude: self.location.1,
                zone_name: self.zone_name.clone(),
                total_load_kw,
                transformer_temp_c,
                external_temp_c,
            });
        }
        snapshots
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::meter::SmartMeter;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    fn start() -> DateTime<Utc> {
        DateTime::parse_from_rfc3339("2026-08-05T00:00:00Z")
            .unwrap()
            .with_timezone(&Utc)
    }

    #[test]
    fn temperature_stays_in_operating_range() {
        let mut t = Transformer::new("UP Campus", (14.6519, 121.0568));
        for _ in 0..500 {
            let temp = t.step_temperature(500.0, 40.0);
            assert!((20.0..=120.0).contains(&temp));
        }
        // Heavy sustained load drives the temperature to the ceiling.
        assert_eq!(t.step_temperature(500.0, 40.0), 120.0);
    }

    #[test]
    fn load_heats_the_transformer() {
        let mut idle = Transformer::new("A", (0.0, 0.0));
        let mut loaded = Transformer::new("B", (0.0, 0.0));
        for _ in 0..60 {
            idle.step_temperature(0.0, 30.0);
            loaded.step_temperature(50.0, 30.0);
        }
        assert!(loaded.prev_temp > idle.prev_temp);
    }

    #[test]
    fn timeseries_sums_meter_loads() {
        let mut rng = StdRng::seed_from_u64(1);
        let m1 = SmartMeter::new("SM-001", 0.0, 20.0, 0.6, &mut rng);
        let m2 = SmartMeter::new("SM-002", 0.0, 20.0, 0.6, &mut rng);

        let s1 = m1.generate_loads(start(), 30, None, &mut rng);
        let s2 = m2.generate_loads(start(), 30, None, &mut rng);
        let temps = vec![28.0; 30];

        let mut t = Transformer::new("UP Campus", (14.6519, 121.0568));
        let series = t.generate_timeseries(&[s1.clone(), s2.clone()], &temps);

        assert_eq!(series.len(), 30);
        let expected = ((s1[0].load_kw + s2[0].load_kw) * 1000.0).round() / 1000.0;
        assert_eq!(series[0].total_load_kw, expected);
        assert_eq!(series[0].timestamp, s1[0].timestamp);
    }

    #[test]
    fn empty_input_yields_empty_series() {
        let mut t = Transformer::new("X", (0.0, 0.0));
        assert!(t.generate_timeseries(&[], &[]).is_empty());
    }
}
