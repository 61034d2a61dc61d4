//! Diurnal load baseline: hour-of-day → expected load.

use serde::{Deserialize, Serialize};

/// Expected load (kW) for each hour of the day, 0–23.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HourlyBaseline {
    hourly_kw: [f64; 24],
}

impl HourlyBaseline {
    pub fn new(hourly_kw: [f64; 24]) -> Self {
        Self { hourly_kw }
    }

    /// Expected load for an hour; wraps past 23.
    pub fn get(&self, hour: u32) -> f64 {
        self.hourly_kw[(hour % 24) as usize]
    }

    /// Build a typical daily curve: a sinusoid peaking at `peak_hour`,
    /// bottoming out at `base_load_kw` twelve hours away.
    pub fn from_pattern(pattern: &BaselinePattern) -> Self {
        let variation = (pattern.peak_load_kw - pattern.base_load_kw) / 2.0;
        let mut hourly_kw = [0.0; 24];
        for (hour, slot) in hourly_kw.iter_mut().enumerate() {
            let phase =
                (hour as f64 - f64::from(pattern.peak_hour)) * 2.0 * std::f64::consts::PI / 24.0;
            *slot = pattern.base_load_kw + variation * (1.0 + phase.cos());
        }
        Self { hourly_kw }
    }
}

/// Parameters for generating a sinusoidal daily pattern, typically supplied
/// per zone in the topology file.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct BaselinePattern {
    /// Hour of peak demand, 0–23.
    pub peak_hour: u32,
    pub peak_load_kw: f64,
    pub base_load_kw: f64,
}

impl BaselinePattern {
    pub fn build(&self) -> HourlyBaseline {
        HourlyBaseline::from_pattern(self)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn pattern_peaks_at_peak_hour() {
        let pattern = BaselinePattern {
            peak_hour: 19,
            peak_load_kw: 150.0,
            base_load_kw: 80.0,
        };
        let b = pattern.build();
        assert!((b.get(19) - 150.0).abs() < 1e-9);
        // Trough is twelve hours from the peak.
        assert!((b.get(7) - 80.0).abs() < 1e-9);
    }

    #[test]
    fn pattern_stays_within_bounds() {
        let pattern = BaselinePattern {
            peak_hour: 14,
            peak_load_kw: 200.0,
            base_load_kw: 50.0,
        };
        let b = pattern.build();
        for hour in 0..24 {
            let v = b.get(hour);
            assert!(v >= 50.0 - 1e-9 && v <= 200.0 + 1e-9, "hour {hour}: {v}");
        }
    }

    #[test]
    fn get_wraps_hours() {
        let b = HourlyBaseline::new(std::array::from_fn(|h| h as f64));
        assert_eq!(b.get(25), 1.0);
        assert_eq!(b.get(24), 0.0);
    }
}
