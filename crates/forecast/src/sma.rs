//! Simple moving-average forecaster, used as a fallback or comparison
//! baseline for the EWMA forecaster.

use std::collections::VecDeque;

use chrono::{DateTime, Duration, Timelike, Utc};

/// Same-hour moving average over a bounded observation history.
#[derive(Debug, Clone)]
pub struct SmaForecaster {
    window_hours: i64,
    history: VecDeque<(DateTime<Utc>, f64)>,
}

impl SmaForecaster {
    pub fn new(window_hours: i64) -> Self {
        Self {
            window_hours: window_hours.max(1),
            history: VecDeque::new(),
        }
    }

    /// Record an observation and prune entries older than twice the window.
    pub fn add_observation(&mut self, timestamp: DateTime<Utc>, load_kw: f64, now: DateTime<Utc>) {
        self.history.push_back((timestamp, load_kw));
        let cutoff = now - Duration::hours(self.window_hours * 2);
        while matches!(self.history.front(), Some((ts, _)) if *ts <= cutoff) {
            self.history.pop_front();
        }
    }

    /// Forecast the next hour's load: the mean of observations taken in the
    /// same hour of day, falling back to the overall mean, then to zero on
    /// an empty history.
    pub fn forecast_next_hour(&self, now: DateTime<Utc>) -> f64 {
        if self.history.is_empty() {
            return 0.0;
        }

        let next_hour = (now.hour() + 1) % 24;
        let same_hour: Vec<f64> = self
            .history
            .iter()
            .filter(|(ts, _)| ts.hour() == next_hour)
            .map(|(_, v)| *v)
            .collect();

        if same_hour.is_empty() {
            let sum: f64 = self.history.iter().map(|(_, v)| v).sum();
            return sum / self.history.len() as f64;
        }

        same_hour.iter().sum::<f64>() / same_hour.len() as f64
    }
}

impl Default for SmaForecaster {
    fn default() -> Self {
        Self::new(24)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn at(hour: u32, min: u32) -> DateTime<Utc> {
        // 2026-08-01 is a fixed reference day.
        DateTime::parse_from_rfc3339(&format!("2026-08-01T{hour:02}:{min:02}:00Z"))
            .unwrap()
            .with_timezone(&Utc)
    }

    #[test]
    fn empty_history_forecasts_zero() {
        let f = SmaForecaster::default();
        assert_eq!(f.forecast_next_hour(at(10, 0)), 0.0);
    }

    #[test]
    fn averages_same_hour_observations() {
        let mut f = SmaForecaster::default();
        let now = at(10, 30);
        // Two observations in hour 11, one elsewhere.
        f.add_observation(at(11, 0), 100.0, now);
        f.add_observation(at(11, 30), 120.0, now);
        f.add_observation(at(9, 0), 500.0, now);

        assert!((f.forecast_next_hour(now) - 110.0).abs() < 1e-12);
    }

    #[test]
    fn falls_back_to_overall_mean() {
        let mut f = SmaForecaster::default();
        let now = at(10, 30);
        // No observations in hour 11.
        f.add_observation(at(8, 0), 90.0, now);
        f.add_observation(at(9, 0), 110.0, now);

        assert!((f.forecast_next_hour(now) - 100.0).abs() < 1e-12);
    }

    #[test]
    fn prunes_stale_history() {
        let mut f = SmaForecaster::new(24);
        let now = at(12, 0);
        let old = now - Duration::hours(60);
        f.add_observation(old, 999.0, now);
        f.add_observation(at(11, 0), 50.0, now);

        // The 60-hour-old point is outside 2×24h and was dropped.
        let sum: f64 = f.history.iter().map(|(_, v)| v).sum();
        assert_eq!(sum, 50.0);
    }
}
