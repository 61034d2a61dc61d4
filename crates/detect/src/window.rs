//! Fixed-capacity rolling window over recent scalar samples.

use std::collections::VecDeque;

use chrono::{DateTime, Utc};

/// Bounded, time-ordered buffer of `(value, timestamp)` pairs.
///
/// Capacity is a hard invariant: `len() <= capacity()` at all times, with
/// FIFO eviction of the oldest entry. The window does not validate timestamp
/// ordering; callers are expected to feed monotonically non-decreasing
/// timestamps.
///
/// All statistics return a neutral value (0.0 or `None`) on an empty window
/// rather than failing.
#[derive(Debug, Clone)]
pub struct RollingWindow {
    capacity: usize,
    entries: VecDeque<(f64, DateTime<Utc>)>,
}

impl RollingWindow {
    pub fn new(capacity: usize) -> Self {
        let capacity = capacity.max(1);
        Self {
            capacity,
            entries: VecDeque::with_capacity(capacity),
        }
    }

    /// Append a sample, evicting the oldest entry when full.
    pub fn add(&mut self, value: f64, timestamp: DateTime<Utc>) {
        if self.entries.len() == self.capacity {
            self.entries.pop_front();
        }
        self.entries.push_back((value, timestamp));
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    pub fn mean(&self) -> f64 {
        if self.entries.is_empty() {
            return 0.0;
        }
        self.entries.iter().map(|(v, _)| v).sum::<f64>() / self.entries.len() as f64
    }

    /// Population standard deviation; 0.0 with fewer than 2 samples.
    pub fn std(&self) -> f64 {
        if self.entries.len() < 2 {
            return 0.0;
        }
        let mean = self.mean();
        let variance = self
            .entries
            .iter()
            .map(|(v, _)| (v - mean).powi(2))
            .sum::<f64>()
            / self.entries.len() as f64;
        variance.sqrt()
    }

    pub fn min(&self) -> f64 {
        if self.entries.is_empty() {
            return 0.0;
        }
        self.entries
            .iter()
            .map(|(v, _)| *v)
            .fold(f64::INFINITY, f64::min)
    }

    pub fn max(&self) -> f64 {
        if self.entries.is_empty() {
            return 0.0;
        }
        self.entries
            .iter()
            .map(|(v, _)| *v)
            .fold(f64::NEG_INFINITY, f64::max)
    }

    /// Most recent value, if any.
    pub fn latest(&self) -> Option<f64> {
        self.entries.back().map(|(v, _)| *v)
    }

    /// Iterate values oldest-first.
    pub fn values(&self) -> impl Iterator<Item = f64> + '_ {
        self.entries.iter().map(|(v, _)| *v)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ts(secs: i64) -> DateTime<Utc> {
        DateTime::from_timestamp(1_700_000_000 + secs, 0).unwrap()
    }

    #[test]
    fn never_exceeds_capacity() {
        let mut w = RollingWindow::new(3);
        for i in 0..10 {
            w.add(i as f64, ts(i));
            assert!(w.len() <= 3);
        }
        assert_eq!(w.len(), 3);
        // Oldest evicted first: remaining values are 7, 8, 9.
        let vals: Vec<f64> = w.values().collect();
        assert_eq!(vals, vec![7.0, 8.0, 9.0]);
    }

    #[test]
    fn empty_window_returns_neutral_values() {
        let w = RollingWindow::new(5);
        assert_eq!(w.mean(), 0.0);
        assert_eq!(w.std(), 0.0);
        assert_eq!(w.min(), 0.0);
        assert_eq!(w.max(), 0.0);
        assert!(w.latest().is_none());
    }

    #[test]
    fn single_sample_has_zero_std() {
        let mut w = RollingWindow::new(5);
        w.add(42.0, ts(0));
        assert_eq!(w.mean(), 42.0);
        assert_eq!(w.std(), 0.0);
        assert_eq!(w.latest(), Some(42.0));
    }

    #[test]
    fn population_statistics() {
        let mut w = RollingWindow::new(10);
        for (i, v) in [2.0, 4.0, 4.0, 4.0, 5.0, 5.0, 7.0, 9.0].iter().enumerate() {
            w.add(*v, ts(i as i64));
        }
        assert!((w.mean() - 5.0).abs() < 1e-12);
        // Population std of this classic example is exactly 2.
        assert!((w.std() - 2.0).abs() < 1e-12);
        assert_eq!(w.max(), 9.0);
    }

    #[test]
    fn zero_capacity_clamps_to_one() {
        let mut w = RollingWindow::new(0);
        w.add(1.0, ts(0));
        w.add(2.0, ts(1));
        assert_eq!(w.len(), 1);
        assert_eq!(w.latest(), Some(2.0));
    }
}
