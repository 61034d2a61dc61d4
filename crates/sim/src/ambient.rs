//! Ambient temperature curve for a warm, humid climate.

use rand::rngs::StdRng;
use rand_distr::{Distribution, Normal};

/// Daily ambient temperature series at one-minute resolution: lows of
/// ~26 °C in the early morning, mid-afternoon peaks around 30–31 °C, with
/// small Gaussian jitter.
pub fn ambient_series(start_hour_of_day: f64, num_minutes: usize, rng: &mut StdRng) -> Vec<f64> {
    let jitter = Normal::new(0.0, 0.3).expect("valid std dev");
    (0..num_minutes)
        .map(|i| {
            let hour = (start_hour_of_day + i as f64 / 60.0) % 24.0;
            26.0 + 4.5 * (-0.5 * ((hour - 14.0) / 4.0).powi(2)).exp() + jitter.sample(rng)
        })
        .collect()
}
