//! Load forecasting: 24-step-ahead prediction with risk classification and
//! predictive-overload alerting.
//!
//! The forecaster combines a 24-slot diurnal baseline with an exponentially
//! decayed recent-trend adjustment: a smoothing heuristic, not a statistical
//! learning model. It is pure and reentrant: all state is the configured
//! baseline, and every forecast takes an explicit `now`.

pub mod alert;
pub mod baseline;
pub mod ewma;
pub mod sma;

pub use alert::{assess_overload_risk, AlertParams, PredictiveAlert};
pub use baseline::{BaselinePattern, HourlyBaseline};
pub use ewma::{peak_risk, EwmaForecaster, ForecastSlot, RiskLevel};
pub use sma::SmaForecaster;
