//! Predictive-overload alert derivation from a forecast.

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::ewma::ForecastSlot;

/// Thresholds for raising a predictive alert.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(deny_unknown_fields, default)]
pub struct AlertParams {
    /// Risk ratio at or above which a slot counts as critical.
    pub critical_threshold: f64,
    /// Minimum hours of advance warning required; nearer slots are the
    /// domain of the live detectors, not the forecaster.
    pub min_lead_time_hours: u32,
}

impl Default for AlertParams {
    fn default() -> Self {
        Self {
            critical_threshold: 0.90,
            min_lead_time_hours: 2,
        }
    }
}

/// Advance warning of a predicted overload. Absent when no slot qualifies.
#[derive(Debug, Clone, Serialize)]
pub struct PredictiveAlert {
    pub alert_type: &'static str,
    pub first_critical_hour: u32,
    pub hours_ahead: u32,
    pub predicted_load_kw: f64,
    pub risk_ratio: f64,
    pub confidence: f64,
    pub critical_hours_count: usize,
    pub recommended_action: String,
}

/// How hard the predicted overload is expected to hit.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum UrgencyTier {
    /// risk_ratio ≥ 0.98
    Urgent,
    /// risk_ratio ≥ 0.92
    Warning,
    Advisory,
}

impl UrgencyTier {
    fn classify(risk_ratio: f64) -> Self {
        if risk_ratio >= 0.98 {
            UrgencyTier::Urgent
        } else if risk_ratio >= 0.92 {
            UrgencyTier::Warning
        } else {
            UrgencyTier::Advisory
        }
    }
}

/// How much warning the operators get.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum LeadTimeTier {
    /// ≥ 6 hours out
    Planned,
    /// 3–5 hours out
    Coordinated,
    /// under 3 hours
    Immediate,
}

impl LeadTimeTier {
    fn classify(hours_ahead: u32) -> Self {
        if hours_ahead >= 6 {
            LeadTimeTier::Planned
        } else if hours_ahead >= 3 {
            LeadTimeTier::Coordinated
        } else {
            LeadTimeTier::Immediate
        }
    }
}

/// Urgency × lead-time template table for the operator recommendation.
fn recommended_action(urgency: UrgencyTier, lead: LeadTimeTier, hours_ahead: u32) -> String {
    use LeadTimeTier::*;
    use UrgencyTier::*;
    let h = hours_ahead;
    match (urgency, lead) {
        (Urgent, Planned) => format!(
            "URGENT: Pre-stage crew for immediate intervention. Expected in {h} hours - sufficient time for planned response."
        ),
        (Urgent, Coordinated) => format!(
            "URGENT: Pre-stage crew for immediate intervention. Expected in {h} hours - coordinate with barangay officials."
        ),
        (Urgent, Immediate) => format!(
            "URGENT: Pre-stage crew for immediate intervention. Expected in {h} hours - immediate action required."
        ),
        (Warning, Planned) => format!(
            "WARNING: Monitor closely and prepare load management. Expected in {h} hours - sufficient time for planned response."
        ),
        (Warning, Coordinated) => format!(
            "WARNING: Monitor closely and prepare load management. Expected in {h} hours - coordinate with barangay officials."
        ),
        (Warning, Immediate) => format!(
            "WARNING: Monitor closely and prepare load management. Expected in {h} hours - immediate action required."
        ),
        (Advisory, Planned) => format!(
            "ADVISORY: Voluntary load reduction recommended. Expected in {h} hours - sufficient time for planned response."
        ),
        (Advisory, Coordinated) => format!(
            "ADVISORY: Voluntary load reduction recommended. Expected in {h} hours - coordinate with barangay officials."
        ),
        (Advisory, Immediate) => format!(
            "ADVISORY: Voluntary load reduction recommended. Expected in {h} hours - immediate action required."
        ),
    }
}

fn round3(v: f64) -> f64 {
    (v * 1000.0).round() / 1000.0
}

/// Scan a forecast for slots that justify a predictive-overload alert.
///
/// Qualifying slots have `risk_ratio ≥ critical_threshold` and
/// `offset_hours ≥ min_lead_time_hours`; the earliest one anchors the alert.
pub fn assess_overload_risk(
    slots: &[ForecastSlot],
    params: &AlertParams,
) -> Option<PredictiveAlert> {
    let critical: Vec<&ForecastSlot> = slots
        .iter()
        .filter(|s| {
            s.risk_ratio >= params.critical_threshold
                && s.offset_hours >= params.min_lead_time_hours
        })
        .collect();

    let first = critical.iter().min_by_key(|s| s.offset_hours)?;

    let excess = first.risk_ratio - params.critical_threshold;
    let confidence = round3((0.6 + excess / 0.2).min(0.95));

    let urgency = UrgencyTier::classify(first.risk_ratio);
    let lead = LeadTimeTier::classify(first.offset_hours);

    debug!(
        hour = first.hour,
        hours_ahead = first.offset_hours,
        risk_ratio = first.risk_ratio,
        "predictive overload alert raised"
    );

    Some(PredictiveAlert {
        alert_type: "PREDICTIVE_OVERLOAD",
        first_critical_hour: first.hour,
        hours_ahead: first.offset_hours,
        predicted_load_kw: first.predicted_load_kw,
        risk_ratio: first.risk_ratio,
        confidence,
        critical_hours_count: critical.len(),
        recommended_action: recommended_action(urgency, lead, first.offset_hours),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::baseline::HourlyBaseline;
    use crate::ewma::EwmaForecaster;
    use chrono::DateTime;

    fn slots_with_risk(risks: &[f64]) -> Vec<ForecastSlot> {
        let f = EwmaForecaster::with_baseline(0.0, HourlyBaseline::new([0.0; 24]));
        let now = DateTime::from_timestamp(1_700_000_000, 0).unwrap();
        let mut slots = f.forecast_24h(0, 0.0, 100.0, now).unwrap();
        for (s, r) in slots.iter_mut().zip(risks) {
            s.risk_ratio = *r;
            s.predicted_load_kw = r * 100.0;
        }
        slots
    }

    #[test]
    fn no_alert_when_no_slot_qualifies() {
        let slots = slots_with_risk(&[0.5; 24]);
        assert!(assess_overload_risk(&slots, &AlertParams::default()).is_none());
    }

    #[test]
    fn lead_time_gate_excludes_near_slots() {
        // Critical risk only inside the lead-time window.
        let mut risks = [0.5; 24];
        risks[0] = 0.95;
        risks[1] = 0.95;
        let slots = slots_with_risk(&risks);
        assert!(assess_overload_risk(&slots, &AlertParams::default()).is_none());
    }

    #[test]
    fn picks_earliest_qualifying_slot() {
        let mut risks = [0.5; 24];
        risks[4] = 0.92;
        risks[8] = 0.99;
        risks[12] = 0.95;
        let slots = slots_with_risk(&risks);

        let alert = assess_overload_risk(&slots, &AlertParams::default()).unwrap();
        assert_eq!(alert.hours_ahead, 4);
        assert_eq!(alert.first_critical_hour, 4);
        assert_eq!(alert.critical_hours_count, 3);
        assert_eq!(alert.alert_type, "PREDICTIVE_OVERLOAD");
        // confidence = min(0.95, 0.6 + (0.92 - 0.90) / 0.2) = 0.7
        assert!((alert.confidence - 0.7).abs() < 1e-9);
    }

    #[test]
    fn confidence_caps_at_095() {
        let mut risks = [0.5; 24];
        risks[6] = 1.2;
        let slots = slots_with_risk(&risks);
        let alert = assess_overload_risk(&slots, &AlertParams::default()).unwrap();
        assert_eq!(alert.confidence, 0.95);
    }

    #[test]
    fn recommendation_table_is_exhaustive() {
        // All nine urgency × lead-time cells produce a distinct template.
        let urgencies = [0.99, 0.94, 0.91];
        let leads = [8, 4, 2];
        let mut seen = std::collections::HashSet::new();
        for r in urgencies {
            for h in leads {
                let text = recommended_action(
                    UrgencyTier::classify(r),
                    LeadTimeTier::classify(h),
                    h,
                );
                assert!(seen.insert(text.clone()), "duplicate template: {text}");
            }
        }
        assert_eq!(seen.len(), 9);
    }

    #[test]
    fn recommendation_tiers_map_correctly() {
        let mut risks = [0.5; 24];
        risks[8] = 0.99;
        let slots = slots_with_risk(&risks);
        let alert = assess_overload_risk(&slots, &AlertParams::default()).unwrap();
        assert!(alert.recommended_action.starts_with("URGENT"));
        assert!(alert.recommended_action.contains("planned response"));

        let mut risks = [0.5; 24];
        risks[3] = 0.93;
        let slots = slots_with_risk(&risks);
        let alert = assess_overload_risk(&slots, &AlertParams::default()).unwrap();
        assert!(alert.recommended_action.starts_with("WARNING"));
        assert!(alert.recommended_action.contains("barangay officials"));

        let mut risks = [0.5; 24];
        risks[2] = 0.90;
        let slots = slots_with_risk(&risks);
        let alert = assess_overload_risk(&slots, &AlertParams::default()).unwrap();
        assert!(alert.recommended_action.starts_with("ADVISORY"));
        assert!(alert.recommended_action.contains("immediate action"));
    }
}
