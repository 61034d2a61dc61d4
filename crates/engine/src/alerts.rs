//! Stored alert records and escalation bookkeeping.

use chrono::{DateTime, Utc};
use serde::Serialize;
use uuid::Uuid;

use gridwatch_core::Anomaly;

/// An anomaly as stored in a zone's bounded alert log.
#[derive(Debug, Clone, Serialize)]
pub struct AlertRecord {
    pub alert_id: Uuid,
    #[serde(flatten)]
    pub anomaly: Anomaly,
    pub escalated: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub escalated_by: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub escalated_at: Option<DateTime<Utc>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
}

impl AlertRecord {
    pub fn new(anomaly: Anomaly) -> Self {
        Self {
            alert_id: Uuid::new_v4(),
            anomaly,
            escalated: false,
            escalated_by: None,
            escalated_at: None,
            notes: None,
        }
    }
}

/// Returned when an alert is escalated to the external operations system.
#[derive(Debug, Clone, Serialize)]
pub struct EscalationReceipt {
    pub alert_id: Uuid,
    pub escalated_at: DateTime<Utc>,
    pub escalated_by: String,
}
