use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::engine::{RejectionReason, SlotDecision};

/// Query parameters for the availability scan endpoint.
#[derive(Debug, Clone, Deserialize)]
pub struct AvailabilityQuery {
    pub service_id: Uuid,

    /// Comma-separated employee UUIDs; absent means every schedulable
    /// employee of the team is a candidate.
    pub employee_ids: Option<String>,

    /// Single day to scan. Defaults to today when no date and no range
    /// is given.
    pub date: Option<NaiveDate>,

    /// Inclusive range start, used together with `to`.
    pub from: Option<NaiveDate>,

    /// Inclusive range end, used together with `from`.
    pub to: Option<NaiveDate>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AvailabilityResponse {
    /// Bookable start instants, ascending.
    pub slots: Vec<DateTime<Utc>>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ValidateSlotRequest {
    pub service_id: Uuid,
    pub employee_id: Uuid,
    pub start_time: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ValidateSlotResponse {
    pub available: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reason: Option<RejectionReason>,
}

impl From<SlotDecision> for ValidateSlotResponse {
    fn from(decision: SlotDecision) -> Self {
        match decision {
            SlotDecision::Available => Self {
                available: true,
                reason: None,
            },
            SlotDecision::Rejected(reason) => Self {
                available: false,
                reason: Some(reason),
            },
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BookAppointmentRequest {
    pub service_id: Uuid,

    /// When absent the server assigns any employee that can take the
    /// slot, chosen at random among the eligible ones.
    pub employee_id: Option<Uuid>,

    pub client_name: String,
    pub client_email: Option<String>,
    pub start_time: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BookAppointmentResponse {
    pub id: Uuid,
    pub employee_id: Uuid,
    pub service_id: Uuid,
    pub client_name: String,
    pub start_time: DateTime<Utc>,
    pub end_time: DateTime<Utc>,
    pub status: String,
}
