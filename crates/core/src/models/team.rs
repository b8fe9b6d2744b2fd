use chrono::NaiveTime;
use serde::{Deserialize, Serialize};

/// Team-wide open/close window for one day of the week
/// (0 = Sunday .. 6 = Saturday). A day with no entry is closed.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BusinessHour {
    pub day_of_week: u32,
    pub open: NaiveTime,
    pub close: NaiveTime,
}

/// Per-team booking policy.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TeamSettings {
    /// Shortest lead time, in minutes, between "now" and a new
    /// appointment's start.
    pub min_booking_notice_minutes: i64,
}

impl Default for TeamSettings {
    fn default() -> Self {
        Self {
            min_booking_notice_minutes: 5,
        }
    }
}
