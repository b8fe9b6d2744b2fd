use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// A bookable offering, as the engine sees it.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Service {
    pub id: Uuid,
    pub team_id: Uuid,
    pub name: String,
    /// Appointment length in minutes, always positive.
    pub duration_minutes: i64,
    /// Mandatory idle minutes after the appointment before the same
    /// employee can start the next one.
    pub buffer_minutes: i64,
}

impl Service {
    /// Minutes a slot of this service occupies for conflict purposes:
    /// duration plus the trailing buffer.
    pub fn footprint_minutes(&self) -> i64 {
        self.duration_minutes + self.buffer_minutes
    }
}
