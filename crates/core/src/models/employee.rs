use chrono::{DateTime, NaiveTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// One weekly work window of an employee, wall-clock on a day of the
/// week. Employees may have several disjoint windows per day and none
/// on days they do not work.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AvailabilityWindow {
    pub day_of_week: u32,
    pub start: NaiveTime,
    pub end: NaiveTime,
}

/// Approved time off, absolute `[start, end)`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BlockOff {
    pub start: DateTime<Utc>,
    pub end: DateTime<Utc>,
}

/// An existing non-cancelled appointment. Its occupied footprint is
/// `[start, end + buffer_minutes)`, where the buffer is the booked
/// service's own, not the one currently being scanned for.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BookedSlot {
    pub start: DateTime<Utc>,
    pub end: DateTime<Utc>,
    pub buffer_minutes: i64,
}

/// Everything the engine needs to know about one candidate employee.
/// The data layer returns these pre-filtered: only active, schedulable
/// employees, with block-offs and appointments trimmed to the scanned
/// range.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EmployeeSchedule {
    pub id: Uuid,
    pub windows: Vec<AvailabilityWindow>,
    pub block_offs: Vec<BlockOff>,
    pub appointments: Vec<BookedSlot>,
}
