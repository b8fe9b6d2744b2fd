//! Candidate generation and the acceptance predicates.
//!
//! `candidate_starts` answers "where could a slot start inside this
//! window"; the predicates answer "is this particular start acceptable".
//! The scanner composes them; the validator reuses the predicates on a
//! single candidate.

use chrono::{DateTime, Duration, NaiveDate, Utc};

use super::windows::TimeWindow;
use crate::models::employee::{BlockOff, BookedSlot};

/// Iterator over candidate slot starts for one clipped window on one
/// day. Steps by the full footprint (duration + buffer) and stops as
/// soon as a footprint no longer fits inside the window.
#[derive(Debug, Clone)]
pub struct CandidateStarts {
    cursor: DateTime<Utc>,
    window_end: DateTime<Utc>,
    footprint: Duration,
}

impl Iterator for CandidateStarts {
    type Item = DateTime<Utc>;

    fn next(&mut self) -> Option<DateTime<Utc>> {
        // A non-positive footprint would never advance; services
        // guarantee duration > 0 but data is not trusted here.
        if self.footprint <= Duration::zero() {
            return None;
        }
        if self.cursor + self.footprint > self.window_end {
            return None;
        }
        let start = self.cursor;
        self.cursor += self.footprint;
        Some(start)
    }
}

/// Candidate starts for `window` on `day`, stepping `footprint_minutes`
/// (the service duration plus its buffer).
pub fn candidate_starts(
    day: NaiveDate,
    window: TimeWindow,
    footprint_minutes: i64,
) -> CandidateStarts {
    CandidateStarts {
        cursor: day.and_time(window.start).and_utc(),
        window_end: day.and_time(window.end).and_utc(),
        footprint: Duration::minutes(footprint_minutes),
    }
}

/// Minimum-notice floor: a start closer to `now` than the notice period
/// cannot be booked.
pub fn too_soon(start: DateTime<Utc>, now: DateTime<Utc>, min_notice_minutes: i64) -> bool {
    start < now + Duration::minutes(min_notice_minutes)
}

/// Whether the candidate footprint `[start, start + footprint)` overlaps
/// any block-off interval.
pub fn hits_block_off(
    start: DateTime<Utc>,
    footprint_minutes: i64,
    block_offs: &[BlockOff],
) -> bool {
    let end = start + Duration::minutes(footprint_minutes);
    block_offs.iter().any(|b| b.start < end && b.end > start)
}

/// Whether the candidate footprint overlaps an existing appointment's
/// footprint. Each appointment reserves its own cooldown: its occupied
/// interval runs to `end + its own service's buffer`.
pub fn hits_appointment(
    start: DateTime<Utc>,
    footprint_minutes: i64,
    appointments: &[BookedSlot],
) -> bool {
    let end = start + Duration::minutes(footprint_minutes);
    appointments.iter().any(|a| {
        let occupied_end = a.end + Duration::minutes(a.buffer_minutes);
        a.start < end && occupied_end > start
    })
}
