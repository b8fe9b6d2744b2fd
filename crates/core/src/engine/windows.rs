//! Wall-clock window plumbing: clipping availability against business
//! hours and bucketing weekly windows by day of week.

use chrono::NaiveTime;

use crate::models::employee::AvailabilityWindow;
use crate::models::team::BusinessHour;

/// Half-open wall-clock interval `[start, end)` within a single day.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TimeWindow {
    pub start: NaiveTime,
    pub end: NaiveTime,
}

impl TimeWindow {
    pub fn new(start: NaiveTime, end: NaiveTime) -> Self {
        Self { start, end }
    }

    /// Intersection with another window. `None` when the overlap is
    /// empty or inverted; inverted source windows clip to nothing.
    pub fn clip(&self, other: &TimeWindow) -> Option<TimeWindow> {
        let start = self.start.max(other.start);
        let end = self.end.min(other.end);
        if start < end {
            Some(TimeWindow { start, end })
        } else {
            None
        }
    }
}

/// An employee's weekly windows bucketed by day of week
/// (0 = Sunday .. 6 = Saturday), built once per scan so per-day lookup
/// is a plain index instead of a repeated linear filter.
#[derive(Debug, Clone, Default)]
pub struct WeekPlan {
    by_day: [Vec<TimeWindow>; 7],
}

impl WeekPlan {
    pub fn from_windows(windows: &[AvailabilityWindow]) -> Self {
        let mut by_day: [Vec<TimeWindow>; 7] = Default::default();
        for w in windows {
            // Rows with an out-of-range day are dropped rather than
            // trusted.
            if let Some(bucket) = by_day.get_mut(w.day_of_week as usize) {
                bucket.push(TimeWindow::new(w.start, w.end));
            }
        }
        Self { by_day }
    }

    /// Windows for a day of week; empty when the employee does not work
    /// that day.
    pub fn windows_for(&self, day_of_week: u32) -> &[TimeWindow] {
        self.by_day
            .get(day_of_week as usize)
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }
}

/// The team's open/close window for a day of week, if the business
/// opens that day at all.
pub fn business_window_for(hours: &[BusinessHour], day_of_week: u32) -> Option<TimeWindow> {
    hours
        .iter()
        .find(|h| h.day_of_week == day_of_week)
        .map(|h| TimeWindow::new(h.open, h.close))
}
