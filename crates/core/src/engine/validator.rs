//! Single-slot validation: the authority consulted at booking time.
//!
//! The scanner's output is a UI hint and may be stale by the time a
//! client submits; every booking re-runs these checks against fresh
//! data before anything is written.

use chrono::{DateTime, Datelike, Duration, Utc};
use serde::{Deserialize, Serialize};

use super::slots::{hits_appointment, hits_block_off, too_soon};
use super::windows::{business_window_for, TimeWindow, WeekPlan};
use super::SlotContext;
use crate::models::employee::EmployeeSchedule;

/// Why a requested slot cannot be booked. These are expected outcomes,
/// not errors; each maps to a specific user-facing message.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum RejectionReason {
    EmployeeNotEligible,
    NotAvailableThisDay,
    OutsideAvailabilityWindow,
    OutsideBusinessHours,
    BlockedOff,
    Conflict,
    TooSoon,
}

impl RejectionReason {
    pub fn message(&self) -> &'static str {
        match self {
            RejectionReason::EmployeeNotEligible => "This employee cannot be booked",
            RejectionReason::NotAvailableThisDay => "The employee does not work on this day",
            RejectionReason::OutsideAvailabilityWindow => {
                "The requested time is outside the employee's working hours"
            }
            RejectionReason::OutsideBusinessHours => {
                "The requested time is outside business hours"
            }
            RejectionReason::BlockedOff => "The employee has blocked off this time",
            RejectionReason::Conflict => "This time was just booked by someone else",
            RejectionReason::TooSoon => "This time is too soon to book",
        }
    }
}

/// Outcome of validating one candidate slot.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SlotDecision {
    Available,
    Rejected(RejectionReason),
}

impl SlotDecision {
    pub fn is_available(&self) -> bool {
        matches!(self, SlotDecision::Available)
    }

    pub fn reason(&self) -> Option<RejectionReason> {
        match self {
            SlotDecision::Available => None,
            SlotDecision::Rejected(reason) => Some(*reason),
        }
    }
}

/// Validate a single (employee, start) pair for the context's service.
///
/// Checks run in a fixed order and short-circuit on the first failure.
/// `employee` is `None` when the data layer found no active,
/// schedulable employee with the requested id. Window containment uses
/// the service duration only; block-off and conflict checks use the
/// full footprint including buffer.
pub fn validate_slot(
    ctx: &SlotContext,
    employee: Option<&EmployeeSchedule>,
    start: DateTime<Utc>,
) -> SlotDecision {
    use RejectionReason::*;

    let Some(employee) = employee else {
        return SlotDecision::Rejected(EmployeeNotEligible);
    };

    let day = start.date_naive();
    let day_of_week = day.weekday().num_days_from_sunday();

    let plan = WeekPlan::from_windows(&employee.windows);
    let windows = plan.windows_for(day_of_week);
    if windows.is_empty() {
        return SlotDecision::Rejected(NotAvailableThisDay);
    }

    // Containment compares instants so a window ending at midnight
    // never wraps.
    let duration_end = start + Duration::minutes(ctx.service.duration_minutes);
    let contains = |w: &TimeWindow| {
        start >= day.and_time(w.start).and_utc() && duration_end <= day.and_time(w.end).and_utc()
    };

    if !windows.iter().any(|w| contains(w)) {
        return SlotDecision::Rejected(OutsideAvailabilityWindow);
    }

    // Closed by default: a day with no business-hour row rejects, the
    // same policy the scanner applies.
    match business_window_for(ctx.business_hours, day_of_week) {
        Some(business) if contains(&business) => {}
        _ => return SlotDecision::Rejected(OutsideBusinessHours),
    }

    let footprint = ctx.service.footprint_minutes();
    if hits_block_off(start, footprint, &employee.block_offs) {
        return SlotDecision::Rejected(BlockedOff);
    }
    if hits_appointment(start, footprint, &employee.appointments) {
        return SlotDecision::Rejected(Conflict);
    }
    if too_soon(start, ctx.now, ctx.min_notice_minutes) {
        return SlotDecision::Rejected(TooSoon);
    }

    SlotDecision::Available
}
