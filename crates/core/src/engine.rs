//! The availability engine.
//!
//! Two operations share one set of constraint predicates:
//!
//! - [`scan`] enumerates every bookable start across employees and days;
//! - [`validate_slot`] re-checks a single (employee, start) pair against
//!   fresh data at booking time and names the violated constraint.
//!
//! Both are pure: all data is prefetched by the caller and "now" is an
//! explicit argument, so identical inputs always produce identical
//! results.

pub mod scanner;
pub mod slots;
pub mod validator;
pub mod windows;

pub use scanner::{days_in_range, scan};
pub use validator::{validate_slot, RejectionReason, SlotDecision};

use chrono::{DateTime, Utc};

use crate::models::service::Service;
use crate::models::team::{BusinessHour, TeamSettings};

/// Inputs shared by every scan/validate call: the service being booked,
/// the team's weekly business hours, the minimum-notice policy, and the
/// instant the caller considers "now".
#[derive(Debug, Clone)]
pub struct SlotContext<'a> {
    pub service: &'a Service,
    pub business_hours: &'a [BusinessHour],
    pub min_notice_minutes: i64,
    pub now: DateTime<Utc>,
}

impl<'a> SlotContext<'a> {
    /// Builds a context, falling back to the default minimum notice when
    /// the team has no settings row.
    pub fn new(
        service: &'a Service,
        business_hours: &'a [BusinessHour],
        settings: Option<&TeamSettings>,
        now: DateTime<Utc>,
    ) -> Self {
        let min_notice_minutes = settings
            .map(|s| s.min_booking_notice_minutes)
            .unwrap_or_else(|| TeamSettings::default().min_booking_notice_minutes);

        Self {
            service,
            business_hours,
            min_notice_minutes,
            now,
        }
    }
}
