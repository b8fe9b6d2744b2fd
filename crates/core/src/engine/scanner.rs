//! The availability scanner: computes every bookable start time for a
//! service across a set of employees and days.

use std::collections::BTreeSet;

use chrono::{DateTime, Datelike, NaiveDate, Utc};

use super::slots::{candidate_starts, hits_appointment, hits_block_off, too_soon};
use super::windows::{business_window_for, WeekPlan};
use super::SlotContext;
use crate::models::employee::EmployeeSchedule;

/// Every day from `from` through `to`, inclusive. Empty when the range
/// is inverted.
pub fn days_in_range(from: NaiveDate, to: NaiveDate) -> Vec<NaiveDate> {
    from.iter_days().take_while(|d| *d <= to).collect()
}

/// Scan `employees` over `days` and return the union of open slot
/// starts, ascending and deduplicated. A slot offered by several
/// employees appears once.
pub fn scan(
    ctx: &SlotContext,
    employees: &[EmployeeSchedule],
    days: &[NaiveDate],
) -> Vec<DateTime<Utc>> {
    let footprint = ctx.service.footprint_minutes();
    let mut slots = BTreeSet::new();

    for employee in employees {
        let plan = WeekPlan::from_windows(&employee.windows);

        for &day in days {
            let day_of_week = day.weekday().num_days_from_sunday();
            let Some(business) = business_window_for(ctx.business_hours, day_of_week) else {
                continue;
            };

            for window in plan.windows_for(day_of_week) {
                let Some(clipped) = window.clip(&business) else {
                    continue;
                };

                for start in candidate_starts(day, clipped, footprint) {
                    if too_soon(start, ctx.now, ctx.min_notice_minutes) {
                        continue;
                    }
                    if hits_block_off(start, footprint, &employee.block_offs) {
                        continue;
                    }
                    if hits_appointment(start, footprint, &employee.appointments) {
                        continue;
                    }
                    slots.insert(start);
                }
            }
        }
    }

    slots.into_iter().collect()
}
