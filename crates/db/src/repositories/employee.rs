use crate::models::{DbAvailabilityWindow, DbBlockOff, DbEmployee};
use chrono::{DateTime, Utc};
use eyre::Result;
use sqlx::{Pool, Postgres};
use teambook_core::models::employee::{BookedSlot, EmployeeSchedule};
use uuid::Uuid;

/// Loads every employee of the team who can currently be booked, with
/// the schedule data the engine needs for the `[range_start, range_end)`
/// span: weekly availability, plus block-offs and non-cancelled
/// appointments whose footprint touches the range.
///
/// Employees who are inactive, not schedulable, or outside the optional
/// allow-list are omitted entirely.
pub async fn get_eligible_employees(
    pool: &Pool<Postgres>,
    team_id: Uuid,
    employee_ids: Option<&[Uuid]>,
    range_start: DateTime<Utc>,
    range_end: DateTime<Utc>,
) -> Result<Vec<EmployeeSchedule>> {
    tracing::debug!(
        "Getting eligible employees: team_id={}, filter={:?}, range={}..{}",
        team_id,
        employee_ids,
        range_start,
        range_end
    );

    let employees = sqlx::query_as::<_, DbEmployee>(
        r#"
        SELECT id, team_id, name, is_active, is_schedulable, created_at
        FROM employees
        WHERE team_id = $1
          AND is_active = TRUE
          AND is_schedulable = TRUE
          AND ($2::uuid[] IS NULL OR id = ANY($2))
        ORDER BY id ASC
        "#,
    )
    .bind(team_id)
    .bind(employee_ids.map(|ids| ids.to_vec()))
    .fetch_all(pool)
    .await?;

    let mut schedules = Vec::with_capacity(employees.len());
    for employee in employees {
        let windows = sqlx::query_as::<_, DbAvailabilityWindow>(
            r#"
            SELECT id, employee_id, day_of_week, start_time, end_time
            FROM employee_availability
            WHERE employee_id = $1
            ORDER BY day_of_week ASC, start_time ASC
            "#,
        )
        .bind(employee.id)
        .fetch_all(pool)
        .await?;

        let block_offs = sqlx::query_as::<_, DbBlockOff>(
            r#"
            SELECT id, employee_id, start_time, end_time
            FROM employee_block_offs
            WHERE employee_id = $1
              AND start_time < $3
              AND end_time > $2
            ORDER BY start_time ASC
            "#,
        )
        .bind(employee.id)
        .bind(range_start)
        .bind(range_end)
        .fetch_all(pool)
        .await?;

        // An appointment's footprint extends past its end by its own
        // service's buffer, so the range filter must account for it.
        let appointments = sqlx::query_as::<_, (DateTime<Utc>, DateTime<Utc>, i32)>(
            r#"
            SELECT a.start_time, a.end_time, s.buffer_minutes
            FROM appointments a
            JOIN services s ON s.id = a.service_id
            WHERE a.employee_id = $1
              AND a.status <> 'CANCELLED'
              AND a.start_time < $3
              AND a.end_time + make_interval(mins => s.buffer_minutes) > $2
            ORDER BY a.start_time ASC
            "#,
        )
        .bind(employee.id)
        .bind(range_start)
        .bind(range_end)
        .fetch_all(pool)
        .await?;

        schedules.push(EmployeeSchedule {
            id: employee.id,
            windows: windows.into_iter().map(Into::into).collect(),
            block_offs: block_offs.into_iter().map(Into::into).collect(),
            appointments: appointments
                .into_iter()
                .map(|(start, end, buffer)| BookedSlot {
                    start,
                    end,
                    buffer_minutes: i64::from(buffer),
                })
                .collect(),
        });
    }

    tracing::debug!("Found {} eligible employees", schedules.len());
    Ok(schedules)
}
