use crate::models::DbAppointment;
use chrono::{DateTime, Utc};
use eyre::Result;
use sqlx::{Pool, Postgres};
use uuid::Uuid;

/// Postgres error code for an exclusion constraint violation.
const EXCLUSION_VIOLATION: &str = "23P01";

/// Inserts a confirmed appointment. Returns `Ok(None)` when the
/// employee's no-overlap exclusion constraint rejects the insert, which
/// means another booking won the slot between validation and commit.
pub async fn create_appointment(
    pool: &Pool<Postgres>,
    team_id: Uuid,
    employee_id: Uuid,
    service_id: Uuid,
    client_name: &str,
    client_email: Option<&str>,
    start_time: DateTime<Utc>,
    end_time: DateTime<Utc>,
) -> Result<Option<DbAppointment>> {
    let id = Uuid::new_v4();
    let now = Utc::now();

    tracing::debug!(
        "Creating appointment: id={}, employee_id={}, service_id={}, start={}",
        id,
        employee_id,
        service_id,
        start_time
    );

    let result = sqlx::query_as::<_, DbAppointment>(
        r#"
        INSERT INTO appointments (
            id, team_id, employee_id, service_id,
            client_name, client_email, start_time, end_time,
            status, created_at
        )
        VALUES ($1, $2, $3, $4, $5, $6, $7, $8, 'CONFIRMED', $9)
        RETURNING id, team_id, employee_id, service_id,
                  client_name, client_email, start_time, end_time,
                  status, created_at
        "#,
    )
    .bind(id)
    .bind(team_id)
    .bind(employee_id)
    .bind(service_id)
    .bind(client_name)
    .bind(client_email)
    .bind(start_time)
    .bind(end_time)
    .bind(now)
    .fetch_one(pool)
    .await;

    match result {
        Ok(appointment) => {
            tracing::debug!("Appointment created successfully: id={}", id);
            Ok(Some(appointment))
        }
        Err(sqlx::Error::Database(db_err))
            if db_err.code().as_deref() == Some(EXCLUSION_VIOLATION) =>
        {
            tracing::debug!(
                "Appointment insert lost the slot: employee_id={}, start={}",
                employee_id,
                start_time
            );
            Ok(None)
        }
        Err(err) => Err(err.into()),
    }
}

pub async fn get_appointment_by_id(
    pool: &Pool<Postgres>,
    team_id: Uuid,
    id: Uuid,
) -> Result<Option<DbAppointment>> {
    tracing::debug!("Getting appointment: team_id={}, id={}", team_id, id);

    let appointment = sqlx::query_as::<_, DbAppointment>(
        r#"
        SELECT id, team_id, employee_id, service_id,
               client_name, client_email, start_time, end_time,
               status, created_at
        FROM appointments
        WHERE id = $1 AND team_id = $2
        "#,
    )
    .bind(id)
    .bind(team_id)
    .fetch_optional(pool)
    .await?;

    Ok(appointment)
}

pub async fn cancel_appointment(
    pool: &Pool<Postgres>,
    team_id: Uuid,
    id: Uuid,
) -> Result<Option<DbAppointment>> {
    tracing::debug!("Cancelling appointment: team_id={}, id={}", team_id, id);

    let appointment = sqlx::query_as::<_, DbAppointment>(
        r#"
        UPDATE appointments
        SET status = 'CANCELLED'
        WHERE id = $1 AND team_id = $2 AND status <> 'CANCELLED'
        RETURNING id, team_id, employee_id, service_id,
                  client_name, client_email, start_time, end_time,
                  status, created_at
        "#,
    )
    .bind(id)
    .bind(team_id)
    .fetch_optional(pool)
    .await?;

    Ok(appointment)
}
