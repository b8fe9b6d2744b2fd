use crate::models::{DbBusinessHour, DbTeamSettings};
use eyre::Result;
use sqlx::{Pool, Postgres};
use uuid::Uuid;

pub async fn get_business_hours(
    pool: &Pool<Postgres>,
    team_id: Uuid,
) -> Result<Vec<DbBusinessHour>> {
    tracing::debug!("Getting business hours: team_id={}", team_id);

    let hours = sqlx::query_as::<_, DbBusinessHour>(
        r#"
        SELECT team_id, day_of_week, open_time, close_time
        FROM business_hours
        WHERE team_id = $1
        ORDER BY day_of_week ASC
        "#,
    )
    .bind(team_id)
    .fetch_all(pool)
    .await?;

    Ok(hours)
}

pub async fn get_team_settings(
    pool: &Pool<Postgres>,
    team_id: Uuid,
) -> Result<Option<DbTeamSettings>> {
    tracing::debug!("Getting team settings: team_id={}", team_id);

    let settings = sqlx::query_as::<_, DbTeamSettings>(
        r#"
        SELECT team_id, min_booking_notice_minutes
        FROM team_settings
        WHERE team_id = $1
        "#,
    )
    .bind(team_id)
    .fetch_optional(pool)
    .await?;

    Ok(settings)
}
