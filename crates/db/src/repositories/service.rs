use crate::models::DbService;
use eyre::Result;
use sqlx::{Pool, Postgres};
use uuid::Uuid;

pub async fn get_service(
    pool: &Pool<Postgres>,
    team_id: Uuid,
    service_id: Uuid,
) -> Result<Option<DbService>> {
    tracing::debug!("Getting service: team_id={}, service_id={}", team_id, service_id);

    let service = sqlx::query_as::<_, DbService>(
        r#"
        SELECT id, team_id, name, duration_minutes, buffer_minutes, created_at
        FROM services
        WHERE id = $1 AND team_id = $2
        "#,
    )
    .bind(service_id)
    .bind(team_id)
    .fetch_optional(pool)
    .await?;

    if service.is_none() {
        tracing::debug!("Service not found: service_id={}", service_id);
    }

    Ok(service)
}
