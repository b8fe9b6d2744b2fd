use eyre::Result;
use sqlx::{Pool, Postgres};
use tracing::info;

pub async fn initialize_database(pool: &Pool<Postgres>) -> Result<()> {
    info!("Initializing database schema...");

    // btree_gist enables the exclusion constraint on appointments
    sqlx::query("CREATE EXTENSION IF NOT EXISTS btree_gist;")
        .execute(pool)
        .await?;

    // Create teams table
    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS teams (
            id UUID PRIMARY KEY DEFAULT gen_random_uuid(),
            name VARCHAR(255) NOT NULL,
            created_at TIMESTAMP WITH TIME ZONE NOT NULL DEFAULT NOW()
        );
        "#,
    )
    .execute(pool)
    .await?;

    // Create team_settings table
    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS team_settings (
            team_id UUID PRIMARY KEY REFERENCES teams(id),
            min_booking_notice_minutes INTEGER NOT NULL DEFAULT 5,
            CONSTRAINT non_negative_notice CHECK (min_booking_notice_minutes >= 0)
        );
        "#,
    )
    .execute(pool)
    .await?;

    // Create services table
    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS services (
            id UUID PRIMARY KEY DEFAULT gen_random_uuid(),
            team_id UUID NOT NULL REFERENCES teams(id),
            name VARCHAR(255) NOT NULL,
            duration_minutes INTEGER NOT NULL,
            buffer_minutes INTEGER NOT NULL DEFAULT 0,
            created_at TIMESTAMP WITH TIME ZONE NOT NULL DEFAULT NOW(),
            CONSTRAINT positive_duration CHECK (duration_minutes > 0),
            CONSTRAINT non_negative_buffer CHECK (buffer_minutes >= 0)
        );
        "#,
    )
    .execute(pool)
    .await?;

    // Create employees table
    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS employees (
            id UUID PRIMARY KEY DEFAULT gen_random_uuid(),
            team_id UUID NOT NULL REFERENCES teams(id),
            name VARCHAR(255) NOT NULL,
            is_active BOOLEAN NOT NULL DEFAULT TRUE,
            is_schedulable BOOLEAN NOT NULL DEFAULT TRUE,
            created_at TIMESTAMP WITH TIME ZONE NOT NULL DEFAULT NOW()
        );
        "#,
    )
    .execute(pool)
    .await?;

    // Create business_hours table, one row per open day of the week
    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS business_hours (
            team_id UUID NOT NULL REFERENCES teams(id),
            day_of_week INTEGER NOT NULL,
            open_time TIME NOT NULL,
            close_time TIME NOT NULL,
            PRIMARY KEY (team_id, day_of_week),
            CONSTRAINT valid_day CHECK (day_of_week BETWEEN 0 AND 6),
            CONSTRAINT ordered_hours CHECK (close_time > open_time)
        );
        "#,
    )
    .execute(pool)
    .await?;

    // Create employee_availability table
    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS employee_availability (
            id UUID PRIMARY KEY DEFAULT gen_random_uuid(),
            employee_id UUID NOT NULL REFERENCES employees(id),
            day_of_week INTEGER NOT NULL,
            start_time TIME NOT NULL,
            end_time TIME NOT NULL,
            CONSTRAINT valid_day CHECK (day_of_week BETWEEN 0 AND 6),
            CONSTRAINT ordered_window CHECK (end_time > start_time)
        );
        "#,
    )
    .execute(pool)
    .await?;

    // Create employee_block_offs table
    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS employee_block_offs (
            id UUID PRIMARY KEY DEFAULT gen_random_uuid(),
            employee_id UUID NOT NULL REFERENCES employees(id),
            start_time TIMESTAMP WITH TIME ZONE NOT NULL,
            end_time TIMESTAMP WITH TIME ZONE NOT NULL,
            CONSTRAINT ordered_block CHECK (end_time > start_time)
        );
        "#,
    )
    .execute(pool)
    .await?;

    // Create appointments table. The exclusion constraint is the
    // last-resort guard against two bookings winning the same slot: no
    // two non-cancelled appointments of one employee may overlap.
    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS appointments (
            id UUID PRIMARY KEY DEFAULT gen_random_uuid(),
            team_id UUID NOT NULL REFERENCES teams(id),
            employee_id UUID NOT NULL REFERENCES employees(id),
            service_id UUID NOT NULL REFERENCES services(id),
            client_name VARCHAR(255) NOT NULL,
            client_email VARCHAR(255) NULL,
            start_time TIMESTAMP WITH TIME ZONE NOT NULL,
            end_time TIMESTAMP WITH TIME ZONE NOT NULL,
            status VARCHAR(32) NOT NULL DEFAULT 'CONFIRMED',
            created_at TIMESTAMP WITH TIME ZONE NOT NULL DEFAULT NOW(),
            CONSTRAINT ordered_appointment CHECK (end_time > start_time),
            CONSTRAINT known_status CHECK (status IN ('CONFIRMED', 'CANCELLED', 'COMPLETED')),
            CONSTRAINT no_overlapping_appointments EXCLUDE USING gist (
                employee_id WITH =,
                tstzrange(start_time, end_time) WITH &&
            ) WHERE (status <> 'CANCELLED')
        );
        "#,
    )
    .execute(pool)
    .await?;

    // Create indexes
    sqlx::query(
        r#"
        CREATE INDEX IF NOT EXISTS idx_services_team_id ON services(team_id);
        CREATE INDEX IF NOT EXISTS idx_employees_team_id ON employees(team_id);
        CREATE INDEX IF NOT EXISTS idx_employee_availability_employee_id ON employee_availability(employee_id);
        CREATE INDEX IF NOT EXISTS idx_employee_block_offs_employee_id ON employee_block_offs(employee_id);
        CREATE INDEX IF NOT EXISTS idx_employee_block_offs_start_time ON employee_block_offs(start_time);
        CREATE INDEX IF NOT EXISTS idx_appointments_employee_id ON appointments(employee_id);
        CREATE INDEX IF NOT EXISTS idx_appointments_start_time ON appointments(start_time);
        CREATE INDEX IF NOT EXISTS idx_appointments_team_id ON appointments(team_id);
        "#,
    )
    .execute(pool)
    .await?;

    info!("Database schema initialized successfully.");
    Ok(())
}
