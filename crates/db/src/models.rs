use chrono::{DateTime, NaiveTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

use teambook_core::models::employee::{AvailabilityWindow, BlockOff};
use teambook_core::models::service::Service;
use teambook_core::models::team::{BusinessHour, TeamSettings};

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct DbTeam {
    pub id: Uuid,
    pub name: String,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct DbTeamSettings {
    pub team_id: Uuid,
    pub min_booking_notice_minutes: i32,
}

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct DbService {
    pub id: Uuid,
    pub team_id: Uuid,
    pub name: String,
    pub duration_minutes: i32,
    pub buffer_minutes: i32,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct DbEmployee {
    pub id: Uuid,
    pub team_id: Uuid,
    pub name: String,
    pub is_active: bool,
    pub is_schedulable: bool,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct DbBusinessHour {
    pub team_id: Uuid,
    pub day_of_week: i32,
    pub open_time: NaiveTime,
    pub close_time: NaiveTime,
}

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct DbAvailabilityWindow {
    pub id: Uuid,
    pub employee_id: Uuid,
    pub day_of_week: i32,
    pub start_time: NaiveTime,
    pub end_time: NaiveTime,
}

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct DbBlockOff {
    pub id: Uuid,
    pub employee_id: Uuid,
    pub start_time: DateTime<Utc>,
    pub end_time: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct DbAppointment {
    pub id: Uuid,
    pub team_id: Uuid,
    pub employee_id: Uuid,
    pub service_id: Uuid,
    pub client_name: String,
    pub client_email: Option<String>,
    pub start_time: DateTime<Utc>,
    pub end_time: DateTime<Utc>,
    pub status: String,
    pub created_at: DateTime<Utc>,
}

// Row-to-domain conversions. The engine works in i64 minutes; columns
// store INTEGER.

impl From<DbService> for Service {
    fn from(row: DbService) -> Self {
        Self {
            id: row.id,
            team_id: row.team_id,
            name: row.name,
            duration_minutes: i64::from(row.duration_minutes),
            buffer_minutes: i64::from(row.buffer_minutes),
        }
    }
}

impl From<DbTeamSettings> for TeamSettings {
    fn from(row: DbTeamSettings) -> Self {
        Self {
            min_booking_notice_minutes: i64::from(row.min_booking_notice_minutes),
        }
    }
}

impl From<DbBusinessHour> for BusinessHour {
    fn from(row: DbBusinessHour) -> Self {
        Self {
            day_of_week: row.day_of_week as u32,
            open: row.open_time,
            close: row.close_time,
        }
    }
}

impl From<DbAvailabilityWindow> for AvailabilityWindow {
    fn from(row: DbAvailabilityWindow) -> Self {
        Self {
            day_of_week: row.day_of_week as u32,
            start: row.start_time,
            end: row.end_time,
        }
    }
}

impl From<DbBlockOff> for BlockOff {
    fn from(row: DbBlockOff) -> Self {
        Self {
            start: row.start_time,
            end: row.end_time,
        }
    }
}
