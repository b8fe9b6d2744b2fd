use chrono::{DateTime, Utc};
use mockall::mock;
use uuid::Uuid;

use crate::models::{DbAppointment, DbBusinessHour, DbService, DbTeamSettings};
use teambook_core::models::employee::EmployeeSchedule;

// Mock repositories for testing
mock! {
    pub ServiceRepo {
        pub async fn get_service(
            &self,
            team_id: Uuid,
            service_id: Uuid,
        ) -> eyre::Result<Option<DbService>>;
    }
}

mock! {
    pub TeamRepo {
        pub async fn get_business_hours(
            &self,
            team_id: Uuid,
        ) -> eyre::Result<Vec<DbBusinessHour>>;

        pub async fn get_team_settings(
            &self,
            team_id: Uuid,
        ) -> eyre::Result<Option<DbTeamSettings>>;
    }
}

mock! {
    pub EmployeeRepo {
        pub async fn get_eligible_employees(
            &self,
            team_id: Uuid,
            employee_ids: Option<Vec<Uuid>>,
            range_start: DateTime<Utc>,
            range_end: DateTime<Utc>,
        ) -> eyre::Result<Vec<EmployeeSchedule>>;
    }
}

mock! {
    pub AppointmentRepo {
        pub async fn create_appointment(
            &self,
            team_id: Uuid,
            employee_id: Uuid,
            service_id: Uuid,
            client_name: &'static str,
            client_email: Option<&'static str>,
            start_time: DateTime<Utc>,
            end_time: DateTime<Utc>,
        ) -> eyre::Result<Option<DbAppointment>>;

        pub async fn get_appointment_by_id(
            &self,
            team_id: Uuid,
            id: Uuid,
        ) -> eyre::Result<Option<DbAppointment>>;

        pub async fn cancel_appointment(
            &self,
            team_id: Uuid,
            id: Uuid,
        ) -> eyre::Result<Option<DbAppointment>>;
    }
}
