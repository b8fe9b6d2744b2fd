use chrono::{DateTime, Duration, NaiveDate, NaiveTime, TimeZone, Utc};
use mockall::predicate;
use rand::seq::SliceRandom;
use teambook_core::{
    engine::{self, RejectionReason, SlotContext, SlotDecision},
    errors::BookingError,
    models::{
        availability::{BookAppointmentRequest, BookAppointmentResponse},
        employee::{AvailabilityWindow, BookedSlot, EmployeeSchedule},
        service::Service,
        team::{BusinessHour, TeamSettings},
    },
};
use teambook_db::models::{DbAppointment, DbBusinessHour, DbService, DbTeamSettings};
use uuid::Uuid;

use crate::test_utils::TestContext;
use teambook_api::middleware::error_handling::AppError;

// Wrapper that mirrors the booking handler against mock repositories.
// A rejected slot comes back as the inner Err, matching the handler's
// 409 response path.
async fn test_book_appointment_wrapper(
    ctx: &mut TestContext,
    team_id: Uuid,
    payload: BookAppointmentRequest,
    now: DateTime<Utc>,
) -> Result<Result<BookAppointmentResponse, RejectionReason>, AppError> {
    // Load the service, business hours and settings
    let service = ctx
        .service_repo
        .get_service(team_id, payload.service_id)
        .await?
        .ok_or_else(|| {
            AppError(BookingError::NotFound(format!(
                "Service with ID {} not found",
                payload.service_id
            )))
        })?;
    let business_hours: Vec<BusinessHour> = ctx
        .team_repo
        .get_business_hours(team_id)
        .await?
        .into_iter()
        .map(Into::into)
        .collect();
    let settings: Option<TeamSettings> = ctx
        .team_repo
        .get_team_settings(team_id)
        .await?
        .map(Into::into);

    // The footprint can spill past midnight, so fetch through the following day
    let day = payload.start_time.date_naive();
    let range_start = day.and_time(NaiveTime::MIN).and_utc();
    let range_end = day
        .succ_opt()
        .and_then(|d| d.succ_opt())
        .unwrap_or(day)
        .and_time(NaiveTime::MIN)
        .and_utc();

    let filter = payload.employee_id.map(|id| vec![id]);
    let mut employees = ctx
        .employee_repo
        .get_eligible_employees(team_id, filter, range_start, range_end)
        .await?;

    // Randomized assignment, never randomized eligibility
    if payload.employee_id.is_none() {
        employees.shuffle(&mut rand::thread_rng());
    }

    let service: Service = service.into();
    let slot_ctx = SlotContext::new(&service, &business_hours, settings.as_ref(), now);
    let end_time = payload.start_time + Duration::minutes(service.duration_minutes);

    // Static strings keep the mock signature simple
    let client_name: &'static str = Box::leak(payload.client_name.clone().into_boxed_str());
    let client_email: Option<&'static str> = payload
        .client_email
        .clone()
        .map(|email| &*Box::leak(email.into_boxed_str()));

    let mut rejection = RejectionReason::EmployeeNotEligible;
    for employee in &employees {
        match engine::validate_slot(&slot_ctx, Some(employee), payload.start_time) {
            SlotDecision::Available => {
                let created = ctx
                    .appointment_repo
                    .create_appointment(
                        team_id,
                        employee.id,
                        payload.service_id,
                        client_name,
                        client_email,
                        payload.start_time,
                        end_time,
                    )
                    .await?;
                match created {
                    Some(row) => return Ok(Ok(appointment_response(row))),
                    // The database exclusion constraint won the race
                    None => rejection = RejectionReason::Conflict,
                }
            }
            SlotDecision::Rejected(reason) => rejection = reason,
        }
    }

    Ok(Err(rejection))
}

async fn test_get_appointment_wrapper(
    ctx: &mut TestContext,
    team_id: Uuid,
    id: Uuid,
) -> Result<BookAppointmentResponse, AppError> {
    let row = ctx
        .appointment_repo
        .get_appointment_by_id(team_id, id)
        .await?
        .ok_or_else(|| {
            AppError(BookingError::NotFound(format!(
                "Appointment with ID {} not found",
                id
            )))
        })?;

    Ok(appointment_response(row))
}

async fn test_cancel_appointment_wrapper(
    ctx: &mut TestContext,
    team_id: Uuid,
    id: Uuid,
) -> Result<BookAppointmentResponse, AppError> {
    let row = ctx
        .appointment_repo
        .cancel_appointment(team_id, id)
        .await?
        .ok_or_else(|| {
            AppError(BookingError::NotFound(format!(
                "Appointment with ID {} not found",
                id
            )))
        })?;

    Ok(appointment_response(row))
}

fn appointment_response(row: DbAppointment) -> BookAppointmentResponse {
    BookAppointmentResponse {
        id: row.id,
        employee_id: row.employee_id,
        service_id: row.service_id,
        client_name: row.client_name,
        start_time: row.start_time,
        end_time: row.end_time,
        status: row.status,
    }
}

fn monday() -> NaiveDate {
    NaiveDate::from_ymd_opt(2025, 6, 2).expect("valid date")
}

fn pinned_now() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2025, 6, 2, 7, 0, 0).single().expect("valid timestamp")
}

fn t(hour: u32, min: u32) -> NaiveTime {
    NaiveTime::from_hms_opt(hour, min, 0).expect("valid time")
}

fn at(hour: u32, min: u32) -> DateTime<Utc> {
    monday().and_time(t(hour, min)).and_utc()
}

fn service_row(team_id: Uuid, duration: i32, buffer: i32) -> DbService {
    DbService {
        id: Uuid::new_v4(),
        team_id,
        name: "Haircut".to_string(),
        duration_minutes: duration,
        buffer_minutes: buffer,
        created_at: Utc::now(),
    }
}

fn appointment_row(
    team_id: Uuid,
    employee_id: Uuid,
    service_id: Uuid,
    start: DateTime<Utc>,
    end: DateTime<Utc>,
    status: &str,
) -> DbAppointment {
    DbAppointment {
        id: Uuid::new_v4(),
        team_id,
        employee_id,
        service_id,
        client_name: "Ada".to_string(),
        client_email: None,
        start_time: start,
        end_time: end,
        status: status.to_string(),
        created_at: Utc::now(),
    }
}

fn open_monday(id: Uuid) -> EmployeeSchedule {
    EmployeeSchedule {
        id,
        windows: vec![AvailabilityWindow {
            day_of_week: 1,
            start: t(9, 0),
            end: t(17, 0),
        }],
        block_offs: Vec::new(),
        appointments: Vec::new(),
    }
}

fn expect_booking_inputs(ctx: &mut TestContext, team_id: Uuid, service: DbService) {
    let service_id = service.id;
    ctx.service_repo
        .expect_get_service()
        .with(predicate::eq(team_id), predicate::eq(service_id))
        .returning(move |_, _| Ok(Some(service.clone())));

    let hours = vec![DbBusinessHour {
        team_id,
        day_of_week: 1,
        open_time: t(9, 0),
        close_time: t(17, 0),
    }];
    ctx.team_repo
        .expect_get_business_hours()
        .with(predicate::eq(team_id))
        .returning(move |_| Ok(hours.clone()));

    ctx.team_repo
        .expect_get_team_settings()
        .with(predicate::eq(team_id))
        .returning(move |_| {
            Ok(Some(DbTeamSettings {
                team_id,
                min_booking_notice_minutes: 5,
            }))
        });
}

fn booking_payload(service_id: Uuid, employee_id: Option<Uuid>, start: DateTime<Utc>) -> BookAppointmentRequest {
    BookAppointmentRequest {
        service_id,
        employee_id,
        client_name: "Ada".to_string(),
        client_email: None,
        start_time: start,
    }
}

#[tokio::test]
async fn test_book_appointment_success() {
    let mut ctx = TestContext::new();
    let team_id = Uuid::new_v4();
    let employee_id = Uuid::new_v4();

    let service = service_row(team_id, 30, 10);
    let service_id = service.id;
    expect_booking_inputs(&mut ctx, team_id, service);

    let employee = open_monday(employee_id);
    ctx.employee_repo
        .expect_get_eligible_employees()
        .withf(move |_, ids, _, _| ids.as_deref() == Some(&[employee_id][..]))
        .returning(move |_, _, _, _| Ok(vec![employee.clone()]));

    // The insert carries the exact slot the engine approved
    let start = at(10, 0);
    let end = at(10, 30);
    ctx.appointment_repo
        .expect_create_appointment()
        .with(
            predicate::eq(team_id),
            predicate::eq(employee_id),
            predicate::eq(service_id),
            predicate::eq("Ada"),
            predicate::eq(None::<&'static str>),
            predicate::eq(start),
            predicate::eq(end),
        )
        .returning(move |team_id, employee_id, service_id, _, _, start, end| {
            Ok(Some(appointment_row(
                team_id,
                employee_id,
                service_id,
                start,
                end,
                "CONFIRMED",
            )))
        });

    let payload = booking_payload(service_id, Some(employee_id), start);
    let result = test_book_appointment_wrapper(&mut ctx, team_id, payload, pinned_now()).await;

    let response = result
        .expect("Expected booking to succeed")
        .expect("Expected an available slot");
    assert_eq!(response.employee_id, employee_id);
    assert_eq!(response.service_id, service_id);
    assert_eq!(response.start_time, start);
    assert_eq!(response.end_time, end);
    assert_eq!(response.status, "CONFIRMED");
}

#[tokio::test]
async fn test_book_appointment_conflict_never_inserts() {
    let mut ctx = TestContext::new();
    let team_id = Uuid::new_v4();
    let employee_id = Uuid::new_v4();

    let service = service_row(team_id, 30, 10);
    let service_id = service.id;
    expect_booking_inputs(&mut ctx, team_id, service);

    // The employee already has a 10:00-10:30 appointment
    let mut employee = open_monday(employee_id);
    employee.appointments.push(BookedSlot {
        start: at(10, 0),
        end: at(10, 30),
        buffer_minutes: 0,
    });
    ctx.employee_repo
        .expect_get_eligible_employees()
        .returning(move |_, _, _, _| Ok(vec![employee.clone()]));

    ctx.appointment_repo.expect_create_appointment().times(0);

    let payload = booking_payload(service_id, Some(employee_id), at(10, 0));
    let result = test_book_appointment_wrapper(&mut ctx, team_id, payload, pinned_now()).await;

    let rejection = result
        .expect("Expected booking to run")
        .expect_err("Expected the slot to be rejected");
    assert_eq!(rejection, RejectionReason::Conflict);
}

#[test_log::test(tokio::test)]
async fn test_book_appointment_lost_race_maps_to_conflict() {
    let mut ctx = TestContext::new();
    let team_id = Uuid::new_v4();
    let employee_id = Uuid::new_v4();

    let service = service_row(team_id, 30, 10);
    let service_id = service.id;
    expect_booking_inputs(&mut ctx, team_id, service);

    let employee = open_monday(employee_id);
    ctx.employee_repo
        .expect_get_eligible_employees()
        .returning(move |_, _, _, _| Ok(vec![employee.clone()]));

    // Validation passed but another booking landed first, so the
    // exclusion constraint rejects the insert.
    ctx.appointment_repo
        .expect_create_appointment()
        .returning(|_, _, _, _, _, _, _| Ok(None));

    let payload = booking_payload(service_id, Some(employee_id), at(10, 0));
    let result = test_book_appointment_wrapper(&mut ctx, team_id, payload, pinned_now()).await;

    let rejection = result
        .expect("Expected booking to run")
        .expect_err("Expected the lost race to reject");
    assert_eq!(rejection, RejectionReason::Conflict);
}

#[tokio::test]
async fn test_book_appointment_auto_assigns_free_employee() {
    let mut ctx = TestContext::new();
    let team_id = Uuid::new_v4();
    let busy_id = Uuid::new_v4();
    let free_id = Uuid::new_v4();

    let service = service_row(team_id, 30, 10);
    let service_id = service.id;
    expect_booking_inputs(&mut ctx, team_id, service);

    // No employee requested: one of the two candidates is already booked,
    // so whatever order the shuffle picks, only the free one can win.
    let mut busy = open_monday(busy_id);
    busy.appointments.push(BookedSlot {
        start: at(10, 0),
        end: at(10, 30),
        buffer_minutes: 0,
    });
    let free = open_monday(free_id);
    let candidates = vec![busy, free];
    ctx.employee_repo
        .expect_get_eligible_employees()
        .withf(|_, ids, _, _| ids.is_none())
        .returning(move |_, _, _, _| Ok(candidates.clone()));

    ctx.appointment_repo
        .expect_create_appointment()
        .withf(move |_, employee_id, _, _, _, _, _| *employee_id == free_id)
        .returning(move |team_id, employee_id, service_id, _, _, start, end| {
            Ok(Some(appointment_row(
                team_id,
                employee_id,
                service_id,
                start,
                end,
                "CONFIRMED",
            )))
        });

    let payload = booking_payload(service_id, None, at(10, 0));
    let result = test_book_appointment_wrapper(&mut ctx, team_id, payload, pinned_now()).await;

    let response = result
        .expect("Expected booking to succeed")
        .expect("Expected an available employee");
    assert_eq!(response.employee_id, free_id);
}

#[tokio::test]
async fn test_book_appointment_too_soon_rejected() {
    let mut ctx = TestContext::new();
    let team_id = Uuid::new_v4();
    let employee_id = Uuid::new_v4();

    let service = service_row(team_id, 30, 10);
    let service_id = service.id;
    expect_booking_inputs(&mut ctx, team_id, service);

    let employee = open_monday(employee_id);
    ctx.employee_repo
        .expect_get_eligible_employees()
        .returning(move |_, _, _, _| Ok(vec![employee.clone()]));

    ctx.appointment_repo.expect_create_appointment().times(0);

    // 9:02 is inside the five minute notice period at a pinned 9:00 clock
    let now = Utc.with_ymd_and_hms(2025, 6, 2, 9, 0, 0).single().expect("valid timestamp");
    let payload = booking_payload(service_id, Some(employee_id), at(9, 2));
    let result = test_book_appointment_wrapper(&mut ctx, team_id, payload, now).await;

    let rejection = result
        .expect("Expected booking to run")
        .expect_err("Expected the slot to be rejected");
    assert_eq!(rejection, RejectionReason::TooSoon);
}

#[tokio::test]
async fn test_book_appointment_no_candidates() {
    let mut ctx = TestContext::new();
    let team_id = Uuid::new_v4();

    let service = service_row(team_id, 30, 10);
    let service_id = service.id;
    expect_booking_inputs(&mut ctx, team_id, service);

    ctx.employee_repo
        .expect_get_eligible_employees()
        .returning(|_, _, _, _| Ok(Vec::new()));

    let payload = booking_payload(service_id, None, at(10, 0));
    let result = test_book_appointment_wrapper(&mut ctx, team_id, payload, pinned_now()).await;

    let rejection = result
        .expect("Expected booking to run")
        .expect_err("Expected no employee to be bookable");
    assert_eq!(rejection, RejectionReason::EmployeeNotEligible);
}

#[tokio::test]
async fn test_get_appointment_success() {
    let mut ctx = TestContext::new();
    let team_id = Uuid::new_v4();
    let id = Uuid::new_v4();

    let row = appointment_row(
        team_id,
        Uuid::new_v4(),
        Uuid::new_v4(),
        at(10, 0),
        at(10, 30),
        "CONFIRMED",
    );
    let mut stored = row.clone();
    stored.id = id;
    ctx.appointment_repo
        .expect_get_appointment_by_id()
        .with(predicate::eq(team_id), predicate::eq(id))
        .returning(move |_, _| Ok(Some(stored.clone())));

    let result = test_get_appointment_wrapper(&mut ctx, team_id, id).await;

    let response = result.expect("Expected appointment to be found");
    assert_eq!(response.id, id);
    assert_eq!(response.status, "CONFIRMED");
}

#[tokio::test]
async fn test_get_appointment_not_found() {
    let mut ctx = TestContext::new();
    let team_id = Uuid::new_v4();
    let id = Uuid::new_v4();

    ctx.appointment_repo
        .expect_get_appointment_by_id()
        .with(predicate::eq(team_id), predicate::eq(id))
        .returning(|_, _| Ok(None));

    let result = test_get_appointment_wrapper(&mut ctx, team_id, id).await;

    assert!(result.is_err());
    match result.unwrap_err().0 {
        BookingError::NotFound(_) => {}
        e => panic!("Expected NotFound error, got: {:?}", e),
    }
}

#[test_log::test(tokio::test)]
async fn test_cancel_appointment_success() {
    let mut ctx = TestContext::new();
    let team_id = Uuid::new_v4();
    let id = Uuid::new_v4();

    let mut row = appointment_row(
        team_id,
        Uuid::new_v4(),
        Uuid::new_v4(),
        at(10, 0),
        at(10, 30),
        "CANCELLED",
    );
    row.id = id;
    ctx.appointment_repo
        .expect_cancel_appointment()
        .with(predicate::eq(team_id), predicate::eq(id))
        .returning(move |_, _| Ok(Some(row.clone())));

    let result = test_cancel_appointment_wrapper(&mut ctx, team_id, id).await;

    let response = result.expect("Expected cancellation to succeed");
    assert_eq!(response.id, id);
    assert_eq!(response.status, "CANCELLED");
}

#[tokio::test]
async fn test_cancel_appointment_already_cancelled() {
    let mut ctx = TestContext::new();
    let team_id = Uuid::new_v4();
    let id = Uuid::new_v4();

    // Cancelling twice finds no active row the second time
    ctx.appointment_repo
        .expect_cancel_appointment()
        .with(predicate::eq(team_id), predicate::eq(id))
        .returning(|_, _| Ok(None));

    let result = test_cancel_appointment_wrapper(&mut ctx, team_id, id).await;

    assert!(result.is_err());
    match result.unwrap_err().0 {
        BookingError::NotFound(_) => {}
        e => panic!("Expected NotFound error, got: {:?}", e),
    }
}
