//! # Booking Handlers
//!
//! Appointment submission and lifecycle. Submission is the moment the
//! scanner's output stops being trusted: the slot is re-validated against
//! fresh data and the insert itself is guarded by the database's
//! no-overlap exclusion constraint, so two clients racing for the same
//! slot cannot both win. The loser receives a 409 with the reason.
//!
//! When no employee is requested, the handler picks one: eligible
//! employees are shuffled and the first whose schedule accepts the slot
//! gets the booking. Only the assignment is randomized; whether a slot is
//! bookable at all never depends on chance.

use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use chrono::{Duration, NaiveTime, Utc};
use rand::seq::SliceRandom;
use std::sync::Arc;
use teambook_core::{
    engine::{self, RejectionReason, SlotContext, SlotDecision},
    errors::BookingError,
    models::availability::{
        BookAppointmentRequest, BookAppointmentResponse, ValidateSlotResponse,
    },
};
use teambook_db::models::DbAppointment;
use uuid::Uuid;

use super::availability::load_booking_inputs;
use crate::{middleware::error_handling::AppError, ApiState};

fn appointment_response(appointment: DbAppointment) -> BookAppointmentResponse {
    BookAppointmentResponse {
        id: appointment.id,
        employee_id: appointment.employee_id,
        service_id: appointment.service_id,
        client_name: appointment.client_name,
        start_time: appointment.start_time,
        end_time: appointment.end_time,
        status: appointment.status,
    }
}

fn rejection_response(reason: RejectionReason) -> Response {
    (
        StatusCode::CONFLICT,
        Json(ValidateSlotResponse {
            available: false,
            reason: Some(reason),
        }),
    )
        .into_response()
}

/// Books an appointment
///
/// # Endpoint
///
/// ```text
/// POST /api/teams/:team_id/appointments
/// {
///   "service_id": "...",
///   "employee_id": "...",        // optional
///   "client_name": "Ada",
///   "client_email": "a@b.c",     // optional
///   "start_time": "2025-06-02T09:40:00Z"
/// }
/// ```
///
/// Returns 201 with the created appointment, or 409 with
/// `{ "available": false, "reason": "<kind>" }` when the slot cannot be
/// booked. The stored appointment interval is `[start, start + duration)`;
/// the service buffer is applied at read time when other bookings are
/// checked against it.
///
/// # Errors
///
/// * `BookingError::NotFound` - Unknown service for this team
/// * `BookingError::Database` - Database error
#[axum::debug_handler]
pub async fn create_appointment(
    State(state): State<Arc<ApiState>>,
    Path(team_id): Path<Uuid>,
    Json(payload): Json<BookAppointmentRequest>,
) -> Result<Response, AppError> {
    let now = Utc::now();
    let (service, business_hours, settings) =
        load_booking_inputs(&state, team_id, payload.service_id).await?;

    // Conflict checks see the full footprint, which can spill past
    // midnight, so fetch through the following day.
    let day = payload.start_time.date_naive();
    let range_start = day.and_time(NaiveTime::MIN).and_utc();
    let range_end = day
        .succ_opt()
        .and_then(|d| d.succ_opt())
        .unwrap_or(day)
        .and_time(NaiveTime::MIN)
        .and_utc();

    let filter = payload.employee_id.map(|id| vec![id]);
    let mut employees = teambook_db::repositories::employee::get_eligible_employees(
        &state.db_pool,
        team_id,
        filter.as_deref(),
        range_start,
        range_end,
    )
    .await
    .map_err(BookingError::Database)?;

    // Randomized assignment, never randomized eligibility.
    if payload.employee_id.is_none() {
        employees.shuffle(&mut rand::thread_rng());
    }

    let end_time = payload.start_time + Duration::minutes(service.duration_minutes);
    let ctx = SlotContext::new(&service, &business_hours, settings.as_ref(), now);

    // With no candidates at all, the requested employee (or the whole
    // team) cannot take the booking.
    let mut rejection = RejectionReason::EmployeeNotEligible;

    for employee in &employees {
        match engine::validate_slot(&ctx, Some(employee), payload.start_time) {
            SlotDecision::Available => {
                let inserted = teambook_db::repositories::appointment::create_appointment(
                    &state.db_pool,
                    team_id,
                    employee.id,
                    service.id,
                    &payload.client_name,
                    payload.client_email.as_deref(),
                    payload.start_time,
                    end_time,
                )
                .await
                .map_err(BookingError::Database)?;

                match inserted {
                    Some(appointment) => {
                        tracing::info!(
                            "Booked appointment {} for employee {} at {}",
                            appointment.id,
                            employee.id,
                            appointment.start_time
                        );
                        return Ok((
                            StatusCode::CREATED,
                            Json(appointment_response(appointment)),
                        )
                            .into_response());
                    }
                    // The exclusion constraint fired: another booking won
                    // this employee's slot between validation and insert.
                    None => rejection = RejectionReason::Conflict,
                }
            }
            SlotDecision::Rejected(reason) => rejection = reason,
        }
    }

    Ok(rejection_response(rejection))
}

/// Fetches a single appointment
///
/// # Endpoint
///
/// ```text
/// GET /api/teams/:team_id/appointments/:id
/// ```
#[axum::debug_handler]
pub async fn get_appointment(
    State(state): State<Arc<ApiState>>,
    Path((team_id, id)): Path<(Uuid, Uuid)>,
) -> Result<Json<BookAppointmentResponse>, AppError> {
    let appointment =
        teambook_db::repositories::appointment::get_appointment_by_id(&state.db_pool, team_id, id)
            .await
            .map_err(BookingError::Database)?
            .ok_or_else(|| {
                BookingError::NotFound(format!("Appointment with ID {} not found", id))
            })?;

    Ok(Json(appointment_response(appointment)))
}

/// Cancels an appointment
///
/// # Endpoint
///
/// ```text
/// DELETE /api/teams/:team_id/appointments/:id
/// ```
///
/// Cancelling frees the slot: cancelled appointments no longer occupy
/// time in scans, validations, or the database's overlap constraint.
#[axum::debug_handler]
pub async fn cancel_appointment(
    State(state): State<Arc<ApiState>>,
    Path((team_id, id)): Path<(Uuid, Uuid)>,
) -> Result<Json<BookAppointmentResponse>, AppError> {
    let appointment =
        teambook_db::repositories::appointment::cancel_appointment(&state.db_pool, team_id, id)
            .await
            .map_err(BookingError::Database)?
            .ok_or_else(|| {
                BookingError::NotFound(format!(
                    "Appointment with ID {} not found or already cancelled",
                    id
                ))
            })?;

    Ok(Json(appointment_response(appointment)))
}
