//! # Availability Handlers
//!
//! This module contains the handlers for availability scanning and slot
//! validation. Scanning enumerates every bookable start time for a service
//! over a day span; validation re-checks one specific candidate against
//! fresh data.
//!
//! ## Request Flow
//!
//! Both handlers follow the same shape:
//!
//! 1. Resolve the service within the team (404 when unknown)
//! 2. Fetch business hours, team settings, and the relevant employee
//!    schedules, pre-filtered to the day span being considered
//! 3. Hand everything to the pure engine in `teambook-core` together with
//!    the current instant
//! 4. Translate the engine's output into the response body
//!
//! The handlers never decide availability themselves; every scheduling rule
//! lives in the engine so that scanning and validation can never drift
//! apart.

use axum::{
    extract::{Path, Query, State},
    Json,
};
use chrono::{NaiveTime, Utc};
use std::sync::Arc;
use teambook_core::{
    engine::{self, SlotContext},
    errors::BookingError,
    models::availability::{
        AvailabilityQuery, AvailabilityResponse, ValidateSlotRequest, ValidateSlotResponse,
    },
    models::service::Service,
    models::team::{BusinessHour, TeamSettings},
};
use uuid::Uuid;

use crate::{middleware::error_handling::AppError, ApiState};

/// Resolves the service and loads the team-level scheduling inputs.
///
/// The service lookup is the only fatal one: an unknown service is a 404.
/// Missing business hours or settings are normal states the engine knows
/// how to interpret (closed team, default notice).
pub(crate) async fn load_booking_inputs(
    state: &ApiState,
    team_id: Uuid,
    service_id: Uuid,
) -> Result<(Service, Vec<BusinessHour>, Option<TeamSettings>), AppError> {
    let service =
        teambook_db::repositories::service::get_service(&state.db_pool, team_id, service_id)
            .await
            .map_err(BookingError::Database)?
            .ok_or_else(|| {
                BookingError::NotFound(format!("Service with ID {} not found", service_id))
            })?;

    let business_hours =
        teambook_db::repositories::team::get_business_hours(&state.db_pool, team_id)
            .await
            .map_err(BookingError::Database)?;

    let settings = teambook_db::repositories::team::get_team_settings(&state.db_pool, team_id)
        .await
        .map_err(BookingError::Database)?;

    Ok((
        service.into(),
        business_hours.into_iter().map(Into::into).collect(),
        settings.map(Into::into),
    ))
}

/// Parses the optional comma-separated employee allow-list.
fn parse_employee_filter(raw: Option<&str>) -> Result<Option<Vec<Uuid>>, AppError> {
    let Some(raw) = raw else {
        return Ok(None);
    };

    let ids: Result<Vec<Uuid>, _> = raw
        .split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(Uuid::parse_str)
        .collect();

    let ids = ids.map_err(|_| {
        AppError(BookingError::Validation(
            "Invalid employee ID format. Must be comma-separated UUIDs".to_string(),
        ))
    })?;

    Ok(if ids.is_empty() { None } else { Some(ids) })
}

/// Lists every bookable start time for a service
///
/// # Endpoint
///
/// ```text
/// GET /api/teams/:team_id/availability?service_id=...&date=2025-06-02
/// GET /api/teams/:team_id/availability?service_id=...&from=2025-06-02&to=2025-06-08
/// GET /api/teams/:team_id/availability?service_id=...&employee_ids=uuid1,uuid2
/// ```
///
/// With neither `date` nor a range, today is scanned. The response lists
/// slot start instants ascending; a slot appears as soon as at least one
/// eligible employee can take it.
///
/// # Errors
///
/// * `BookingError::NotFound` - Unknown service for this team
/// * `BookingError::Validation` - Malformed employee filter or day span
/// * `BookingError::Database` - Database error
#[axum::debug_handler]
pub async fn get_availability(
    State(state): State<Arc<ApiState>>,
    Path(team_id): Path<Uuid>,
    Query(query): Query<AvailabilityQuery>,
) -> Result<Json<AvailabilityResponse>, AppError> {
    let employee_ids = parse_employee_filter(query.employee_ids.as_deref())?;

    let now = Utc::now();

    // Resolve the requested day span: one date, an inclusive from/to
    // range, or today.
    let days = match (query.date, query.from, query.to) {
        (None, None, None) => vec![now.date_naive()],
        (Some(date), None, None) => vec![date],
        (None, Some(from), Some(to)) => {
            if from > to {
                return Err(AppError(BookingError::Validation(
                    "from must not be after to".to_string(),
                )));
            }
            engine::days_in_range(from, to)
        }
        _ => {
            return Err(AppError(BookingError::Validation(
                "Provide either date, or both from and to".to_string(),
            )));
        }
    };

    let (service, business_hours, settings) =
        load_booking_inputs(&state, team_id, query.service_id).await?;

    // Whole calendar days are always fetched, whatever span was asked for
    let (Some(&first_day), Some(&last_day)) = (days.first(), days.last()) else {
        return Ok(Json(AvailabilityResponse { slots: Vec::new() }));
    };
    let range_start = first_day.and_time(NaiveTime::MIN).and_utc();
    let range_end = last_day
        .succ_opt()
        .unwrap_or(last_day)
        .and_time(NaiveTime::MIN)
        .and_utc();

    let employees = teambook_db::repositories::employee::get_eligible_employees(
        &state.db_pool,
        team_id,
        employee_ids.as_deref(),
        range_start,
        range_end,
    )
    .await
    .map_err(BookingError::Database)?;

    let ctx = SlotContext::new(&service, &business_hours, settings.as_ref(), now);
    let slots = engine::scan(&ctx, &employees, &days);

    tracing::debug!(
        "Scanned {} days for team {}: {} slots",
        days.len(),
        team_id,
        slots.len()
    );

    Ok(Json(AvailabilityResponse { slots }))
}

/// Validates a single candidate slot for a specific employee
///
/// # Endpoint
///
/// ```text
/// POST /api/teams/:team_id/availability/validate
/// { "service_id": "...", "employee_id": "...", "start_time": "..." }
/// ```
///
/// The decision is always a 200: a rejected slot is an expected outcome,
/// reported as `{ "available": false, "reason": "<kind>" }` so the client
/// can explain it. Only an unknown service is an error.
///
/// This is the check booking submission relies on; scanner output a
/// client holds may already be stale.
#[axum::debug_handler]
pub async fn validate_slot(
    State(state): State<Arc<ApiState>>,
    Path(team_id): Path<Uuid>,
    Json(payload): Json<ValidateSlotRequest>,
) -> Result<Json<ValidateSlotResponse>, AppError> {
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

    let employees = teambook_db::repositories::employee::get_eligible_employees(
        &state.db_pool,
        team_id,
        Some(&[payload.employee_id]),
        range_start,
        range_end,
    )
    .await
    .map_err(BookingError::Database)?;

    let ctx = SlotContext::new(&service, &business_hours, settings.as_ref(), now);
    let decision = engine::validate_slot(&ctx, employees.first(), payload.start_time);

    tracing::debug!(
        "Validated slot {} for employee {}: {:?}",
        payload.start_time,
        payload.employee_id,
        decision
    );

    Ok(Json(decision.into()))
}
