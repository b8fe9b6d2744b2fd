use axum::{
    routing::{get, post},
    Router,
};
use std::sync::Arc;

use crate::{handlers, ApiState};

pub fn routes() -> Router<Arc<ApiState>> {
    Router::new()
        .route(
            "/api/teams/:team_id/availability",
            get(handlers::availability::get_availability),
        )
        .route(
            "/api/teams/:team_id/availability/validate",
            post(handlers::availability::validate_slot),
        )
}
