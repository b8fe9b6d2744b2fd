use axum::{
    routing::{get, post},
    Router,
};
use std::sync::Arc;

use crate::{handlers, ApiState};

pub fn routes() -> Router<Arc<ApiState>> {
    Router::new()
        .route(
            "/api/teams/:team_id/appointments",
            post(handlers::booking::create_appointment),
        )
        .route(
            "/api/teams/:team_id/appointments/:id",
            get(handlers::booking::get_appointment).delete(handlers::booking::cancel_appointment),
        )
}
