//! # Teambook API
//!
//! The API crate provides the web server implementation for the teambook
//! booking service. It defines RESTful endpoints for availability scanning,
//! slot validation, and appointment booking.
//!
//! ## Architecture
//!
//! The crate splits along the usual lines:
//!
//! - **Routes**: URL structure, one module per resource
//! - **Handlers**: request orchestration; fetch, call the engine, respond
//! - **Middleware**: error-to-response mapping
//! - **Config**: environment-driven server settings
//!
//! The API uses Axum as the web framework and SQLx for database access.
//! All scheduling decisions are delegated to the pure engine in
//! `teambook-core`; handlers only fetch data and translate results.

/// Configuration module for API settings
pub mod config;
/// Request handlers that implement business logic
pub mod handlers;
/// Middleware for logging and error handling
pub mod middleware;
/// Route definitions and API endpoint structure
pub mod routes;

use std::sync::Arc;
use std::time::Duration;

use axum::{
    error_handling::HandleErrorLayer,
    http::{header, Method, StatusCode},
    Router,
};
use eyre::Result;
use sqlx::PgPool;
use tokio::net::TcpListener;
use tower::{BoxError, ServiceBuilder};
use tower_http::trace::TraceLayer;
use tracing::info;
use tracing_subscriber::FmtSubscriber;

/// Shared state handed to every request handler.
///
/// Only the connection pool lives here; everything else a handler needs
/// is fetched per request.
///
/// # Example
///
/// ```rust,ignore
/// let state = Arc::new(ApiState { db_pool });
/// let app = Router::new().with_state(state);
/// ```
pub struct ApiState {
    /// PostgreSQL connection pool
    pub db_pool: PgPool,
}

/// Converts middleware failures into HTTP responses. A timed-out request
/// gets a 408; anything else surfaces as a 500.
async fn handle_middleware_error(error: BoxError) -> (StatusCode, String) {
    if error.is::<tower::timeout::error::Elapsed>() {
        (
            StatusCode::REQUEST_TIMEOUT,
            "Request took too long".to_string(),
        )
    } else {
        (
            StatusCode::INTERNAL_SERVER_ERROR,
            format!("Unhandled internal error: {}", error),
        )
    }
}

/// Assembles the full application router over the shared state.
fn app_router(state: Arc<ApiState>) -> Router {
    Router::new()
        .merge(routes::health::routes())
        .merge(routes::availability::routes())
        .merge(routes::booking::routes())
        .with_state(state)
}

/// Starts the API server with the provided configuration and database connection
///
/// Initializes logging, assembles the router with its middleware stack,
/// and serves until the process is stopped.
///
/// # Example
///
/// ```rust,ignore
/// let config = ApiConfig::from_env()?;
/// let db_pool = create_pool(&config.database_url).await?;
/// start_server(config, db_pool).await?;
/// ```
pub async fn start_server(config: config::ApiConfig, db_pool: PgPool) -> Result<()> {
    // Install the global tracing subscriber
    let subscriber = FmtSubscriber::builder()
        .with_max_level(config.log_level)
        .finish();
    tracing::subscriber::set_global_default(subscriber)?;

    let state = Arc::new(ApiState { db_pool });
    let app = app_router(state);

    // CORS stays off unless origins were configured
    let app = if let Some(origins) = &config.cors_origins {
        let origins: Vec<header::HeaderValue> =
            origins.iter().map(|origin| origin.parse().unwrap()).collect();
        let cors = tower_http::cors::CorsLayer::new()
            .allow_methods([Method::GET, Method::POST, Method::DELETE, Method::OPTIONS])
            .allow_headers([header::CONTENT_TYPE, header::ACCEPT])
            .allow_origin(origins)
            .allow_credentials(true);

        app.layer(cors)
    } else {
        app
    };

    // Request tracing and timeout middleware. The timeout layer errors
    // with a BoxError, so it must sit inside the error handler.
    let app = app.layer(
        ServiceBuilder::new()
            .layer(HandleErrorLayer::new(handle_middleware_error))
            .timeout(Duration::from_secs(config.request_timeout))
            .layer(TraceLayer::new_for_http()),
    );

    let addr = config.server_addr();
    let listener = TcpListener::bind(&addr).await?;
    info!("Server listening on http://{}", addr);
    axum::serve(listener, app).await?;

    Ok(())
}
