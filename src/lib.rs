//! Visitrack visitor management server
//!
//! REST JSON API for registering visits against employee time slots,
//! driving their approval and check-in lifecycle, and the nurse-run
//! high-care clearance. Dashboards follow changes over a WebSocket.

use std::sync::Arc;

use axum::{
    routing::{get, post, put},
    Router,
};
use tower_http::{
    cors::{Any, CorsLayer},
    trace::TraceLayer,
};

pub mod api;
pub mod config;
pub mod error;
pub mod logging;
pub mod models;
pub mod repository;
pub mod services;
pub mod workflow;

pub use config::AppConfig;
pub use error::{AppError, AppResult};

/// Application state shared across all handlers
#[derive(Clone)]
pub struct AppState {
    pub config: Arc<AppConfig>,
    pub services: Arc<services::Services>,
}

/// Create the application router with all routes
pub fn create_router(state: AppState) -> Router {
    // CORS configuration
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    // API v1 routes
    let api_v1 = Router::new()
        // Health check
        .route("/health", get(api::health::health_check))
        .route("/ready", get(api::health::readiness_check))
        // Directory
        .route("/auth/me", get(api::directory::me))
        .route("/employees", get(api::directory::list_employees))
        .route("/purposes", get(api::directory::list_purposes))
        .route("/valid-id-types", get(api::directory::list_valid_id_types))
        // Time slots
        .route("/timeslots/date", post(api::time_slots::create_date_placeholder))
        .route("/timeslots", post(api::time_slots::create_or_update_slot))
        .route(
            "/timeslots/:id",
            put(api::time_slots::update_slot).delete(api::time_slots::delete_slot),
        )
        .route("/employees/:id/timeslots", get(api::time_slots::list_employee_slots))
        .route(
            "/employees/:id/available-timeslots",
            get(api::time_slots::list_available_slots),
        )
        // Visits
        .route(
            "/visits",
            get(api::visits::list_visits).post(api::visits::create_visit),
        )
        .route("/visits/:id", get(api::visits::get_visit))
        .route("/visits/:id/approval", put(api::visits::set_approval_status))
        .route("/visits/:id/check-in", put(api::visits::set_check_in_status))
        .route("/visits/:id/comment", put(api::visits::upsert_comment))
        // Visitors
        .route("/visitors/:id/status", put(api::visitors::set_visitor_status))
        .route("/visitors/:id/approval", put(api::visitors::set_visitor_approval))
        // High care
        .route("/highcare/:visit_id/request", post(api::high_care::request_clearance))
        .route("/health/:visit_id/submit", post(api::high_care::submit_health_declaration))
        .route("/nurse/:visit_id/approval", put(api::high_care::mark_nurse_approved))
        .route("/nurse/high-care-visits", get(api::high_care::list_high_care_visits))
        // Notifications
        .route("/ws/updates", get(api::ws::updates))
        .with_state(state);

    // OpenAPI documentation
    let openapi = api::openapi::create_openapi_router();

    Router::new()
        .nest("/api/v1", api_v1)
        .merge(openapi)
        .layer(TraceLayer::new_for_http())
        .layer(cors)
}
