// --- File: crates/citaflow_booking/src/routes.rs

use axum::{
    routing::{get, post},
    Router,
};
use std::sync::Arc;

use crate::coordinator::BookingServices;
use crate::handlers::{
    check_availability_handler, create_reservation_handler, health_handler, BookingState,
};
use citaflow_config::AppConfig;

/// Creates a router containing all booking routes. The external service
/// handles are built by the binary at startup and injected here.
pub fn routes(config: Arc<AppConfig>, services: BookingServices) -> Router {
    let state = Arc::new(BookingState { config, services });

    Router::new()
        .route("/check-availability", post(check_availability_handler))
        .route("/reservar", post(create_reservation_handler))
        .route("/health", get(health_handler))
        .with_state(state)
}
