use std::sync::Arc;

use axum::{
    Router,
    routing::{get, post},
};

use shared_config::AppConfig;

use crate::handlers;

pub fn scheduling_routes(state: Arc<AppConfig>) -> Router {
    Router::new()
        .route("/slots", get(handlers::get_available_slots))
        .route("/appointments", post(handlers::book_appointment))
        .with_state(state)
}
