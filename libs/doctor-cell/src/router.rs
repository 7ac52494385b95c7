use std::sync::Arc;

use axum::{
    Router,
    routing::get,
};

use shared_database::AppState;

use crate::handlers;

pub fn doctor_routes(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/", get(handlers::list_doctors).post(handlers::create_doctor))
        .route("/{doctor_id}", get(handlers::get_doctor))
        .route("/{doctor_id}/slots", get(handlers::get_available_slots))
        .with_state(state)
}
