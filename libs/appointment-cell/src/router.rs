use std::sync::Arc;

use axum::{
    Router,
    routing::{delete, get},
};

use shared_database::AppState;

use crate::handlers;

pub fn appointment_routes(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/", get(handlers::list_appointments).post(handlers::book_appointment))
        .route("/cleanup/all", delete(handlers::clear_appointments))
        .route(
            "/{appointment_id}",
            get(handlers::get_appointment)
                .put(handlers::update_appointment)
                .delete(handlers::cancel_appointment),
        )
        .with_state(state)
}
