use std::sync::Arc;

use axum::{
    Router,
    routing::get,
};

use appointment_cell::router::appointment_routes;
use doctor_cell::router::doctor_routes;
use shared_database::AppState;

pub fn create_router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/", get(|| async { "Clinic scheduling API is running!" }))
        .nest("/doctors", doctor_routes(state.clone()))
        .nest("/appointments", appointment_routes(state))
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::{
        body::Body,
        http::{Request, StatusCode},
    };
    use serde_json::Value;
    use shared_config::AppConfig;
    use shared_database::InMemoryStore;
    use tower::ServiceExt;

    fn app() -> Router {
        let state = AppState::new(AppConfig::default(), Arc::new(InMemoryStore::seeded()));
        create_router(Arc::new(state))
    }

    async fn get_body(uri: &str) -> (StatusCode, Vec<u8>) {
        let request = Request::builder().uri(uri).body(Body::empty()).unwrap();
        let response = app().oneshot(request).await.unwrap();
        let status = response.status();
        let body = axum::body::to_bytes(response.into_body(), usize::MAX).await.unwrap();
        (status, body.to_vec())
    }

    #[tokio::test]
    async fn liveness_route_answers() {
        let (status, body) = get_body("/").await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body, b"Clinic scheduling API is running!");
    }

    #[tokio::test]
    async fn cells_are_mounted() {
        let (status, body) = get_body("/doctors").await;
        assert_eq!(status, StatusCode::OK);
        let doctors: Value = serde_json::from_slice(&body).unwrap();
        assert_eq!(doctors.as_array().map(Vec::len), Some(5));

        let (status, body) = get_body("/appointments").await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(serde_json::from_slice::<Value>(&body).unwrap(), Value::Array(vec![]));

        let (status, _) = get_body("/doctors/1/slots?date=2099-01-05").await;
        assert_eq!(status, StatusCode::OK);
    }
}
