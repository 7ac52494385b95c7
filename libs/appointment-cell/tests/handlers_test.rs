// libs/appointment-cell/tests/handlers_test.rs

use std::sync::Arc;

use axum::{
    body::Body,
    http::{Request, StatusCode},
    Router,
};
use serde_json::{json, Value};
use tower::ServiceExt;

use appointment_cell::router::appointment_routes;
use shared_config::AppConfig;
use shared_database::{AppState, InMemoryStore, SchedulingStore};

fn test_state() -> (Arc<AppState>, Arc<InMemoryStore>) {
    let store = Arc::new(InMemoryStore::seeded());
    let state = Arc::new(AppState::new(AppConfig::default(), store.clone()));
    (state, store)
}

async fn send(app: Router, request: Request<Body>) -> (StatusCode, Value) {
    let response = app.oneshot(request).await.unwrap();
    let status = response.status();
    let body = axum::body::to_bytes(response.into_body(), usize::MAX).await.unwrap();
    let json = if body.is_empty() { Value::Null } else { serde_json::from_slice(&body).unwrap() };
    (status, json)
}

fn request(method: &str, uri: &str, body: Option<Value>) -> Request<Body> {
    let builder = Request::builder().method(method).uri(uri);
    match body {
        Some(body) => builder
            .header("content-type", "application/json")
            .body(Body::from(body.to_string()))
            .unwrap(),
        None => builder.body(Body::empty()).unwrap(),
    }
}

fn booking(doctor_id: Value, date: &str) -> Value {
    json!({
        "doctor_id": doctor_id,
        "date": date,
        "duration": 30,
        "appointment_type": "consultation",
        "patient_name": "Rahul Verma",
        "patient_email": "rahul@example.com",
        "notes": "First visit"
    })
}

#[tokio::test]
async fn test_book_appointment() {
    let (state, store) = test_state();
    let app = appointment_routes(state);

    let (status, body) = send(app, request("POST", "/", Some(booking(json!(1), "2099-01-05T10:00:00")))).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!({"id": 1, "message": "Appointment booked successfully"}));

    let stored = store.get_appointment(1).await.unwrap().unwrap();
    assert_eq!(stored.notes.as_deref(), Some("First visit"));
}

#[tokio::test]
async fn test_book_accepts_string_doctor_id() {
    let (state, _) = test_state();
    let (status, _) = send(
        appointment_routes(state),
        request("POST", "/", Some(booking(json!("2"), "2099-01-05T10:00:00+05:30"))),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
}

#[tokio::test]
async fn test_double_booking_returns_reason() {
    let (state, _) = test_state();
    let body = booking(json!(1), "2099-01-05T10:00:00+05:30");

    let (status, _) = send(appointment_routes(state.clone()), request("POST", "/", Some(body.clone()))).await;
    assert_eq!(status, StatusCode::OK);

    let (status, response) = send(appointment_routes(state), request("POST", "/", Some(body))).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(response, json!({"error": "Time slot already booked"}));
}

#[tokio::test]
async fn test_booking_outside_hours() {
    let (state, _) = test_state();
    let (status, body) = send(
        appointment_routes(state),
        request("POST", "/", Some(booking(json!(1), "2099-01-05T18:00:00+05:30"))),
    )
    .await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], json!("Appointment time is outside doctor working hours"));
}

#[tokio::test]
async fn test_booking_validation_errors() {
    let (state, _) = test_state();

    let (status, body) = send(
        appointment_routes(state.clone()),
        request("POST", "/", Some(booking(json!(99), "2099-01-05T10:00:00+05:30"))),
    )
    .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["error"], json!("Doctor not found"));

    let mut missing_name = booking(json!(1), "2099-01-05T10:00:00+05:30");
    missing_name["patient_name"] = json!("");
    let (status, body) = send(appointment_routes(state.clone()), request("POST", "/", Some(missing_name))).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], json!("patient_name is required"));

    let (status, _) = send(
        appointment_routes(state),
        request("POST", "/", Some(booking(json!(1), "next tuesday"))),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_booking_rejects_oversized_duration() {
    let (state, store) = test_state();

    for duration in [json!(i64::MAX), json!("9000000000000000"), json!(1441)] {
        let mut body = booking(json!(1), "2099-01-05T10:00:00+05:30");
        body["duration"] = duration.clone();

        let (status, response) = send(appointment_routes(state.clone()), request("POST", "/", Some(body))).await;
        assert_eq!(status, StatusCode::BAD_REQUEST, "{}", duration);
        assert_eq!(response["error"], json!("duration must be between 1 and 1440 minutes"));
    }

    send(
        appointment_routes(state.clone()),
        request("POST", "/", Some(booking(json!(1), "2099-01-05T10:00:00+05:30"))),
    )
    .await;
    let mut oversized_update = booking(json!(1), "2099-01-05T10:00:00+05:30");
    oversized_update["duration"] = json!(i64::MAX);
    let (status, _) = send(appointment_routes(state), request("PUT", "/1", Some(oversized_update))).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    assert_eq!(store.get_appointment(1).await.unwrap().unwrap().duration, 30);
}

#[tokio::test]
async fn test_get_and_list_appointments() {
    let (state, _) = test_state();
    send(
        appointment_routes(state.clone()),
        request("POST", "/", Some(booking(json!(2), "2099-01-05T11:00:00+05:30"))),
    )
    .await;

    let (status, body) = send(appointment_routes(state.clone()), request("GET", "/", None)).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body.as_array().unwrap().len(), 1);

    let (status, body) = send(appointment_routes(state.clone()), request("GET", "/1", None)).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["doctor_id"], json!(2));
    assert_eq!(body["date"], json!("2099-01-05T11:00:00+05:30"));

    for uri in ["/7", "/abc"] {
        let (status, body) = send(appointment_routes(state.clone()), request("GET", uri, None)).await;
        assert_eq!(status, StatusCode::NOT_FOUND, "{}", uri);
        assert_eq!(body["error"], json!("Appointment not found"));
    }
}

#[tokio::test]
async fn test_update_appointment() {
    let (state, store) = test_state();
    send(
        appointment_routes(state.clone()),
        request("POST", "/", Some(booking(json!(2), "2099-01-05T11:00:00+05:30"))),
    )
    .await;

    let (status, body) = send(
        appointment_routes(state.clone()),
        request("PUT", "/1", Some(booking(json!(2), "2099-01-05T13:00:00+05:30"))),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!({"message": "Appointment updated successfully"}));
    assert_eq!(
        store.get_appointment(1).await.unwrap().unwrap().date.to_rfc3339(),
        "2099-01-05T13:00:00+05:30"
    );

    let (status, body) = send(
        appointment_routes(state),
        request("PUT", "/5", Some(booking(json!(2), "2099-01-05T14:00:00+05:30"))),
    )
    .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["error"], json!("Appointment not found"));
}

#[tokio::test]
async fn test_cancel_always_succeeds() {
    let (state, store) = test_state();
    send(
        appointment_routes(state.clone()),
        request("POST", "/", Some(booking(json!(1), "2099-01-05T09:00:00+05:30"))),
    )
    .await;

    for uri in ["/1", "/1", "/404", "/not-an-id"] {
        let (status, body) = send(appointment_routes(state.clone()), request("DELETE", uri, None)).await;
        assert_eq!(status, StatusCode::OK, "{}", uri);
        assert_eq!(body, json!({"message": "Appointment canceled"}));
    }

    assert!(store.list_appointments().await.unwrap().is_empty());
}

#[tokio::test]
async fn test_cleanup_all() {
    let (state, store) = test_state();
    for date in ["2099-01-05T09:00:00+05:30", "2099-01-05T10:00:00+05:30"] {
        send(appointment_routes(state.clone()), request("POST", "/", Some(booking(json!(1), date)))).await;
    }

    let (status, body) = send(appointment_routes(state), request("DELETE", "/cleanup/all", None)).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!({"message": "All appointments cleaned up successfully"}));
    assert!(store.list_appointments().await.unwrap().is_empty());
}
