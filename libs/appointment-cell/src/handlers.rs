// libs/appointment-cell/src/handlers.rs
use std::sync::Arc;

use axum::{
    extract::{Path, State},
    Json,
};
use serde_json::{json, Value};

use shared_database::AppState;
use shared_models::error::AppError;

use crate::models::{AppointmentError, AppointmentRequest};
use crate::services::booking::AppointmentBookingService;

fn parse_appointment_id(raw: &str) -> Option<i64> {
    raw.trim().parse::<i64>().ok()
}

#[axum::debug_handler]
pub async fn list_appointments(
    State(state): State<Arc<AppState>>,
) -> Result<Json<Value>, AppError> {
    let booking_service = AppointmentBookingService::new(&state);

    let appointments = booking_service.list_appointments().await?;

    Ok(Json(json!(appointments)))
}

#[axum::debug_handler]
pub async fn book_appointment(
    State(state): State<Arc<AppState>>,
    Json(request): Json<AppointmentRequest>,
) -> Result<Json<Value>, AppError> {
    let booking_service = AppointmentBookingService::new(&state);

    let appointment = booking_service.book_appointment(request).await?;

    Ok(Json(json!({
        "id": appointment.id,
        "message": "Appointment booked successfully"
    })))
}

#[axum::debug_handler]
pub async fn get_appointment(
    State(state): State<Arc<AppState>>,
    Path(appointment_id): Path<String>,
) -> Result<Json<Value>, AppError> {
    let appointment_id = parse_appointment_id(&appointment_id).ok_or(AppointmentError::NotFound)?;
    let booking_service = AppointmentBookingService::new(&state);

    let appointment = booking_service.get_appointment(appointment_id).await?;

    Ok(Json(json!(appointment)))
}

#[axum::debug_handler]
pub async fn update_appointment(
    State(state): State<Arc<AppState>>,
    Path(appointment_id): Path<String>,
    Json(request): Json<AppointmentRequest>,
) -> Result<Json<Value>, AppError> {
    let appointment_id = parse_appointment_id(&appointment_id).ok_or(AppointmentError::NotFound)?;
    let booking_service = AppointmentBookingService::new(&state);

    booking_service.update_appointment(appointment_id, request).await?;

    Ok(Json(json!({
        "message": "Appointment updated successfully"
    })))
}

/// Always succeeds for ids that do not exist.
#[axum::debug_handler]
pub async fn cancel_appointment(
    State(state): State<Arc<AppState>>,
    Path(appointment_id): Path<String>,
) -> Result<Json<Value>, AppError> {
    if let Some(appointment_id) = parse_appointment_id(&appointment_id) {
        let booking_service = AppointmentBookingService::new(&state);
        booking_service.cancel_appointment(appointment_id).await?;
    }

    Ok(Json(json!({
        "message": "Appointment canceled"
    })))
}

#[axum::debug_handler]
pub async fn clear_appointments(
    State(state): State<Arc<AppState>>,
) -> Result<Json<Value>, AppError> {
    let booking_service = AppointmentBookingService::new(&state);

    booking_service.clear_appointments().await?;

    Ok(Json(json!({
        "message": "All appointments cleaned up successfully"
    })))
}
