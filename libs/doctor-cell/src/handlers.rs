use std::sync::Arc;

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Json,
};
use serde_json::{json, Value};

use shared_database::AppState;
use shared_models::error::AppError;

use crate::models::{CreateDoctorRequest, DoctorError, SlotAvailabilityResponse, SlotQuery};
use crate::services::{availability::AvailabilityService, doctor::DoctorService};

/// Ids that do not parse cannot resolve to a doctor.
fn parse_doctor_id(raw: &str) -> Result<i64, AppError> {
    raw.trim()
        .parse::<i64>()
        .map_err(|_| DoctorError::NotFound.into())
}

#[axum::debug_handler]
pub async fn list_doctors(
    State(state): State<Arc<AppState>>,
) -> Result<Json<Value>, AppError> {
    let doctor_service = DoctorService::new(&state);

    let doctors = doctor_service.list_doctors().await?;

    Ok(Json(json!(doctors)))
}

#[axum::debug_handler]
pub async fn create_doctor(
    State(state): State<Arc<AppState>>,
    Json(request): Json<CreateDoctorRequest>,
) -> Result<(StatusCode, Json<Value>), AppError> {
    let doctor_service = DoctorService::new(&state);

    let doctor = doctor_service.create_doctor(request).await?;

    Ok((
        StatusCode::CREATED,
        Json(json!({
            "id": doctor.id,
            "message": "Doctor added successfully"
        })),
    ))
}

#[axum::debug_handler]
pub async fn get_doctor(
    State(state): State<Arc<AppState>>,
    Path(doctor_id): Path<String>,
) -> Result<Json<Value>, AppError> {
    let doctor_id = parse_doctor_id(&doctor_id)?;
    let doctor_service = DoctorService::new(&state);

    let doctor = doctor_service.get_doctor(doctor_id).await?;

    Ok(Json(json!(doctor)))
}

#[axum::debug_handler]
pub async fn get_available_slots(
    State(state): State<Arc<AppState>>,
    Path(doctor_id): Path<String>,
    Query(query): Query<SlotQuery>,
) -> Result<Json<SlotAvailabilityResponse>, AppError> {
    // The date check comes before the doctor lookup.
    if query.date.as_deref().map_or(true, |d| d.trim().is_empty()) {
        return Err(DoctorError::MissingDate.into());
    }

    let doctor_id = parse_doctor_id(&doctor_id)?;
    let availability_service = AvailabilityService::new(&state);
    let now = state.config.now();

    let availability = availability_service
        .get_available_slots(doctor_id, &query, &now)
        .await?;

    Ok(Json(availability.into()))
}
