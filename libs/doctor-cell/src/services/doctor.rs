use std::sync::Arc;

use tracing::{debug, info};

use shared_database::{AppState, SchedulingStore};
use shared_models::{AvailabilityStatus, Doctor, NewDoctor, WorkingHours};

use crate::models::{CreateDoctorRequest, DoctorError, REQUIRED_DOCTOR_FIELDS};

pub struct DoctorService {
    store: Arc<dyn SchedulingStore>,
}

impl DoctorService {
    pub fn new(state: &AppState) -> Self {
        Self {
            store: state.store.clone(),
        }
    }

    pub async fn list_doctors(&self) -> Result<Vec<Doctor>, DoctorError> {
        debug!("Fetching all doctors");
        Ok(self.store.list_doctors().await?)
    }

    pub async fn get_doctor(&self, doctor_id: i64) -> Result<Doctor, DoctorError> {
        self.store
            .get_doctor(doctor_id)
            .await?
            .ok_or(DoctorError::NotFound)
    }

    /// Register a doctor. Status defaults to "Available Today".
    pub async fn create_doctor(&self, request: CreateDoctorRequest) -> Result<Doctor, DoctorError> {
        let new_doctor = validate_create_request(request)?;
        debug!("Registering doctor: {}", new_doctor.name);

        let doctor = self.store.insert_doctor(new_doctor).await?;
        info!("Doctor {} registered", doctor.id);

        Ok(doctor)
    }
}

fn required(field: Option<String>) -> Result<String, DoctorError> {
    field
        .map(|value| value.trim().to_string())
        .filter(|value| !value.is_empty())
        .ok_or_else(|| DoctorError::ValidationError(REQUIRED_DOCTOR_FIELDS.to_string()))
}

fn validate_create_request(request: CreateDoctorRequest) -> Result<NewDoctor, DoctorError> {
    let name = required(request.name)?;
    let specialization = required(request.specialization)?;
    let working_start = required(request.working_start)?;
    let working_end = required(request.working_end)?;

    let working_hours = WorkingHours::parse(&working_start, &working_end)
        .map_err(|e| DoctorError::ValidationError(e.to_string()))?;

    let availability_status = match request.availability_status.as_deref() {
        None | Some("") => AvailabilityStatus::default(),
        Some(raw) => raw
            .parse::<AvailabilityStatus>()
            .map_err(|e| DoctorError::ValidationError(e.to_string()))?,
    };

    Ok(NewDoctor {
        name,
        specialization,
        working_hours,
        profile_image: request.profile_image.filter(|image| !image.trim().is_empty()),
        availability_status,
    })
}
