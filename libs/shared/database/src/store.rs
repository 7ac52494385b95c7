use async_trait::async_trait;
use thiserror::Error;

use shared_models::{Appointment, Doctor, NewAppointment, NewDoctor};

#[derive(Error, Debug)]
pub enum StoreError {
    #[error("Storage backend error: {0}")]
    Backend(String),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

impl From<anyhow::Error> for StoreError {
    fn from(err: anyhow::Error) -> Self {
        StoreError::Backend(err.to_string())
    }
}

pub type StoreResult<T> = Result<T, StoreError>;

/// Doctor and appointment persistence consumed by the scheduling services.
///
/// Implementations own both record kinds; callers never hold references into
/// the store, only the values it hands back.
#[async_trait]
pub trait SchedulingStore: Send + Sync {
    async fn list_doctors(&self) -> StoreResult<Vec<Doctor>>;

    async fn get_doctor(&self, doctor_id: i64) -> StoreResult<Option<Doctor>>;

    async fn insert_doctor(&self, doctor: NewDoctor) -> StoreResult<Doctor>;

    async fn list_appointments(&self) -> StoreResult<Vec<Appointment>>;

    async fn get_appointment(&self, appointment_id: i64) -> StoreResult<Option<Appointment>>;

    /// Appointments of one doctor, earliest start first.
    async fn list_appointments_for_doctor(&self, doctor_id: i64) -> StoreResult<Vec<Appointment>>;

    async fn insert_appointment(&self, appointment: NewAppointment) -> StoreResult<Appointment>;

    /// Replaces every field but the id. `None` when the id does not resolve.
    async fn replace_appointment(
        &self,
        appointment_id: i64,
        appointment: NewAppointment,
    ) -> StoreResult<Option<Appointment>>;

    /// Returns whether a record was removed.
    async fn delete_appointment(&self, appointment_id: i64) -> StoreResult<bool>;

    /// Removes every appointment and returns how many were dropped.
    async fn clear_appointments(&self) -> StoreResult<usize>;
}
