// libs/appointment-cell/src/services/booking.rs
use std::sync::Arc;

use chrono_tz::Tz;
use tracing::{debug, info, warn};

use shared_database::{AppState, DoctorLocks, SchedulingStore};
use shared_models::{Appointment, Doctor, NewAppointment};

use crate::models::{AppointmentError, AppointmentRequest};
use crate::services::conflict::overlapping_appointments;
use crate::services::validator::BookingValidator;

pub struct AppointmentBookingService {
    store: Arc<dyn SchedulingStore>,
    locks: DoctorLocks,
    timezone: Tz,
    validator: BookingValidator,
}

impl AppointmentBookingService {
    pub fn new(state: &AppState) -> Self {
        let timezone = state.config.clinic_timezone;
        Self {
            store: state.store.clone(),
            locks: state.locks.clone(),
            timezone,
            validator: BookingValidator::new(timezone),
        }
    }

    // ==============================================================================
    // BOOKING
    // ==============================================================================

    /// Validate then insert. Only known doctors are locked; the calendar stays
    /// locked from the conflict read until the insert completes.
    pub async fn book_appointment(&self, request: AppointmentRequest) -> Result<Appointment, AppointmentError> {
        let proposal = request.validate(&self.timezone)?;
        debug!("Booking appointment for doctor {} at {}", proposal.doctor_id, proposal.date);

        let doctor = self.load_doctor(proposal.doctor_id).await?;
        let _calendar = self.locks.acquire(doctor.id).await;

        self.check_proposal(&doctor, &proposal, None).await?;

        let appointment = self.store.insert_appointment(proposal).await?;
        info!("Appointment {} booked with doctor {}", appointment.id, appointment.doctor_id);

        Ok(appointment)
    }

    /// Full-field replace of an existing appointment, under the same rules as
    /// a new booking except that it never collides with itself.
    pub async fn update_appointment(
        &self,
        appointment_id: i64,
        request: AppointmentRequest,
    ) -> Result<Appointment, AppointmentError> {
        let proposal = request.validate(&self.timezone)?;
        debug!("Updating appointment {} to doctor {} at {}", appointment_id, proposal.doctor_id, proposal.date);

        let doctor = self.load_doctor(proposal.doctor_id).await?;
        let _calendar = self.locks.acquire(doctor.id).await;

        if self.store.get_appointment(appointment_id).await?.is_none() {
            return Err(AppointmentError::NotFound);
        }
        self.check_proposal(&doctor, &proposal, Some(appointment_id)).await?;

        let updated = self
            .store
            .replace_appointment(appointment_id, proposal)
            .await?
            .ok_or(AppointmentError::NotFound)?;
        info!("Appointment {} updated", appointment_id);

        Ok(updated)
    }

    /// Removes the appointment if it exists. Returns whether anything was
    /// removed; callers treat both outcomes as success.
    pub async fn cancel_appointment(&self, appointment_id: i64) -> Result<bool, AppointmentError> {
        let removed = self.store.delete_appointment(appointment_id).await?;
        if removed {
            info!("Appointment {} canceled", appointment_id);
        } else {
            debug!("Cancel for unknown appointment {} ignored", appointment_id);
        }
        Ok(removed)
    }

    // ==============================================================================
    // LISTINGS & MAINTENANCE
    // ==============================================================================

    pub async fn list_appointments(&self) -> Result<Vec<Appointment>, AppointmentError> {
        Ok(self.store.list_appointments().await?)
    }

    pub async fn get_appointment(&self, appointment_id: i64) -> Result<Appointment, AppointmentError> {
        self.store
            .get_appointment(appointment_id)
            .await?
            .ok_or(AppointmentError::NotFound)
    }

    pub async fn clear_appointments(&self) -> Result<usize, AppointmentError> {
        let removed = self.store.clear_appointments().await?;
        warn!("Removed all {} appointments", removed);
        Ok(removed)
    }

    // ==============================================================================
    // PRIVATE HELPER METHODS
    // ==============================================================================

    async fn load_doctor(&self, doctor_id: i64) -> Result<Doctor, AppointmentError> {
        self.store
            .get_doctor(doctor_id)
            .await?
            .ok_or(AppointmentError::DoctorNotFound)
    }

    async fn check_proposal(
        &self,
        doctor: &Doctor,
        proposal: &NewAppointment,
        excluding_id: Option<i64>,
    ) -> Result<(), AppointmentError> {
        let existing = self.store.list_appointments_for_doctor(doctor.id).await?;

        if let Err(reason) = self.validator.validate(doctor, proposal, &existing, excluding_id) {
            warn!("Rejected booking for doctor {} at {}: {}", doctor.id, proposal.date, reason);
            return Err(reason.into());
        }

        let overlapping = overlapping_appointments(proposal, &existing, excluding_id);
        if !overlapping.is_empty() {
            warn!(
                "Booking for doctor {} at {} overlaps {} existing appointment(s) without sharing a start",
                doctor.id,
                proposal.date,
                overlapping.len()
            );
        }

        Ok(())
    }
}
