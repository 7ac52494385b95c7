use async_trait::async_trait;
use tokio::sync::RwLock;
use tracing::debug;

use shared_models::{
    Appointment, AvailabilityStatus, Doctor, NewAppointment, NewDoctor, WorkingHours,
};

use crate::store::{SchedulingStore, StoreResult};

// (name, specialization, start, end, image, status)
const SEED_DOCTORS: [(&str, &str, &str, &str, &str, AvailabilityStatus); 5] = [
    ("Dr. Alice Smith", "Cardiology", "08:00", "16:00", "https://i.pravatar.cc/150?img=1", AvailabilityStatus::AvailableToday),
    ("Dr. Bob Johnson", "Neurology", "10:00", "18:00", "https://i.pravatar.cc/150?img=2", AvailabilityStatus::AvailableToday),
    ("Dr. Charlie Brown", "Pediatrics", "09:00", "17:00", "https://i.pravatar.cc/150?img=3", AvailabilityStatus::FullyBooked),
    ("Dr. Sarah Wilson", "Dermatology", "08:30", "16:30", "https://i.pravatar.cc/150?img=4", AvailabilityStatus::OnLeave),
    ("Dr. Michael Chen", "Orthopedics", "09:30", "17:30", "https://i.pravatar.cc/150?img=5", AvailabilityStatus::AvailableToday),
];

#[derive(Debug, Default)]
struct MemoryState {
    doctors: Vec<Doctor>,
    appointments: Vec<Appointment>,
    next_appointment_id: i64,
}

/// Process-local store used when no remote database is configured.
#[derive(Debug)]
pub struct InMemoryStore {
    state: RwLock<MemoryState>,
}

impl Default for InMemoryStore {
    fn default() -> Self {
        Self::new()
    }
}

impl InMemoryStore {
    pub fn new() -> Self {
        Self::with_doctors(Vec::new())
    }

    pub fn with_doctors(doctors: Vec<Doctor>) -> Self {
        Self {
            state: RwLock::new(MemoryState {
                doctors,
                appointments: Vec::new(),
                next_appointment_id: 1,
            }),
        }
    }

    /// Store pre-populated with the clinic's default roster.
    pub fn seeded() -> Self {
        let doctors = SEED_DOCTORS
            .iter()
            .zip(1..)
            .filter_map(|((name, specialization, start, end, image, status), id)| {
                let working_hours = WorkingHours::parse(start, end).ok()?;
                Some(Doctor {
                    id,
                    name: name.to_string(),
                    specialization: specialization.to_string(),
                    working_hours,
                    profile_image: Some(image.to_string()),
                    availability_status: *status,
                })
            })
            .collect();

        Self::with_doctors(doctors)
    }
}

#[async_trait]
impl SchedulingStore for InMemoryStore {
    async fn list_doctors(&self) -> StoreResult<Vec<Doctor>> {
        Ok(self.state.read().await.doctors.clone())
    }

    async fn get_doctor(&self, doctor_id: i64) -> StoreResult<Option<Doctor>> {
        let state = self.state.read().await;
        Ok(state.doctors.iter().find(|d| d.id == doctor_id).cloned())
    }

    async fn insert_doctor(&self, doctor: NewDoctor) -> StoreResult<Doctor> {
        let mut state = self.state.write().await;
        let id = state.doctors.iter().map(|d| d.id).max().unwrap_or(0) + 1;
        let doctor = doctor.into_doctor(id);
        state.doctors.push(doctor.clone());
        debug!("Stored doctor {}", id);
        Ok(doctor)
    }

    async fn list_appointments(&self) -> StoreResult<Vec<Appointment>> {
        Ok(self.state.read().await.appointments.clone())
    }

    async fn get_appointment(&self, appointment_id: i64) -> StoreResult<Option<Appointment>> {
        let state = self.state.read().await;
        Ok(state.appointments.iter().find(|a| a.id == appointment_id).cloned())
    }

    async fn list_appointments_for_doctor(&self, doctor_id: i64) -> StoreResult<Vec<Appointment>> {
        let state = self.state.read().await;
        let mut appointments: Vec<Appointment> = state
            .appointments
            .iter()
            .filter(|a| a.doctor_id == doctor_id)
            .cloned()
            .collect();
        appointments.sort_by_key(|a| a.date);
        Ok(appointments)
    }

    async fn insert_appointment(&self, appointment: NewAppointment) -> StoreResult<Appointment> {
        let mut state = self.state.write().await;
        let id = state.next_appointment_id;
        state.next_appointment_id += 1;

        let appointment = appointment.into_appointment(id);
        state.appointments.push(appointment.clone());
        debug!("Stored appointment {} for doctor {}", id, appointment.doctor_id);
        Ok(appointment)
    }

    async fn replace_appointment(
        &self,
        appointment_id: i64,
        appointment: NewAppointment,
    ) -> StoreResult<Option<Appointment>> {
        let mut state = self.state.write().await;
        let Some(slot) = state.appointments.iter_mut().find(|a| a.id == appointment_id) else {
            return Ok(None);
        };

        *slot = appointment.into_appointment(appointment_id);
        Ok(Some(slot.clone()))
    }

    async fn delete_appointment(&self, appointment_id: i64) -> StoreResult<bool> {
        let mut state = self.state.write().await;
        let before = state.appointments.len();
        state.appointments.retain(|a| a.id != appointment_id);
        Ok(state.appointments.len() < before)
    }

    async fn clear_appointments(&self) -> StoreResult<usize> {
        let mut state = self.state.write().await;
        let removed = state.appointments.len();
        state.appointments.clear();
        state.next_appointment_id = 1;
        Ok(removed)
    }
}
