pub mod appointment;
pub mod doctor;
pub mod error;

pub use appointment::{Appointment, BookedInterval, NewAppointment, MAX_DURATION_MINUTES};
pub use doctor::{AvailabilityStatus, Doctor, ModelError, NewDoctor, WorkingHours};
pub use error::AppError;
