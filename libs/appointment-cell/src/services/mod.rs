pub mod booking;
pub mod conflict;
pub mod validator;

pub use booking::AppointmentBookingService;
pub use conflict::{find_start_collision, overlapping_appointments, starts_collide};
pub use validator::BookingValidator;
