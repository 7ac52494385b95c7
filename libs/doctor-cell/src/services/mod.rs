pub mod availability;
pub mod doctor;
pub mod overlap;
pub mod time_grid;

pub use availability::AvailabilityService;
pub use doctor::DoctorService;
pub use overlap::{filter_available, intervals_overlap};
pub use time_grid::generate_slots;
