pub mod locks;
pub mod memory;
pub mod state;
pub mod store;
pub mod supabase;

pub use locks::{CalendarGuard, DoctorLocks};
pub use memory::InMemoryStore;
pub use state::AppState;
pub use store::{SchedulingStore, StoreError, StoreResult};
pub use supabase::{SupabaseClient, SupabaseStore};
