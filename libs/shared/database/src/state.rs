use std::sync::Arc;

use tracing::info;

use shared_config::AppConfig;

use crate::locks::DoctorLocks;
use crate::memory::InMemoryStore;
use crate::store::SchedulingStore;
use crate::supabase::SupabaseStore;

/// Shared handler state: configuration, the injected store and the booking
/// locks.
#[derive(Clone)]
pub struct AppState {
    pub config: Arc<AppConfig>,
    pub store: Arc<dyn SchedulingStore>,
    pub locks: DoctorLocks,
}

impl AppState {
    pub fn new(config: AppConfig, store: Arc<dyn SchedulingStore>) -> Self {
        Self {
            config: Arc::new(config),
            store,
            locks: DoctorLocks::new(),
        }
    }

    /// Picks the PostgREST store when credentials are configured and the
    /// seeded in-memory store otherwise.
    pub fn from_config(config: AppConfig) -> Self {
        let store: Arc<dyn SchedulingStore> = if config.is_configured() {
            info!("Using remote table store at {}", config.supabase_url);
            Arc::new(SupabaseStore::new(&config))
        } else {
            info!("Using seeded in-memory store");
            Arc::new(InMemoryStore::seeded())
        };

        Self::new(config, store)
    }
}
