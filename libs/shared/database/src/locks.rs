use std::collections::HashMap;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use tokio::sync::{Mutex as AsyncMutex, OwnedMutexGuard};

type LockMap = HashMap<i64, Arc<AsyncMutex<()>>>;

/// Per-doctor exclusive sections for check-then-write booking sequences.
///
/// Guards are process-local; they serialize requests handled by this server
/// only. An entry lives only while some request holds or waits for it.
#[derive(Debug, Clone, Default)]
pub struct DoctorLocks {
    locks: Arc<Mutex<LockMap>>,
}

/// Exclusive access to one doctor's calendar, released on drop.
#[derive(Debug)]
pub struct CalendarGuard {
    doctor_id: i64,
    locks: Arc<Mutex<LockMap>>,
    guard: Option<OwnedMutexGuard<()>>,
}

impl DoctorLocks {
    pub fn new() -> Self {
        Self::default()
    }

    /// Waits for exclusive access to `doctor_id`'s calendar.
    pub async fn acquire(&self, doctor_id: i64) -> CalendarGuard {
        let lock = lock_map(&self.locks).entry(doctor_id).or_default().clone();

        CalendarGuard {
            doctor_id,
            locks: self.locks.clone(),
            guard: Some(lock.lock_owned().await),
        }
    }

    /// Number of doctors with a held or awaited lock.
    pub fn tracked(&self) -> usize {
        lock_map(&self.locks).len()
    }
}

impl Drop for CalendarGuard {
    fn drop(&mut self) {
        drop(self.guard.take());

        // Clones of the entry are only made under the map lock, so a count of
        // one means nobody else holds or waits for this doctor.
        let mut locks = lock_map(&self.locks);
        if locks
            .get(&self.doctor_id)
            .is_some_and(|lock| Arc::strong_count(lock) == 1)
        {
            locks.remove(&self.doctor_id);
        }
    }
}

fn lock_map(locks: &Mutex<LockMap>) -> MutexGuard<'_, LockMap> {
    locks.lock().unwrap_or_else(PoisonError::into_inner)
}
