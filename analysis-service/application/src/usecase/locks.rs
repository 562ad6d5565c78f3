use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use tokio::sync::{Mutex as AsyncMutex, OwnedMutexGuard};

/// Serializes pipeline work per item id while letting distinct items run
/// concurrently.
#[derive(Default)]
pub(crate) struct ItemLocks {
    entries: Mutex<HashMap<String, Arc<AsyncMutex<()>>>>,
}

impl ItemLocks {
    pub(crate) async fn acquire(&self, item_id: &str) -> OwnedMutexGuard<()> {
        let lock = {
            let mut entries = match self.entries.lock() {
                Ok(entries) => entries,
                Err(poisoned) => poisoned.into_inner(),
            };
            // Entries only referenced by the map have no holder or waiter.
            entries.retain(|_, lock| Arc::strong_count(lock) > 1);
            entries
                .entry(item_id.to_string())
                .or_insert_with(|| Arc::new(AsyncMutex::new(())))
                .clone()
        };
        lock.lock_owned().await
    }

    #[cfg(test)]
    fn tracked(&self) -> usize {
        self.entries.lock().map(|entries| entries.len()).unwrap_or(0)
    }
}
