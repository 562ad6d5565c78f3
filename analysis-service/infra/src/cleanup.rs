use std::collections::HashMap;
use std::io::ErrorKind;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex, MutexGuard};
use std::time::Duration;

use tokio_util::sync::CancellationToken;

use analysis_domain::{CleanupScheduler, CleanupTicket, MediaHandle};

type PendingMap = HashMap<String, (u64, CancellationToken)>;

/// Removes transient media files after a delay.
///
/// At most one removal is pending per location; scheduling again cancels the
/// earlier task. Removal failures are logged and otherwise ignored.
pub struct DelayedFileCleanup {
    delay: Duration,
    enabled: bool,
    next_id: AtomicU64,
    pending: Arc<Mutex<PendingMap>>,
}

impl DelayedFileCleanup {
    pub fn new(delay: Duration, enabled: bool) -> Self {
        Self {
            delay,
            enabled,
            next_id: AtomicU64::new(1),
            pending: Arc::new(Mutex::new(HashMap::new())),
        }
    }

    pub fn pending_count(&self) -> usize {
        lock(&self.pending).len()
    }
}

fn lock(pending: &Mutex<PendingMap>) -> MutexGuard<'_, PendingMap> {
    match pending.lock() {
        Ok(guard) => guard,
        Err(poisoned) => poisoned.into_inner(),
    }
}

async fn remove_media(location: &str) {
    match tokio::fs::remove_file(location).await {
        Ok(()) => tracing::info!(location, "transient media removed"),
        Err(err) if err.kind() == ErrorKind::NotFound => {
            tracing::debug!(location, "transient media already gone")
        }
        Err(err) => tracing::warn!(location, error = %err, "failed to remove transient media"),
    }
}

impl CleanupScheduler for DelayedFileCleanup {
    fn schedule(&self, media: &MediaHandle) -> CleanupTicket {
        let ticket = CleanupTicket {
            id: self.next_id.fetch_add(1, Ordering::Relaxed),
            location: media.location.clone(),
        };
        if !self.enabled {
            return ticket;
        }

        let Ok(runtime) = tokio::runtime::Handle::try_current() else {
            tracing::warn!(location = %ticket.location, "no runtime available, cleanup skipped");
            return ticket;
        };

        let token = CancellationToken::new();
        if let Some((_, previous)) = lock(&self.pending)
            .insert(ticket.location.clone(), (ticket.id, token.clone()))
        {
            previous.cancel();
        }

        let pending = self.pending.clone();
        let delay = self.delay;
        let (id, location) = (ticket.id, ticket.location.clone());
        runtime.spawn(async move {
            tokio::select! {
                _ = token.cancelled() => {
                    tracing::debug!(location = %location, ticket = id, "cleanup cancelled");
                    return;
                }
                _ = tokio::time::sleep(delay) => {}
            }

            remove_media(&location).await;
            let mut pending = lock(&pending);
            if pending.get(&location).is_some_and(|(current, _)| *current == id) {
                pending.remove(&location);
            }
        });

        tracing::debug!(
            location = %ticket.location,
            ticket = ticket.id,
            delay_ms = self.delay.as_millis() as u64,
            "cleanup scheduled"
        );
        ticket
    }

    fn cancel(&self, ticket: &CleanupTicket) -> bool {
        let mut pending = lock(&self.pending);
        match pending.get(&ticket.location) {
            Some((id, token)) if *id == ticket.id => {
                token.cancel();
                pending.remove(&ticket.location);
                true
            }
            _ => false,
        }
    }
}
