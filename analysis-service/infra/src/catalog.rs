use std::collections::HashMap;

use async_trait::async_trait;
use tokio::sync::RwLock;

use analysis_domain::{DomainError, MediaCatalogPort, MediaItem};

#[derive(Default)]
struct CatalogEntries {
    /// Bumped on every registration; orders listings newest first.
    next_sequence: u64,
    items: HashMap<String, (u64, MediaItem)>,
}

impl CatalogEntries {
    fn insert(&mut self, item: MediaItem) {
        let sequence = self.next_sequence;
        self.next_sequence += 1;
        self.items.insert(item.id.clone(), (sequence, item));
    }
}

#[derive(Default)]
pub struct InMemoryMediaCatalog {
    entries: RwLock<CatalogEntries>,
}

impl InMemoryMediaCatalog {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_items(items: impl IntoIterator<Item = MediaItem>) -> Self {
        let mut entries = CatalogEntries::default();
        for item in items {
            entries.insert(item);
        }
        Self {
            entries: RwLock::new(entries),
        }
    }
}

#[async_trait]
impl MediaCatalogPort for InMemoryMediaCatalog {
    async fn find(&self, item_id: &str) -> Result<Option<MediaItem>, DomainError> {
        Ok(self
            .entries
            .read()
            .await
            .items
            .get(item_id)
            .map(|(_, item)| item.clone()))
    }

    async fn register(&self, item: MediaItem) -> Result<(), DomainError> {
        self.entries.write().await.insert(item);
        Ok(())
    }

    async fn list(&self) -> Result<Vec<MediaItem>, DomainError> {
        let entries = self.entries.read().await;
        let mut ordered: Vec<&(u64, MediaItem)> = entries.items.values().collect();
        ordered.sort_by(|a, b| b.0.cmp(&a.0));
        Ok(ordered.into_iter().map(|(_, item)| item.clone()).collect())
    }

    async fn remove(&self, item_id: &str) -> Result<bool, DomainError> {
        Ok(self.entries.write().await.items.remove(item_id).is_some())
    }
}
