use async_trait::async_trait;

use crate::{AnalysisResult, DomainError, GenerationRequest, MediaHandle, MediaItem};

/// Produces unstructured paragraph text; markers in the output are not trusted.
#[async_trait]
pub trait TextGenerationPort: Send + Sync {
    async fn generate(&self, request: GenerationRequest) -> Result<String, DomainError>;
}

/// Captures one frame and returns an opaque locator for it.
#[async_trait]
pub trait FrameCapturePort: Send + Sync {
    async fn capture(
        &self,
        media: &MediaHandle,
        offset_seconds: f64,
        output_name: &str,
    ) -> Result<String, DomainError>;
}

#[async_trait]
pub trait MediaDurationPort: Send + Sync {
    async fn duration(&self, media: &MediaHandle) -> Result<f64, DomainError>;
}

#[async_trait]
pub trait AnalysisRepository: Send + Sync {
    async fn load(&self, item_id: &str) -> Result<Option<AnalysisResult>, DomainError>;
    async fn save(&self, result: &AnalysisResult) -> Result<(), DomainError>;
    async fn delete(&self, item_id: &str) -> Result<bool, DomainError>;
}

#[async_trait]
pub trait MediaCatalogPort: Send + Sync {
    async fn find(&self, item_id: &str) -> Result<Option<MediaItem>, DomainError>;
    async fn register(&self, item: MediaItem) -> Result<(), DomainError>;
    /// Every item, most recently registered first.
    async fn list(&self) -> Result<Vec<MediaItem>, DomainError>;
    async fn remove(&self, item_id: &str) -> Result<bool, DomainError>;
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CleanupTicket {
    pub id: u64,
    pub location: String,
}

/// Deferred, best-effort removal of transient media.
///
/// Scheduling never blocks and never fails; failures during removal are the
/// scheduler's to log.
pub trait CleanupScheduler: Send + Sync {
    fn schedule(&self, media: &MediaHandle) -> CleanupTicket;
    fn cancel(&self, ticket: &CleanupTicket) -> bool;
}
