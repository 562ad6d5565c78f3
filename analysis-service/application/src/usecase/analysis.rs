use std::sync::Arc;

use async_trait::async_trait;

use analysis_domain::{
    build_frame_requests, extract_references, normalize_markers, sample_points, AnalysisRepository,
    AnalysisResult, CleanupScheduler, DomainError, Frame, FrameCapturePort, GenerationRequest,
    MediaCatalogPort, MediaDurationPort, MediaItem, NormalizedParagraph, Reference,
    TextGenerationPort,
};

use crate::usecase::{capture_frames, ItemLocks};
use crate::{
    AnalysisResponse, ApplicationError, ExtractFramesRequest, FullAnalysisRequest,
    GenerateParagraphRequest, InvalidateAnalysisRequest, InvalidateAnalysisResponse,
    LookupReferenceRequest, ReferenceResponse,
};

#[async_trait]
pub trait AnalysisUseCase: Send + Sync {
    async fn full_analysis(
        &self,
        request: FullAnalysisRequest,
    ) -> Result<AnalysisResponse, ApplicationError>;

    async fn generate_paragraph(
        &self,
        request: GenerateParagraphRequest,
    ) -> Result<AnalysisResponse, ApplicationError>;

    async fn extract_frames(
        &self,
        request: ExtractFramesRequest,
    ) -> Result<AnalysisResponse, ApplicationError>;

    async fn lookup_reference(
        &self,
        request: LookupReferenceRequest,
    ) -> Result<ReferenceResponse, ApplicationError>;

    async fn invalidate(
        &self,
        request: InvalidateAnalysisRequest,
    ) -> Result<InvalidateAnalysisResponse, ApplicationError>;
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AnalysisSettings {
    pub full_analysis_markers: u32,
    pub paragraph_markers: u32,
    pub frame_count: u32,
    pub capture_concurrency: usize,
}

impl Default for AnalysisSettings {
    fn default() -> Self {
        Self {
            full_analysis_markers: 8,
            paragraph_markers: 5,
            frame_count: 10,
            capture_concurrency: 4,
        }
    }
}

/// Collaborators the orchestrator drives.
#[derive(Clone)]
pub struct AnalysisPorts {
    pub catalog: Arc<dyn MediaCatalogPort>,
    pub repository: Arc<dyn AnalysisRepository>,
    pub generator: Arc<dyn TextGenerationPort>,
    pub capture: Arc<dyn FrameCapturePort>,
    pub durations: Arc<dyn MediaDurationPort>,
    pub cleanup: Arc<dyn CleanupScheduler>,
}

/// Drives an item from transcript to linked references and frames, persisting
/// after every completed step so retries resume where the last call stopped.
pub struct AnalysisOrchestrator {
    ports: AnalysisPorts,
    settings: AnalysisSettings,
    locks: ItemLocks,
}

impl AnalysisOrchestrator {
    pub fn new(ports: AnalysisPorts, settings: AnalysisSettings) -> Self {
        Self {
            ports,
            settings,
            locks: ItemLocks::default(),
        }
    }

    async fn find_item(&self, item_id: &str) -> Result<MediaItem, ApplicationError> {
        self.ports
            .catalog
            .find(item_id)
            .await?
            .ok_or_else(|| DomainError::not_found("media item", item_id).into())
    }

    async fn produce_paragraph(
        &self,
        item: &MediaItem,
        transcript: &str,
        target_marker_count: u32,
    ) -> Result<(NormalizedParagraph, Vec<Reference>), ApplicationError> {
        let raw = self
            .ports
            .generator
            .generate(GenerationRequest {
                transcript: transcript.to_string(),
                title: item.title.clone(),
                target_marker_count,
            })
            .await?;

        if raw.trim().is_empty() {
            return Err(DomainError::external_service_error(
                "text-generation",
                "generator returned no text",
            )
            .into());
        }

        let paragraph = normalize_markers(&raw, target_marker_count);
        let references = extract_references(&paragraph);

        tracing::debug!(
            item_id = %item.id,
            target_marker_count,
            reference_count = references.len(),
            "paragraph normalized"
        );

        Ok((paragraph, references))
    }

    async fn produce_frames(
        &self,
        item: &MediaItem,
        count: u32,
    ) -> Result<Vec<Frame>, ApplicationError> {
        let duration = self.ports.durations.duration(&item.media).await?;
        if !duration.is_finite() || duration <= 0.0 {
            return Err(DomainError::external_service_error(
                "media-duration",
                format!("unusable duration {duration}"),
            )
            .into());
        }

        let requests = build_frame_requests(&sample_points(duration, count)?);
        let frames = capture_frames(
            self.ports.capture.as_ref(),
            &item.media,
            requests,
            self.settings.capture_concurrency,
        )
        .await?;

        let ticket = self.ports.cleanup.schedule(&item.media);
        tracing::debug!(
            item_id = %item.id,
            frame_count = frames.len(),
            duration_seconds = duration,
            cleanup_ticket = ticket.id,
            "frames captured"
        );

        Ok(frames)
    }

    async fn stored_or_empty(&self, item: &MediaItem) -> Result<AnalysisResult, ApplicationError> {
        let stored = self.ports.repository.load(&item.id).await?;
        Ok(resume(stored, item))
    }
}

fn resume(stored: Option<AnalysisResult>, item: &MediaItem) -> AnalysisResult {
    match stored {
        Some(mut result) => {
            result.has_transcript |= item.has_transcript();
            result
        }
        None => AnalysisResult::empty(item.id.clone(), item.has_transcript()),
    }
}

fn require_count(count: u32, what: &str) -> Result<(), ApplicationError> {
    if count == 0 {
        return Err(ApplicationError::Validation(format!("{what} must be at least 1")));
    }
    Ok(())
}

#[async_trait]
impl AnalysisUseCase for AnalysisOrchestrator {
    async fn full_analysis(
        &self,
        request: FullAnalysisRequest,
    ) -> Result<AnalysisResponse, ApplicationError> {
        let target = request
            .target_marker_count
            .unwrap_or(self.settings.full_analysis_markers);
        require_count(target, "target_marker_count")?;

        let item_id = request.item_id;
        let _guard = self.locks.acquire(&item_id).await;

        let stored = self.ports.repository.load(&item_id).await?;
        if let Some(settled) = stored.as_ref().filter(|result| result.is_settled()) {
            tracing::debug!(item_id = %item_id, state = ?settled.state(), "returning settled analysis");
            return Ok(settled.clone().into());
        }

        let item = self.find_item(&item_id).await?;
        let mut result = resume(stored, &item);

        tracing::info!(
            item_id = %item_id,
            target_marker_count = target,
            state = ?result.state(),
            "running full analysis"
        );

        if result.needs_paragraph() {
            if let Some(transcript) = item.transcript_text() {
                let (paragraph, references) =
                    self.produce_paragraph(&item, transcript, target).await?;
                result = result.with_paragraph(paragraph, references);
                self.ports.repository.save(&result).await?;
            }
        }

        if result.needs_frames() {
            let frames = self.produce_frames(&item, target).await?;
            result = result.with_frames(frames);
            self.ports.repository.save(&result).await?;
        }

        tracing::info!(item_id = %item_id, state = ?result.state(), "full analysis finished");
        Ok(result.into())
    }

    async fn generate_paragraph(
        &self,
        request: GenerateParagraphRequest,
    ) -> Result<AnalysisResponse, ApplicationError> {
        let target = request
            .target_marker_count
            .unwrap_or(self.settings.paragraph_markers);
        require_count(target, "target_marker_count")?;

        let _guard = self.locks.acquire(&request.item_id).await;
        let item = self.find_item(&request.item_id).await?;
        let transcript = item
            .transcript_text()
            .ok_or_else(|| ApplicationError::Validation("no transcript available".to_string()))?;

        let (paragraph, references) = self.produce_paragraph(&item, transcript, target).await?;
        let result = self
            .stored_or_empty(&item)
            .await?
            .with_paragraph(paragraph, references);
        self.ports.repository.save(&result).await?;

        tracing::info!(
            item_id = %item.id,
            target_marker_count = target,
            reference_count = result.references.len(),
            "paragraph regenerated"
        );
        Ok(result.into())
    }

    async fn extract_frames(
        &self,
        request: ExtractFramesRequest,
    ) -> Result<AnalysisResponse, ApplicationError> {
        let count = request.count.unwrap_or(self.settings.frame_count);
        require_count(count, "count")?;

        let _guard = self.locks.acquire(&request.item_id).await;
        let stored = self.ports.repository.load(&request.item_id).await?;
        if let Some(ready) = stored.as_ref().filter(|result| result.frames_ready()) {
            return Ok(ready.clone().into());
        }

        let item = self.find_item(&request.item_id).await?;
        let frames = self.produce_frames(&item, count).await?;
        let result = resume(stored, &item).with_frames(frames);
        self.ports.repository.save(&result).await?;

        tracing::info!(item_id = %item.id, frame_count = result.frames.len(), "frames extracted");
        Ok(result.into())
    }

    async fn lookup_reference(
        &self,
        request: LookupReferenceRequest,
    ) -> Result<ReferenceResponse, ApplicationError> {
        let result = self
            .ports
            .repository
            .load(&request.item_id)
            .await?
            .ok_or_else(|| DomainError::not_found("analysis", request.item_id.clone()))?;

        let record = result
            .record(request.number)
            .cloned()
            .ok_or_else(|| {
                DomainError::not_found("reference", format!("{}#{}", request.item_id, request.number))
            })?;
        let frame = result
            .frames
            .iter()
            .find(|frame| frame.index == request.number)
            .cloned();

        Ok(ReferenceResponse {
            item_id: result.item_id,
            record,
            frame,
        })
    }

    async fn invalidate(
        &self,
        request: InvalidateAnalysisRequest,
    ) -> Result<InvalidateAnalysisResponse, ApplicationError> {
        let _guard = self.locks.acquire(&request.item_id).await;
        let removed = self.ports.repository.delete(&request.item_id).await?;
        tracing::info!(item_id = %request.item_id, removed, "analysis invalidated");

        Ok(InvalidateAnalysisResponse {
            item_id: request.item_id,
            removed,
        })
    }
}
