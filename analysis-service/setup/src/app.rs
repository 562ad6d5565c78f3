use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use anyhow::Error;

use analysis_application::{
    AnalysisCommandRegistryFactory, AnalysisOrchestrator, AnalysisPorts, AnalysisSettings,
    AnalysisUseCase, GenericCommandService, ItemCatalogUseCase, ItemCatalogUseCaseImpl,
};
use analysis_configuration::{AppConfig, CatalogItemConfig, ServerConfig, StorageKind};
use analysis_domain::{AnalysisRepository, MediaHandle, MediaItem};
use analysis_http_server::{build_router, serve, AppState, FrameAssets};
use analysis_infra::{
    DelayedFileCleanup, InMemoryAnalysisRepository, InMemoryMediaCatalog,
    JsonFileAnalysisRepository,
};
use analysis_infra_ffmpeg::{FfmpegFrameCapture, FfprobeDuration, FrameCaptureConfig};
use analysis_infra_llm_rest::{ChatGeneratorConfig, OpenAiChatGenerator};

pub async fn build_and_run(config: AppConfig, server_config: ServerConfig) -> Result<(), Error> {
    let app = Application::new(config).await?;
    app.run(server_config).await
}

pub struct Application {
    pub config: AppConfig,
    pub state: AppState,
}

fn catalog_item(item: &CatalogItemConfig) -> MediaItem {
    MediaItem {
        id: item.id.clone(),
        title: item.title.clone(),
        transcript: item.transcript.clone(),
        media: MediaHandle::new(item.id.clone(), item.media_path.clone()),
    }
}

impl Application {
    pub async fn new(config: AppConfig) -> Result<Self, Error> {
        let service = &config.service;
        tracing::info!(
            model = %service.generation.model,
            api_key_configured = service.generation.api_key.is_some(),
            storage = ?service.storage.kind,
            capture_dir = %service.capture.output_dir.display(),
            catalog_items = service.catalog.items.len(),
            "initializing analysis application"
        );
        if service.generation.api_key.is_none() {
            tracing::warn!("no text generation API key configured; paragraph generation may fail");
        }

        let repository: Arc<dyn AnalysisRepository> = match service.storage.kind {
            StorageKind::Memory => Arc::new(InMemoryAnalysisRepository::new()),
            StorageKind::JsonDir => {
                Arc::new(JsonFileAnalysisRepository::new(service.storage.directory.clone()))
            }
        };
        let catalog = Arc::new(InMemoryMediaCatalog::with_items(
            service.catalog.items.iter().map(catalog_item),
        ));

        let generator = OpenAiChatGenerator::new(ChatGeneratorConfig {
            base_url: service.generation.base_url.clone(),
            api_key: service.generation.api_key.clone(),
            model: service.generation.model.clone(),
            temperature: service.generation.temperature,
            max_tokens: service.generation.max_tokens,
            request_timeout: Duration::from_millis(service.generation.request_timeout_ms),
        });
        let capture = FfmpegFrameCapture::new(FrameCaptureConfig {
            ffmpeg_path: PathBuf::from(&service.capture.ffmpeg_path),
            output_dir: service.capture.output_dir.clone(),
            public_path: service.capture.public_path.clone(),
            max_width: service.capture.max_width,
            jpeg_quality: service.capture.jpeg_quality,
        });
        let cleanup = DelayedFileCleanup::new(
            Duration::from_millis(service.cleanup.delay_ms),
            service.cleanup.enabled,
        );

        let ports = AnalysisPorts {
            catalog: catalog.clone(),
            repository: repository.clone(),
            generator: Arc::new(generator),
            capture: Arc::new(capture),
            durations: Arc::new(FfprobeDuration::new(&service.capture.ffprobe_path)),
            cleanup: Arc::new(cleanup),
        };
        let settings = AnalysisSettings {
            full_analysis_markers: service.defaults.full_analysis_markers,
            paragraph_markers: service.defaults.paragraph_markers,
            frame_count: service.defaults.frame_count,
            capture_concurrency: service.capture.concurrency,
        };

        let analysis: Arc<dyn AnalysisUseCase> = Arc::new(AnalysisOrchestrator::new(ports, settings));
        let items: Arc<dyn ItemCatalogUseCase> =
            Arc::new(ItemCatalogUseCaseImpl::new(catalog, repository));
        let registry = AnalysisCommandRegistryFactory::create_registry(analysis, items);
        tracing::debug!(commands = registry.len(), "command registry built");
        let command_service = Arc::new(GenericCommandService::new(Arc::new(registry)));
        let state = AppState::new(command_service);

        Ok(Self { config, state })
    }

    pub async fn run(self, server_config: ServerConfig) -> Result<(), Error> {
        tracing::info!(
            host = %server_config.host,
            port = server_config.port,
            "starting analysis HTTP routes"
        );

        let capture = &self.config.service.capture;
        let router = build_router(
            self.state,
            Some(FrameAssets {
                directory: capture.output_dir.clone(),
                public_path: capture.public_path.clone(),
            }),
        );

        serve(router, &server_config)
            .await
            .map_err(|err| anyhow::anyhow!("server startup failed: {err}"))
    }
}
