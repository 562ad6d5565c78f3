mod analysis;
mod frames;
mod items;
mod locks;

pub use analysis::{AnalysisOrchestrator, AnalysisPorts, AnalysisSettings, AnalysisUseCase};
pub use frames::capture_frames;
pub use items::{ItemCatalogUseCase, ItemCatalogUseCaseImpl};
pub(crate) use locks::ItemLocks;
