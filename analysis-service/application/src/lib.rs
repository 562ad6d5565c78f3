pub mod command;
pub mod dto;
pub mod error;
pub mod usecase;

pub use command::*;
pub use dto::*;
pub use error::*;
pub use usecase::{
    capture_frames, AnalysisOrchestrator, AnalysisPorts, AnalysisSettings, AnalysisUseCase,
    ItemCatalogUseCase, ItemCatalogUseCaseImpl,
};
