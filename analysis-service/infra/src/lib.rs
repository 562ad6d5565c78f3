pub mod catalog;
pub mod cleanup;
pub mod repository;

pub use catalog::InMemoryMediaCatalog;
pub use cleanup::DelayedFileCleanup;
pub use repository::{InMemoryAnalysisRepository, JsonFileAnalysisRepository};
