pub mod entity;
pub mod error;
pub mod port;
pub mod service;
pub mod state;

pub use entity::*;
pub use error::DomainError;
pub use port::*;
pub use service::*;
pub use state::AnalysisState;
