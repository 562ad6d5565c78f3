use analysis_domain::DomainError;
use thiserror::Error;

use crate::CommandError;

#[derive(Debug, Error)]
pub enum ApplicationError {
    #[error("Domain error: {0}")]
    Domain(#[from] DomainError),

    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Internal error: {0}")]
    Internal(String),
}

impl From<ApplicationError> for CommandError {
    fn from(error: ApplicationError) -> Self {
        match error {
            ApplicationError::Domain(DomainError::Validation(message))
            | ApplicationError::Validation(message) => {
                CommandError::validation("validation_error", message)
            }
            ApplicationError::Domain(err @ DomainError::NotFound { .. }) => {
                CommandError::not_found("not_found", err.to_string())
            }
            ApplicationError::Domain(err @ DomainError::Upstream { .. }) => {
                CommandError::upstream("upstream_failure", err.to_string())
            }
            ApplicationError::Domain(err @ DomainError::Internal(_)) => {
                CommandError::infrastructure("domain_error", err.to_string())
            }
            ApplicationError::Internal(message) => {
                CommandError::infrastructure("internal_error", message)
            }
        }
    }
}
