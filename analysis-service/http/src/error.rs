use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;

use analysis_application::CommandError;

#[derive(Debug)]
pub enum HttpError {
    Validation { message: String },
    NotFound { message: String },
    Upstream { message: String },
    Internal { message: String },
}

impl IntoResponse for HttpError {
    fn into_response(self) -> Response {
        let (status, message) = match self {
            HttpError::Validation { message } => (StatusCode::UNPROCESSABLE_ENTITY, message),
            HttpError::NotFound { message } => (StatusCode::NOT_FOUND, message),
            HttpError::Upstream { message } => (StatusCode::BAD_GATEWAY, message),
            HttpError::Internal { message } => (StatusCode::INTERNAL_SERVER_ERROR, message),
        };

        (
            status,
            Json(json!({
                "error": message,
            })),
        )
            .into_response()
    }
}

pub fn error_mapper(error: CommandError) -> HttpError {
    let message = error.message().to_string();
    match error {
        CommandError::Validation { .. } => HttpError::Validation { message },
        CommandError::NotFound { .. } => HttpError::NotFound { message },
        CommandError::Upstream { .. } => HttpError::Upstream { message },
        CommandError::Infrastructure { .. } => HttpError::Internal { message },
    }
}
