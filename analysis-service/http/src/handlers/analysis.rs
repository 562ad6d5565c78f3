use axum::{
    body::Bytes,
    extract::{Path, State},
    http::StatusCode,
    response::Json,
};
use serde::{de::DeserializeOwned, Deserialize};

use analysis_application::{
    AnalysisResponse, CommandContext, ExtractFramesCommand, ExtractFramesRequest,
    FullAnalysisCommand, FullAnalysisRequest, GenerateParagraphCommand, GenerateParagraphRequest,
    InvalidateAnalysisCommand, InvalidateAnalysisRequest, InvalidateAnalysisResponse,
    LookupReferenceCommand, LookupReferenceRequest, ReferenceResponse,
};

use crate::error::{error_mapper, HttpError};
use crate::AppState;

#[derive(Debug, Default, Deserialize)]
pub struct MarkerCountBody {
    pub target_marker_count: Option<u32>,
}

#[derive(Debug, Default, Deserialize)]
pub struct ExtractFramesBody {
    pub count: Option<u32>,
}

/// Bodies are optional on analysis routes; an empty body means defaults.
fn optional_body<T: DeserializeOwned + Default>(body: &Bytes) -> Result<T, HttpError> {
    if body.iter().all(u8::is_ascii_whitespace) {
        return Ok(T::default());
    }
    serde_json::from_slice(body).map_err(|err| HttpError::Validation {
        message: format!("invalid request body: {err}"),
    })
}

fn log_analysis(operation: &'static str, item_id: &str, result: &AnalysisResponse) {
    tracing::info!(
        operation,
        item_id,
        state = ?result.state,
        reference_count = result.references.len(),
        frame_count = result.frames.len(),
        "analysis request completed"
    );
}

pub async fn full_analysis(
    State(state): State<AppState>,
    Path(item_id): Path<String>,
    body: Bytes,
) -> Result<(StatusCode, Json<AnalysisResponse>), HttpError> {
    let body: MarkerCountBody = optional_body(&body)?;
    tracing::info!(
        item_id = %item_id,
        target_marker_count = ?body.target_marker_count,
        "received full analysis request"
    );

    let command = FullAnalysisCommand::new(FullAnalysisRequest {
        item_id: item_id.clone(),
        target_marker_count: body.target_marker_count,
    });
    match state
        .command_service
        .execute(command, CommandContext::new())
        .await
    {
        Ok(result) => {
            log_analysis("full_analysis", &item_id, &result);
            Ok((StatusCode::OK, Json(result)))
        }
        Err(error) => {
            tracing::error!(item_id = %item_id, error = %error, "full analysis request failed");
            Err(error_mapper(error))
        }
    }
}

pub async fn generate_paragraph(
    State(state): State<AppState>,
    Path(item_id): Path<String>,
    body: Bytes,
) -> Result<(StatusCode, Json<AnalysisResponse>), HttpError> {
    let body: MarkerCountBody = optional_body(&body)?;
    tracing::info!(item_id = %item_id, "received paragraph generation request");

    let command = GenerateParagraphCommand::new(GenerateParagraphRequest {
        item_id: item_id.clone(),
        target_marker_count: body.target_marker_count,
    });
    match state
        .command_service
        .execute(command, CommandContext::new())
        .await
    {
        Ok(result) => {
            log_analysis("generate_paragraph", &item_id, &result);
            Ok((StatusCode::OK, Json(result)))
        }
        Err(error) => {
            tracing::error!(item_id = %item_id, error = %error, "paragraph generation failed");
            Err(error_mapper(error))
        }
    }
}

pub async fn extract_frames(
    State(state): State<AppState>,
    Path(item_id): Path<String>,
    body: Bytes,
) -> Result<(StatusCode, Json<AnalysisResponse>), HttpError> {
    let body: ExtractFramesBody = optional_body(&body)?;
    tracing::info!(item_id = %item_id, count = ?body.count, "received frame extraction request");

    let command = ExtractFramesCommand::new(ExtractFramesRequest {
        item_id: item_id.clone(),
        count: body.count,
    });
    match state
        .command_service
        .execute(command, CommandContext::new())
        .await
    {
        Ok(result) => {
            log_analysis("extract_frames", &item_id, &result);
            Ok((StatusCode::OK, Json(result)))
        }
        Err(error) => {
            tracing::error!(item_id = %item_id, error = %error, "frame extraction failed");
            Err(error_mapper(error))
        }
    }
}

pub async fn lookup_reference(
    State(state): State<AppState>,
    Path((item_id, number)): Path<(String, u32)>,
) -> Result<Json<ReferenceResponse>, HttpError> {
    let command = LookupReferenceCommand::new(LookupReferenceRequest { item_id, number });
    state
        .command_service
        .execute(command, CommandContext::new())
        .await
        .map(Json)
        .map_err(|error| {
            tracing::debug!(error = %error, "reference lookup failed");
            error_mapper(error)
        })
}

pub async fn invalidate_analysis(
    State(state): State<AppState>,
    Path(item_id): Path<String>,
) -> Result<Json<InvalidateAnalysisResponse>, HttpError> {
    tracing::info!(item_id = %item_id, "received invalidate request");

    let command = InvalidateAnalysisCommand::new(InvalidateAnalysisRequest { item_id });
    state
        .command_service
        .execute(command, CommandContext::new())
        .await
        .map(Json)
        .map_err(|error| {
            tracing::error!(error = %error, "invalidate request failed");
            error_mapper(error)
        })
}
