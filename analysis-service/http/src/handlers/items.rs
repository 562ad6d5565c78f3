use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::Json,
};

use analysis_application::{
    CommandContext, DeleteItemCommand, DeleteItemRequest, DeleteItemResponse, GetItemCommand,
    GetItemRequest, GetItemResponse, ListItemsCommand, ListItemsRequest, ListItemsResponse,
    RegisterItemCommand, RegisterItemRequest, RegisterItemResponse,
};

use crate::error::{error_mapper, HttpError};
use crate::AppState;

pub async fn register_item(
    State(state): State<AppState>,
    Json(request): Json<RegisterItemRequest>,
) -> Result<(StatusCode, Json<RegisterItemResponse>), HttpError> {
    tracing::info!(item_id = %request.id, "received register item request");

    let command = RegisterItemCommand::new(request);
    match state
        .command_service
        .execute(command, CommandContext::new())
        .await
    {
        Ok(result) => Ok((StatusCode::CREATED, Json(result))),
        Err(error) => {
            tracing::error!(error = %error, "register item request failed");
            Err(error_mapper(error))
        }
    }
}

pub async fn list_items(
    State(state): State<AppState>,
    Query(request): Query<ListItemsRequest>,
) -> Result<Json<ListItemsResponse>, HttpError> {
    let command = ListItemsCommand::new(request);
    state
        .command_service
        .execute(command, CommandContext::new())
        .await
        .map(Json)
        .map_err(|error| {
            tracing::error!(error = %error, "list items request failed");
            error_mapper(error)
        })
}

pub async fn get_item(
    State(state): State<AppState>,
    Path(item_id): Path<String>,
) -> Result<Json<GetItemResponse>, HttpError> {
    let command = GetItemCommand::new(GetItemRequest { item_id });
    state
        .command_service
        .execute(command, CommandContext::new())
        .await
        .map(Json)
        .map_err(|error| {
            tracing::error!(error = %error, "get item request failed");
            error_mapper(error)
        })
}

pub async fn delete_item(
    State(state): State<AppState>,
    Path(item_id): Path<String>,
) -> Result<Json<DeleteItemResponse>, HttpError> {
    tracing::info!(item_id = %item_id, "received delete item request");

    let command = DeleteItemCommand::new(DeleteItemRequest { item_id });
    state
        .command_service
        .execute(command, CommandContext::new())
        .await
        .map(Json)
        .map_err(|error| {
            tracing::error!(error = %error, "delete item request failed");
            error_mapper(error)
        })
}
