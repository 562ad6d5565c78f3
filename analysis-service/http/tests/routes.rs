use std::sync::Arc;

use analysis_application::{
    AnalysisCommandRegistryFactory, AnalysisResponse, AnalysisUseCase, ApplicationError,
    DeleteItemRequest, DeleteItemResponse, ExtractFramesRequest, FullAnalysisRequest,
    GenerateParagraphRequest, GenericCommandService, GetItemRequest, GetItemResponse,
    InvalidateAnalysisRequest, InvalidateAnalysisResponse, ItemCatalogUseCase, ItemSummary,
    ListItemsRequest, ListItemsResponse, LookupReferenceRequest, ReferenceResponse,
    RegisterItemRequest, RegisterItemResponse,
};
use analysis_domain::{AnalysisResult, DomainError, LinkedRecord};
use analysis_http_server::{build_router, AppState, FrameAssets};
use async_trait::async_trait;
use axum::{
    body::{to_bytes, Body},
    http::{Request, StatusCode},
    Router,
};
use serde_json::{json, Value};
use tower::ServiceExt;

struct StubAnalysis;

fn outcome(item_id: &str) -> Result<AnalysisResponse, ApplicationError> {
    match item_id {
        "missing" => Err(DomainError::not_found("media item", "missing").into()),
        "flaky" => Err(DomainError::external_service_error("text-generation", "503").into()),
        _ => Ok(AnalysisResult::empty(item_id, true).into()),
    }
}

#[async_trait]
impl AnalysisUseCase for StubAnalysis {
    async fn full_analysis(
        &self,
        request: FullAnalysisRequest,
    ) -> Result<AnalysisResponse, ApplicationError> {
        let mut response = outcome(&request.item_id)?;
        response.paragraph = format!("markers={:?}", request.target_marker_count);
        Ok(response)
    }

    async fn generate_paragraph(
        &self,
        request: GenerateParagraphRequest,
    ) -> Result<AnalysisResponse, ApplicationError> {
        outcome(&request.item_id)
    }

    async fn extract_frames(
        &self,
        request: ExtractFramesRequest,
    ) -> Result<AnalysisResponse, ApplicationError> {
        outcome(&request.item_id)
    }

    async fn lookup_reference(
        &self,
        request: LookupReferenceRequest,
    ) -> Result<ReferenceResponse, ApplicationError> {
        if request.number != 1 {
            return Err(DomainError::not_found("reference", request.number.to_string()).into());
        }
        Ok(ReferenceResponse {
            item_id: request.item_id,
            record: LinkedRecord {
                number: 1,
                description: "Cells divide [1]".to_string(),
                frame: None,
            },
            frame: None,
        })
    }

    async fn invalidate(
        &self,
        request: InvalidateAnalysisRequest,
    ) -> Result<InvalidateAnalysisResponse, ApplicationError> {
        Ok(InvalidateAnalysisResponse {
            item_id: request.item_id,
            removed: true,
        })
    }
}

struct StubItems;

#[async_trait]
impl ItemCatalogUseCase for StubItems {
    async fn register_item(
        &self,
        request: RegisterItemRequest,
    ) -> Result<RegisterItemResponse, ApplicationError> {
        Ok(RegisterItemResponse {
            item_id: request.id,
            has_transcript: request.transcript.is_some(),
        })
    }

    async fn list_items(
        &self,
        request: ListItemsRequest,
    ) -> Result<ListItemsResponse, ApplicationError> {
        let items = ["newer", "older"]
            .into_iter()
            .take(request.limit.map_or(usize::MAX, |limit| limit as usize))
            .map(summary)
            .collect();
        Ok(ListItemsResponse { items })
    }

    async fn get_item(&self, request: GetItemRequest) -> Result<GetItemResponse, ApplicationError> {
        if request.item_id == "missing" {
            return Err(DomainError::not_found("media item", "missing").into());
        }
        Ok(GetItemResponse {
            analysis: Some(AnalysisResult::empty(request.item_id.clone(), true).into()),
            item: summary(&request.item_id),
        })
    }

    async fn delete_item(
        &self,
        request: DeleteItemRequest,
    ) -> Result<DeleteItemResponse, ApplicationError> {
        if request.item_id == "missing" {
            return Err(DomainError::not_found("media item", "missing").into());
        }
        Ok(DeleteItemResponse {
            item_id: request.item_id,
            analysis_removed: true,
        })
    }
}

fn summary(id: &str) -> ItemSummary {
    ItemSummary {
        id: id.to_string(),
        title: format!("Title {id}"),
        has_transcript: true,
        media_path: format!("/media/{id}.mp4"),
    }
}

fn router(assets: Option<FrameAssets>) -> Router {
    let registry =
        AnalysisCommandRegistryFactory::create_registry(Arc::new(StubAnalysis), Arc::new(StubItems));
    let service = Arc::new(GenericCommandService::new(Arc::new(registry)));
    build_router(AppState::new(service), assets)
}

async fn send(router: Router, request: Request<Body>) -> (StatusCode, Value) {
    let response = router.oneshot(request).await.expect("router responds");
    let status = response.status();
    let bytes = to_bytes(response.into_body(), usize::MAX)
        .await
        .expect("body readable");
    let body = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes).unwrap_or_else(|_| Value::String(String::from_utf8_lossy(&bytes).into_owned()))
    };
    (status, body)
}

fn post_json(uri: &str, body: Value) -> Request<Body> {
    Request::post(uri)
        .header("content-type", "application/json")
        .body(Body::from(body.to_string()))
        .expect("request")
}

#[tokio::test]
async fn health_reports_ok() {
    let (status, body) = send(
        router(None),
        Request::get("/health").body(Body::empty()).expect("request"),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "ok");
}

#[tokio::test]
async fn full_analysis_passes_marker_count_through() {
    let (status, body) = send(
        router(None),
        post_json("/api/analysis/lecture/full", json!({ "target_marker_count": 3 })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["item_id"], "lecture");
    assert_eq!(body["paragraph"], "markers=Some(3)");
    assert_eq!(body["state"], "transcript_only");
}

#[tokio::test]
async fn full_analysis_accepts_an_empty_body() {
    let (status, body) = send(
        router(None),
        Request::post("/api/analysis/lecture/full")
            .body(Body::empty())
            .expect("request"),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["paragraph"], "markers=None");
}

#[tokio::test]
async fn zero_marker_count_is_unprocessable() {
    let (status, body) = send(
        router(None),
        post_json("/api/analysis/lecture/full", json!({ "target_marker_count": 0 })),
    )
    .await;
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    assert!(body["error"].is_string());
}

#[tokio::test]
async fn malformed_body_is_unprocessable() {
    let (status, _) = send(
        router(None),
        Request::post("/api/analysis/lecture/frames")
            .body(Body::from("{count:"))
            .expect("request"),
    )
    .await;
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
}

#[tokio::test]
async fn domain_failures_map_to_status_codes() {
    let (status, body) = send(
        router(None),
        post_json("/api/analysis/missing/paragraph", json!({})),
    )
    .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["error"], "media item `missing` not found");

    let (status, _) = send(
        router(None),
        post_json("/api/analysis/flaky/frames", json!({ "count": 4 })),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_GATEWAY);
}

#[tokio::test]
async fn reference_lookup_and_invalidate() {
    let (status, body) = send(
        router(None),
        Request::get("/api/analysis/lecture/references/1")
            .body(Body::empty())
            .expect("request"),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["record"]["description"], "Cells divide [1]");

    let (status, _) = send(
        router(None),
        Request::get("/api/analysis/lecture/references/2")
            .body(Body::empty())
            .expect("request"),
    )
    .await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    let (status, body) = send(
        router(None),
        Request::delete("/api/analysis/lecture")
            .body(Body::empty())
            .expect("request"),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["removed"], true);
}

#[tokio::test]
async fn register_item_returns_created() {
    let (status, body) = send(
        router(None),
        post_json(
            "/api/items",
            json!({
                "id": "lecture",
                "title": "Cell Biology",
                "transcript": "cells divide",
                "media_path": "/media/lecture.mp4"
            }),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(body["has_transcript"], true);
}

#[tokio::test]
async fn register_item_rejects_path_like_ids() {
    let (status, body) = send(
        router(None),
        post_json(
            "/api/items",
            json!({
                "id": "../escaped",
                "title": "Escape",
                "media_path": "/media/escape.mp4"
            }),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    assert!(body["error"].is_string());
}

#[tokio::test]
async fn encoded_traversal_in_path_is_rejected() {
    let (status, _) = send(
        router(None),
        Request::post("/api/analysis/..%2Fescaped/frames")
            .body(Body::empty())
            .expect("request"),
    )
    .await;
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
}

#[tokio::test]
async fn list_items_honours_limit() {
    let (status, body) = send(
        router(None),
        Request::get("/api/items").body(Body::empty()).expect("request"),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["items"][0]["id"], "newer");
    assert_eq!(body["items"].as_array().map(Vec::len), Some(2));

    let (status, body) = send(
        router(None),
        Request::get("/api/items?limit=1")
            .body(Body::empty())
            .expect("request"),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["items"].as_array().map(Vec::len), Some(1));

    let (status, _) = send(
        router(None),
        Request::get("/api/items?limit=0")
            .body(Body::empty())
            .expect("request"),
    )
    .await;
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
}

#[tokio::test]
async fn get_item_includes_stored_analysis() {
    let (status, body) = send(
        router(None),
        Request::get("/api/items/lecture")
            .body(Body::empty())
            .expect("request"),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["item"]["title"], "Title lecture");
    assert_eq!(body["analysis"]["state"], "transcript_only");

    let (status, _) = send(
        router(None),
        Request::get("/api/items/missing")
            .body(Body::empty())
            .expect("request"),
    )
    .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn delete_item_reports_removal() {
    let (status, body) = send(
        router(None),
        Request::delete("/api/items/lecture")
            .body(Body::empty())
            .expect("request"),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["analysis_removed"], true);

    let (status, _) = send(
        router(None),
        Request::delete("/api/items/missing")
            .body(Body::empty())
            .expect("request"),
    )
    .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn captured_frames_are_served_from_public_path() {
    let dir = tempfile::tempdir().expect("tempdir");
    std::fs::create_dir_all(dir.path().join("lecture")).expect("mkdir");
    std::fs::write(dir.path().join("lecture/frame_1_20s.jpg"), b"jpeg").expect("write");

    let app = router(Some(FrameAssets {
        directory: dir.path().to_path_buf(),
        public_path: "/uploads/images".to_string(),
    }));
    let response = app
        .oneshot(
            Request::get("/uploads/images/lecture/frame_1_20s.jpg")
                .body(Body::empty())
                .expect("request"),
        )
        .await
        .expect("router responds");

    assert_eq!(response.status(), StatusCode::OK);
    let bytes = to_bytes(response.into_body(), usize::MAX)
        .await
        .expect("body");
    assert_eq!(&bytes[..], b"jpeg");
}
