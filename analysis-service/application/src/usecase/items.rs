use std::sync::Arc;

use async_trait::async_trait;

use analysis_domain::{AnalysisRepository, DomainError, MediaCatalogPort, MediaHandle, MediaItem};

use crate::{
    ApplicationError, DeleteItemRequest, DeleteItemResponse, GetItemRequest, GetItemResponse,
    ItemSummary, ListItemsRequest, ListItemsResponse, RegisterItemRequest, RegisterItemResponse,
};

#[async_trait]
pub trait ItemCatalogUseCase: Send + Sync {
    async fn register_item(
        &self,
        request: RegisterItemRequest,
    ) -> Result<RegisterItemResponse, ApplicationError>;

    async fn list_items(
        &self,
        request: ListItemsRequest,
    ) -> Result<ListItemsResponse, ApplicationError>;

    async fn get_item(&self, request: GetItemRequest) -> Result<GetItemResponse, ApplicationError>;

    async fn delete_item(
        &self,
        request: DeleteItemRequest,
    ) -> Result<DeleteItemResponse, ApplicationError>;
}

pub struct ItemCatalogUseCaseImpl {
    catalog: Arc<dyn MediaCatalogPort>,
    repository: Arc<dyn AnalysisRepository>,
}

impl ItemCatalogUseCaseImpl {
    pub fn new(catalog: Arc<dyn MediaCatalogPort>, repository: Arc<dyn AnalysisRepository>) -> Self {
        Self {
            catalog,
            repository,
        }
    }
}

#[async_trait]
impl ItemCatalogUseCase for ItemCatalogUseCaseImpl {
    async fn register_item(
        &self,
        request: RegisterItemRequest,
    ) -> Result<RegisterItemResponse, ApplicationError> {
        let item = MediaItem {
            media: MediaHandle::new(request.id.clone(), request.media_path),
            id: request.id,
            title: request.title,
            transcript: request.transcript,
        };
        let has_transcript = item.has_transcript();
        let item_id = item.id.clone();

        self.catalog.register(item).await?;
        tracing::info!(item_id = %item_id, has_transcript, "media item registered");

        Ok(RegisterItemResponse {
            item_id,
            has_transcript,
        })
    }

    async fn list_items(
        &self,
        request: ListItemsRequest,
    ) -> Result<ListItemsResponse, ApplicationError> {
        let limit = request.limit.map_or(usize::MAX, |limit| limit as usize);
        let items = self
            .catalog
            .list()
            .await?
            .iter()
            .take(limit)
            .map(ItemSummary::from)
            .collect();

        Ok(ListItemsResponse { items })
    }

    async fn get_item(&self, request: GetItemRequest) -> Result<GetItemResponse, ApplicationError> {
        let item = self
            .catalog
            .find(&request.item_id)
            .await?
            .ok_or_else(|| DomainError::not_found("media item", request.item_id.clone()))?;
        let analysis = self.repository.load(&item.id).await?.map(Into::into);

        Ok(GetItemResponse {
            item: ItemSummary::from(&item),
            analysis,
        })
    }

    async fn delete_item(
        &self,
        request: DeleteItemRequest,
    ) -> Result<DeleteItemResponse, ApplicationError> {
        if !self.catalog.remove(&request.item_id).await? {
            return Err(DomainError::not_found("media item", request.item_id).into());
        }
        let analysis_removed = self.repository.delete(&request.item_id).await?;
        tracing::info!(item_id = %request.item_id, analysis_removed, "media item deleted");

        Ok(DeleteItemResponse {
            item_id: request.item_id,
            analysis_removed,
        })
    }
}
