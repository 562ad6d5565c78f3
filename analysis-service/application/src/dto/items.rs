use serde::{Deserialize, Serialize};
use validator::Validate;

use analysis_domain::MediaItem;

use super::ITEM_ID_PATTERN;
use crate::AnalysisResponse;

#[derive(Debug, Clone, Deserialize, Validate)]
pub struct RegisterItemRequest {
    #[validate(length(min = 1, max = 128), regex(path = *ITEM_ID_PATTERN))]
    pub id: String,
    #[validate(length(min = 1, max = 512))]
    pub title: String,
    pub transcript: Option<String>,
    #[validate(length(min = 1))]
    pub media_path: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RegisterItemResponse {
    pub item_id: String,
    pub has_transcript: bool,
}

#[derive(Debug, Clone, Default, Deserialize, Validate)]
pub struct ListItemsRequest {
    #[validate(range(min = 1, max = 500))]
    pub limit: Option<u32>,
}

#[derive(Debug, Clone, Deserialize, Validate)]
pub struct GetItemRequest {
    #[validate(length(min = 1, max = 128), regex(path = *ITEM_ID_PATTERN))]
    pub item_id: String,
}

#[derive(Debug, Clone, Deserialize, Validate)]
pub struct DeleteItemRequest {
    #[validate(length(min = 1, max = 128), regex(path = *ITEM_ID_PATTERN))]
    pub item_id: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ItemSummary {
    pub id: String,
    pub title: String,
    pub has_transcript: bool,
    pub media_path: String,
}

impl From<&MediaItem> for ItemSummary {
    fn from(item: &MediaItem) -> Self {
        Self {
            id: item.id.clone(),
            title: item.title.clone(),
            has_transcript: item.has_transcript(),
            media_path: item.media.location.clone(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ListItemsResponse {
    /// Most recently registered first.
    pub items: Vec<ItemSummary>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct GetItemResponse {
    pub item: ItemSummary,
    /// Stored analysis, if any; reading an item never triggers one.
    pub analysis: Option<AnalysisResponse>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DeleteItemResponse {
    pub item_id: String,
    pub analysis_removed: bool,
}
