use serde::{Deserialize, Serialize};
use validator::Validate;

use analysis_domain::{AnalysisResult, AnalysisState, Frame, LinkedRecord};

use super::ITEM_ID_PATTERN;

#[derive(Debug, Clone, Deserialize, Validate)]
pub struct FullAnalysisRequest {
    #[validate(length(min = 1, max = 128), regex(path = *ITEM_ID_PATTERN))]
    pub item_id: String,
    #[validate(range(min = 1, max = 50))]
    pub target_marker_count: Option<u32>,
}

#[derive(Debug, Clone, Deserialize, Validate)]
pub struct GenerateParagraphRequest {
    #[validate(length(min = 1, max = 128), regex(path = *ITEM_ID_PATTERN))]
    pub item_id: String,
    #[validate(range(min = 1, max = 50))]
    pub target_marker_count: Option<u32>,
}

#[derive(Debug, Clone, Deserialize, Validate)]
pub struct ExtractFramesRequest {
    #[validate(length(min = 1, max = 128), regex(path = *ITEM_ID_PATTERN))]
    pub item_id: String,
    #[validate(range(min = 1, max = 50))]
    pub count: Option<u32>,
}

#[derive(Debug, Clone, Deserialize, Validate)]
pub struct LookupReferenceRequest {
    #[validate(length(min = 1, max = 128), regex(path = *ITEM_ID_PATTERN))]
    pub item_id: String,
    #[validate(range(min = 1))]
    pub number: u32,
}

#[derive(Debug, Clone, Deserialize, Validate)]
pub struct InvalidateAnalysisRequest {
    #[validate(length(min = 1, max = 128), regex(path = *ITEM_ID_PATTERN))]
    pub item_id: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AnalysisResponse {
    pub item_id: String,
    pub state: AnalysisState,
    pub paragraph: String,
    pub references: Vec<LinkedRecord>,
    pub frames: Vec<Frame>,
    pub has_transcript: bool,
}

impl From<AnalysisResult> for AnalysisResponse {
    fn from(result: AnalysisResult) -> Self {
        Self {
            state: result.state(),
            item_id: result.item_id,
            paragraph: result.paragraph,
            references: result.references,
            frames: result.frames,
            has_transcript: result.has_transcript,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ReferenceResponse {
    pub item_id: String,
    pub record: LinkedRecord,
    /// Frame whose index equals the requested marker number, if captured.
    pub frame: Option<Frame>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct InvalidateAnalysisResponse {
    pub item_id: String,
    pub removed: bool,
}
