use serde::{Deserialize, Serialize};

use crate::service::link_references;
use crate::AnalysisState;

/// Locates the transient media backing frame capture for one item.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MediaHandle {
    pub item_id: String,
    pub location: String,
}

impl MediaHandle {
    pub fn new(item_id: impl Into<String>, location: impl Into<String>) -> Self {
        Self {
            item_id: item_id.into(),
            location: location.into(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MediaItem {
    pub id: String,
    pub title: String,
    pub transcript: Option<String>,
    pub media: MediaHandle,
}

impl MediaItem {
    /// Transcript text, treating blank transcripts as absent.
    pub fn transcript_text(&self) -> Option<&str> {
        self.transcript
            .as_deref()
            .map(str::trim)
            .filter(|text| !text.is_empty())
    }

    pub fn has_transcript(&self) -> bool {
        self.transcript_text().is_some()
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GenerationRequest {
    pub transcript: String,
    pub title: String,
    pub target_marker_count: u32,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NormalizedParagraph {
    pub text: String,
}

impl NormalizedParagraph {
    pub fn new(text: impl Into<String>) -> Self {
        Self { text: text.into() }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Reference {
    pub number: u32,
    pub description: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SamplePoint {
    pub index: u32,
    pub offset_seconds: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FrameRequest {
    pub index: u32,
    pub offset_seconds: f64,
    pub name: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Frame {
    pub index: u32,
    pub offset_seconds: f64,
    pub name: String,
    /// Display form of the offset, `H:MM:SS` or `M:SS`.
    pub timestamp: String,
    pub locator: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LinkedRecord {
    pub number: u32,
    pub description: String,
    pub frame: Option<Frame>,
}

/// The persisted, caller-visible outcome of analysing one media item.
///
/// Values are never edited in place: each step produces a new result through
/// [`AnalysisResult::with_paragraph`] or [`AnalysisResult::with_frames`], which
/// relink references and frames.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnalysisResult {
    pub item_id: String,
    pub paragraph: String,
    pub references: Vec<LinkedRecord>,
    pub frames: Vec<Frame>,
    pub has_transcript: bool,
}

impl AnalysisResult {
    pub fn empty(item_id: impl Into<String>, has_transcript: bool) -> Self {
        Self {
            item_id: item_id.into(),
            paragraph: String::new(),
            references: Vec::new(),
            frames: Vec::new(),
            has_transcript,
        }
    }

    pub fn paragraph_ready(&self) -> bool {
        !self.paragraph.is_empty()
    }

    pub fn frames_ready(&self) -> bool {
        !self.frames.is_empty()
    }

    pub fn needs_paragraph(&self) -> bool {
        self.has_transcript && !self.paragraph_ready()
    }

    pub fn needs_frames(&self) -> bool {
        !self.frames_ready()
    }

    pub fn state(&self) -> AnalysisState {
        AnalysisState::resolve(
            self.has_transcript,
            self.paragraph_ready(),
            self.frames_ready(),
        )
    }

    /// True once nothing is left to compute for the item.
    pub fn is_settled(&self) -> bool {
        !self.needs_paragraph() && !self.needs_frames()
    }

    pub fn reference_list(&self) -> Vec<Reference> {
        self.references
            .iter()
            .map(|record| Reference {
                number: record.number,
                description: record.description.clone(),
            })
            .collect()
    }

    pub fn with_paragraph(self, paragraph: NormalizedParagraph, references: Vec<Reference>) -> Self {
        Self {
            references: link_references(&references, &self.frames),
            paragraph: paragraph.text,
            has_transcript: true,
            ..self
        }
    }

    pub fn with_frames(self, frames: Vec<Frame>) -> Self {
        let references = link_references(&self.reference_list(), &frames);
        Self {
            references,
            frames,
            ..self
        }
    }

    pub fn record(&self, number: u32) -> Option<&LinkedRecord> {
        self.references.iter().find(|record| record.number == number)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn frame(index: u32) -> Frame {
        Frame {
            index,
            offset_seconds: f64::from(index) * 10.0,
            name: format!("frame_{index}_{}s", index * 10),
            timestamp: format!("0:{}", index * 10),
            locator: format!("/uploads/images/item/frame_{index}.jpg"),
        }
    }

    #[test]
    fn blank_transcript_counts_as_absent() {
        let item = MediaItem {
            id: "item".to_string(),
            title: "Title".to_string(),
            transcript: Some("   \n".to_string()),
            media: MediaHandle::new("item", "/tmp/item.mp4"),
        };
        assert!(!item.has_transcript());
    }

    #[test]
    fn adding_frames_relinks_existing_references() {
        let result = AnalysisResult::empty("item", true).with_paragraph(
            NormalizedParagraph::new("One [1]. Two [2]."),
            vec![
                Reference {
                    number: 1,
                    description: "One [1]".to_string(),
                },
                Reference {
                    number: 2,
                    description: "Two [2]".to_string(),
                },
            ],
        );
        assert!(result.references.iter().all(|record| record.frame.is_none()));
        assert_eq!(result.state(), AnalysisState::ParagraphReady);

        let result = result.with_frames(vec![frame(1)]);
        assert_eq!(result.references[0].frame.as_ref().map(|f| f.index), Some(1));
        assert!(result.references[1].frame.is_none());
        assert_eq!(result.state(), AnalysisState::Complete);
        assert!(result.is_settled());
    }

    #[test]
    fn item_without_transcript_settles_once_frames_exist() {
        let result = AnalysisResult::empty("item", false);
        assert!(!result.needs_paragraph());
        assert!(!result.is_settled());

        let result = result.with_frames(vec![frame(1)]);
        assert!(result.is_settled());
        assert_eq!(result.state(), AnalysisState::NoTranscript);
        assert!(result.paragraph.is_empty());
    }
}
