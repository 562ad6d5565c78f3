use serde::{Deserialize, Serialize};

/// Progress of one media item through the analysis pipeline.
///
/// `NoTranscript` is terminal for the paragraph path: frames can still be
/// attached, but the item never reaches `ParagraphReady` or `Complete`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AnalysisState {
    NoTranscript,
    TranscriptOnly,
    ParagraphReady,
    FramesReady,
    Complete,
}

impl AnalysisState {
    pub fn resolve(has_transcript: bool, paragraph_ready: bool, frames_ready: bool) -> Self {
        match (has_transcript, paragraph_ready, frames_ready) {
            (false, _, _) => Self::NoTranscript,
            (true, true, true) => Self::Complete,
            (true, true, false) => Self::ParagraphReady,
            (true, false, true) => Self::FramesReady,
            (true, false, false) => Self::TranscriptOnly,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::AnalysisState;

    #[test]
    fn resolves_every_combination() {
        assert_eq!(AnalysisState::resolve(false, false, false), AnalysisState::NoTranscript);
        assert_eq!(AnalysisState::resolve(false, false, true), AnalysisState::NoTranscript);
        assert_eq!(AnalysisState::resolve(true, false, false), AnalysisState::TranscriptOnly);
        assert_eq!(AnalysisState::resolve(true, true, false), AnalysisState::ParagraphReady);
        assert_eq!(AnalysisState::resolve(true, false, true), AnalysisState::FramesReady);
        assert_eq!(AnalysisState::resolve(true, true, true), AnalysisState::Complete);
    }

    #[test]
    fn serializes_as_snake_case() {
        let encoded = serde_json::to_string(&AnalysisState::ParagraphReady).expect("serializes");
        assert_eq!(encoded, "\"paragraph_ready\"");
    }
}
