use crate::service::markers::{marker_regex, sentence_boundary_regex};
use crate::{NormalizedParagraph, Reference};

pub const CONTEXT_RADIUS_CHARS: usize = 100;
pub const FALLBACK_DESCRIPTION: &str = "Visual reference";

/// One reference per marker occurrence, in textual order.
///
/// References keep the number written inside the marker, so sparse or
/// unordered numbering survives extraction.
pub fn extract_references(paragraph: &NormalizedParagraph) -> Vec<Reference> {
    let text = paragraph.text.as_str();
    marker_regex()
        .captures_iter(text)
        .filter_map(|caps| {
            let marker = caps.get(0)?;
            let number = caps[1].parse::<u32>().ok()?;
            Some(Reference {
                number,
                description: describe_marker(text, marker.start(), marker.as_str()),
            })
        })
        .collect()
}

fn describe_marker(text: &str, byte_start: usize, marker: &str) -> String {
    let char_start = text[..byte_start].chars().count();
    let window_start = char_start.saturating_sub(CONTEXT_RADIUS_CHARS);
    let window_len = char_start + CONTEXT_RADIUS_CHARS - window_start;
    let window: String = text.chars().skip(window_start).take(window_len).collect();

    sentence_boundary_regex()
        .split(&window)
        .map(str::trim)
        .find(|unit| unit.contains(marker))
        .map(str::to_string)
        .unwrap_or_else(|| FALLBACK_DESCRIPTION.to_string())
}
