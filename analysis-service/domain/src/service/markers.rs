use std::collections::BTreeSet;
use std::sync::OnceLock;

use regex::Regex;

use crate::NormalizedParagraph;

pub(crate) fn marker_regex() -> &'static Regex {
    static MARKER_REGEX: OnceLock<Regex> = OnceLock::new();
    MARKER_REGEX.get_or_init(|| Regex::new(r"\[(\d+)\]").expect("Failed to compile marker regex"))
}

pub(crate) fn sentence_boundary_regex() -> &'static Regex {
    static SENTENCE_BOUNDARY_REGEX: OnceLock<Regex> = OnceLock::new();
    SENTENCE_BOUNDARY_REGEX
        .get_or_init(|| Regex::new(r"[.!?]+").expect("Failed to compile sentence boundary regex"))
}

/// Marker numbers in the order they occur in `text`, duplicates included.
pub fn marker_numbers(text: &str) -> Vec<u32> {
    marker_regex()
        .captures_iter(text)
        .filter_map(|caps| caps[1].parse::<u32>().ok())
        .collect()
}

pub fn distinct_marker_numbers(text: &str) -> BTreeSet<u32> {
    marker_numbers(text).into_iter().collect()
}

/// Ensures `raw` carries at least `target_marker_count` distinct citation markers.
///
/// Text that already holds enough distinct markers is returned untouched, even
/// when its numbers are sparse or out of order. Otherwise the text is rebuilt
/// sentence by sentence: a marker goes at the end of every sentence whose index
/// is a positive multiple of `sentences / target` and which has no marker yet,
/// and whatever is still owed after the walk lands on the final sentence.
/// New markers take the smallest numbers not already used in `raw`.
pub fn normalize_markers(raw: &str, target_marker_count: u32) -> NormalizedParagraph {
    let existing = distinct_marker_numbers(raw);
    let target = target_marker_count as usize;
    if existing.len() >= target {
        return NormalizedParagraph::new(raw);
    }

    let mut sentences: Vec<String> = sentence_boundary_regex()
        .split(raw)
        .map(str::trim)
        .filter(|sentence| !sentence.is_empty())
        .map(str::to_string)
        .collect();
    if sentences.is_empty() {
        return NormalizedParagraph::new(raw);
    }

    let stride = (sentences.len() / target).max(1);
    let mut owed = target - existing.len();
    let mut numbers = UnusedNumbers::new(&existing);

    for (index, sentence) in sentences.iter_mut().enumerate() {
        if owed == 0 {
            break;
        }
        if index > 0 && index % stride == 0 && !marker_regex().is_match(sentence) {
            append_marker(sentence, numbers.next_number());
            owed -= 1;
        }
    }

    if let Some(last) = sentences.last_mut() {
        for _ in 0..owed {
            append_marker(last, numbers.next_number());
        }
    }

    let mut text = sentences.join(". ");
    text.push('.');
    NormalizedParagraph::new(text)
}

fn append_marker(sentence: &mut String, number: u32) {
    sentence.push_str(&format!(" [{number}]"));
}

struct UnusedNumbers<'a> {
    taken: &'a BTreeSet<u32>,
    next: u32,
}

impl<'a> UnusedNumbers<'a> {
    fn new(taken: &'a BTreeSet<u32>) -> Self {
        Self { taken, next: 1 }
    }

    fn next_number(&mut self) -> u32 {
        while self.taken.contains(&self.next) {
            self.next += 1;
        }
        let number = self.next;
        self.next += 1;
        number
    }
}
