use std::sync::LazyLock;

use regex::Regex;

mod analysis;
mod items;

pub use analysis::*;
pub use items::*;

/// Item ids double as path segments for stored frames, so they are limited
/// to a single segment of letters, digits, `_` and `-`.
pub(crate) static ITEM_ID_PATTERN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^[A-Za-z0-9][A-Za-z0-9_-]*$").expect("Failed to compile item id regex")
});
