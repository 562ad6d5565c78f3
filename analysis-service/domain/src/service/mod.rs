mod context;
mod frames;
mod linker;
mod markers;
mod sampling;

pub use context::{extract_references, CONTEXT_RADIUS_CHARS, FALLBACK_DESCRIPTION};
pub use frames::{build_frame_requests, captured_frame, frame_name};
pub use linker::link_references;
pub use markers::{distinct_marker_numbers, marker_numbers, normalize_markers};
pub use sampling::{format_timestamp, sample_points};
