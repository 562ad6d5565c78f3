mod analysis;
mod health;
mod items;

pub use analysis::{
    extract_frames, full_analysis, generate_paragraph, invalidate_analysis, lookup_reference,
    ExtractFramesBody, MarkerCountBody,
};
pub use health::health;
pub use items::{delete_item, get_item, list_items, register_item};
