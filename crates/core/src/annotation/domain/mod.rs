pub mod annotation;
pub mod annotation_sync_engine;
pub mod color_tag;
pub mod overlay_renderer;
pub mod review_log;
