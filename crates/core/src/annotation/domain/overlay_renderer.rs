use super::annotation::AnnotationId;
use super::color_tag::ColorTag;

/// A region as currently drawn by the overlay.
#[derive(Debug, Clone, PartialEq)]
pub struct OverlayRegion {
    pub id: AnnotationId,
    pub start: f64,
    pub end: f64,
    pub color: ColorTag,
}

/// Domain interface for the waveform region overlay.
///
/// Implementations adapt one rendering surface. Calls made through this
/// trait must not echo back as gesture events; only a user's completed
/// drag or resize produces `AnnotationCreated` / `GestureEnd`.
pub trait OverlayRenderer {
    fn add_annotation(&mut self, id: &AnnotationId, start: f64, end: f64, color: &ColorTag);
    fn update_annotation(&mut self, id: &AnnotationId, start: f64, end: f64);
    fn remove_annotation(&mut self, id: &AnnotationId);
    fn list_annotations(&self) -> Vec<OverlayRegion>;
}
