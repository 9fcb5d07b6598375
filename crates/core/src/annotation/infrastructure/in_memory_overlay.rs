use crate::annotation::domain::annotation::AnnotationId;
use crate::annotation::domain::color_tag::ColorTag;
use crate::annotation::domain::overlay_renderer::{OverlayRegion, OverlayRenderer};

struct RetainedRegion {
    region: OverlayRegion,
    instance: u64,
}

/// Retained-mode overlay that keeps regions in memory.
///
/// Each added region gets a fresh instance number, so callers can tell an
/// in-place update from a remove-and-re-add.
#[derive(Default)]
pub struct InMemoryOverlay {
    regions: Vec<RetainedRegion>,
    next_instance: u64,
    next_preview: u64,
    pub adds: usize,
    pub updates: usize,
    pub removes: usize,
}

impl InMemoryOverlay {
    pub fn new() -> Self {
        Self::default()
    }

    /// Draws a region the user is still dragging. It has no authoritative
    /// counterpart, so the next reconciliation removes it.
    pub fn add_preview_region(&mut self, start: f64, end: f64) -> AnnotationId {
        self.next_preview += 1;
        let id = AnnotationId::new(format!("preview-{}", self.next_preview));
        self.push(id.clone(), start, end, ColorTag::from_palette(0));
        id
    }

    pub fn instance_of(&self, id: &AnnotationId) -> Option<u64> {
        self.regions
            .iter()
            .find(|r| &r.region.id == id)
            .map(|r| r.instance)
    }

    fn push(&mut self, id: AnnotationId, start: f64, end: f64, color: ColorTag) {
        self.next_instance += 1;
        self.regions.push(RetainedRegion {
            region: OverlayRegion {
                id,
                start,
                end,
                color,
            },
            instance: self.next_instance,
        });
    }
}

impl OverlayRenderer for InMemoryOverlay {
    fn add_annotation(&mut self, id: &AnnotationId, start: f64, end: f64, color: &ColorTag) {
        if self.instance_of(id).is_some() {
            log::warn!("Overlay already has region {id}");
            return;
        }
        self.adds += 1;
        self.push(id.clone(), start, end, color.clone());
    }

    fn update_annotation(&mut self, id: &AnnotationId, start: f64, end: f64) {
        if let Some(r) = self.regions.iter_mut().find(|r| &r.region.id == id) {
            r.region.start = start;
            r.region.end = end;
            self.updates += 1;
        }
    }

    fn remove_annotation(&mut self, id: &AnnotationId) {
        let before = self.regions.len();
        self.regions.retain(|r| &r.region.id != id);
        if self.regions.len() != before {
            self.removes += 1;
        }
    }

    fn list_annotations(&self) -> Vec<OverlayRegion> {
        self.regions.iter().map(|r| r.region.clone()).collect()
    }
}
