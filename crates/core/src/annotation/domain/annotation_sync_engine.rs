use std::collections::HashSet;

use thiserror::Error;

use crate::shared::constants::MIN_ANNOTATION_SECS;

use super::annotation::{Annotation, AnnotationId};
use super::color_tag::ColorTag;
use super::overlay_renderer::OverlayRenderer;
use super::review_log::{ReviewLog, ReviewLogRow, RowPatch};

#[derive(Error, Debug, PartialEq)]
pub enum AnnotationError {
    #[error("unknown annotation: {0}")]
    UnknownAnnotation(AnnotationId),
    #[error("invalid bounds: {start}..{end}")]
    InvalidBounds { start: f64, end: f64 },
}

/// Marking-gesture lifecycle.
///
/// `Idle` → (marking on) → `Armed` → (press) → `Dragging` → (release) →
/// `Committed`. Marking off returns to `Idle` from anywhere.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MarkingState {
    Idle,
    Armed,
    Dragging,
    Committed,
}

/// Counts of overlay calls issued by one reconciliation pass.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ReconcileStats {
    pub added: usize,
    pub updated: usize,
    pub removed: usize,
}

impl ReconcileStats {
    pub fn is_noop(&self) -> bool {
        self.added == 0 && self.updated == 0 && self.removed == 0
    }
}

/// Authoritative store of annotations and their review-log rows.
///
/// The overlay is a projection of this list, refreshed by [`reconcile`].
/// Overlay-originated changes enter only through [`complete_gesture`],
/// [`resize_annotation`] and [`adopt_annotation`].
///
/// [`reconcile`]: AnnotationSyncEngine::reconcile
/// [`complete_gesture`]: AnnotationSyncEngine::complete_gesture
/// [`resize_annotation`]: AnnotationSyncEngine::resize_annotation
/// [`adopt_annotation`]: AnnotationSyncEngine::adopt_annotation
pub struct AnnotationSyncEngine {
    min_length: f64,
    duration: f64,
    state: MarkingState,
    preview: Option<(f64, f64)>,
    annotations: Vec<Annotation>,
    review_log: ReviewLog,
}

impl Default for AnnotationSyncEngine {
    fn default() -> Self {
        Self::new(MIN_ANNOTATION_SECS)
    }
}

impl AnnotationSyncEngine {
    pub fn new(min_length: f64) -> Self {
        Self {
            min_length,
            duration: 0.0,
            state: MarkingState::Idle,
            preview: None,
            annotations: Vec::new(),
            review_log: ReviewLog::default(),
        }
    }

    pub fn set_duration(&mut self, duration: f64) {
        self.duration = if duration.is_finite() { duration.max(0.0) } else { 0.0 };
    }

    pub fn duration(&self) -> f64 {
        self.duration
    }

    pub fn state(&self) -> MarkingState {
        self.state
    }

    pub fn is_marking(&self) -> bool {
        self.state != MarkingState::Idle
    }

    pub fn set_marking_mode(&mut self, enabled: bool) {
        self.preview = None;
        self.state = if enabled {
            MarkingState::Armed
        } else {
            MarkingState::Idle
        };
    }

    pub fn begin_gesture(&mut self) {
        if self.is_marking() {
            self.state = MarkingState::Dragging;
            self.preview = None;
        }
    }

    /// Stores the in-flight drag bounds. Never touches the annotation list.
    pub fn update_preview(&mut self, start: f64, end: f64) {
        if self.state == MarkingState::Dragging {
            self.preview = Some((start.min(end), start.max(end)));
        }
    }

    pub fn preview(&self) -> Option<(f64, f64)> {
        self.preview
    }

    /// Finishes a drag. Returns the new annotation if the range was long
    /// enough; gestures that arrive while marking is off are dropped.
    pub fn complete_gesture(&mut self, start: f64, end: f64) -> Option<Annotation> {
        if !self.is_marking() {
            log::debug!("Ignoring gesture while marking is off");
            return None;
        }
        self.preview = None;
        self.state = MarkingState::Committed;
        self.create_annotation(start, end)
    }

    pub fn create_annotation(&mut self, start: f64, end: f64) -> Option<Annotation> {
        let (start, end) = self.clamp(start, end).ok()?;
        if end - start < self.min_length {
            log::debug!("Ignoring {:.3}s selection below minimum", end - start);
            return None;
        }
        Some(self.insert(AnnotationId::generate(), start, end))
    }

    /// Inserts an annotation under a caller-chosen id. Re-adopting a known id
    /// returns `None` and leaves the list untouched.
    pub fn adopt_annotation(&mut self, id: AnnotationId, start: f64, end: f64) -> Option<Annotation> {
        if self.get(&id).is_some() {
            return None;
        }
        let (start, end) = self.clamp(start, end).ok()?;
        if end - start < self.min_length {
            return None;
        }
        Some(self.insert(id, start, end))
    }

    pub fn resize_annotation(
        &mut self,
        id: &AnnotationId,
        start: f64,
        end: f64,
    ) -> Result<Annotation, AnnotationError> {
        let (start, end) = self.clamp(start, end)?;
        let annotation = self
            .annotations
            .iter_mut()
            .find(|a| a.id() == id)
            .ok_or_else(|| AnnotationError::UnknownAnnotation(id.clone()))?;
        annotation.set_bounds(start, end);
        let annotation = annotation.clone();
        if let Some(row) = self.review_log.get_mut(id) {
            row.retime(&annotation);
        }
        Ok(annotation)
    }

    pub fn edit_log_row(&mut self, id: &AnnotationId, patch: RowPatch) -> Result<(), AnnotationError> {
        let row = self
            .review_log
            .get_mut(id)
            .ok_or_else(|| AnnotationError::UnknownAnnotation(id.clone()))?;
        row.apply(patch);
        Ok(())
    }

    pub fn next_color(&self) -> ColorTag {
        ColorTag::from_palette(self.annotations.len())
    }

    pub fn annotations(&self) -> &[Annotation] {
        &self.annotations
    }

    pub fn get(&self, id: &AnnotationId) -> Option<&Annotation> {
        self.annotations.iter().find(|a| a.id() == id)
    }

    pub fn review_log(&self) -> &ReviewLog {
        &self.review_log
    }

    pub fn len(&self) -> usize {
        self.annotations.len()
    }

    pub fn is_empty(&self) -> bool {
        self.annotations.is_empty()
    }

    /// Brings the overlay in line with the authoritative list: drops regions
    /// the list does not know, moves regions whose bounds drifted, and adds
    /// the missing ones. Regions already in sync are left alone.
    pub fn reconcile(&self, overlay: &mut dyn OverlayRenderer) -> ReconcileStats {
        let mut stats = ReconcileStats::default();
        let drawn = overlay.list_annotations();

        for region in &drawn {
            if self.get(&region.id).is_none() {
                overlay.remove_annotation(&region.id);
                stats.removed += 1;
            }
        }

        let mut seen: HashSet<&AnnotationId> = HashSet::new();
        for annotation in &self.annotations {
            if !seen.insert(annotation.id()) {
                continue;
            }
            match drawn.iter().find(|r| &r.id == annotation.id()) {
                Some(region) => {
                    if region.start != annotation.start() || region.end != annotation.end() {
                        overlay.update_annotation(annotation.id(), annotation.start(), annotation.end());
                        stats.updated += 1;
                    }
                }
                None => {
                    overlay.add_annotation(
                        annotation.id(),
                        annotation.start(),
                        annotation.end(),
                        annotation.color_tag(),
                    );
                    stats.added += 1;
                }
            }
        }
        stats
    }

    /// Forgets every annotation and row and turns marking off.
    pub fn reset(&mut self) {
        self.annotations.clear();
        self.review_log.clear();
        self.preview = None;
        self.duration = 0.0;
        self.state = MarkingState::Idle;
    }

    fn insert(&mut self, id: AnnotationId, start: f64, end: f64) -> Annotation {
        let annotation = Annotation::new(id, start, end, self.next_color());
        self.review_log.push(ReviewLogRow::for_annotation(&annotation));
        self.annotations.push(annotation.clone());
        annotation
    }

    fn clamp(&self, start: f64, end: f64) -> Result<(f64, f64), AnnotationError> {
        if !start.is_finite() || !end.is_finite() {
            return Err(AnnotationError::InvalidBounds { start, end });
        }
        let (lo, hi) = (start.min(end), start.max(end));
        let start = lo.max(0.0);
        let end = hi.max(start);
        if self.duration > 0.0 {
            let start = start.min(self.duration);
            Ok((start, end.min(self.duration).max(start)))
        } else {
            Ok((start, end))
        }
    }
}
