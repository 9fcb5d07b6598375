use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::color_tag::ColorTag;

#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct AnnotationId(String);

impl AnnotationId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn generate() -> Self {
        Self(format!("sel-{}", Uuid::new_v4()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for AnnotationId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

/// A reviewer-marked time range. The id and colour never change; only the
/// bounds move, and only through the sync engine.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Annotation {
    id: AnnotationId,
    start: f64,
    end: f64,
    color_tag: ColorTag,
}

impl Annotation {
    pub(crate) fn new(id: AnnotationId, start: f64, end: f64, color_tag: ColorTag) -> Self {
        Self {
            id,
            start,
            end,
            color_tag,
        }
    }

    pub fn id(&self) -> &AnnotationId {
        &self.id
    }

    pub fn start(&self) -> f64 {
        self.start
    }

    pub fn end(&self) -> f64 {
        self.end
    }

    pub fn color_tag(&self) -> &ColorTag {
        &self.color_tag
    }

    pub fn length(&self) -> f64 {
        self.end - self.start
    }

    pub fn midpoint(&self) -> f64 {
        (self.start + self.end) / 2.0
    }

    pub(crate) fn set_bounds(&mut self, start: f64, end: f64) {
        self.start = start;
        self.end = end;
    }
}
