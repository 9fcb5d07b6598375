use serde::{Deserialize, Serialize};

use crate::shared::timecode::format_timecode;

use super::annotation::{Annotation, AnnotationId};
use super::color_tag::ColorTag;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Category {
    #[serde(rename = "SFX")]
    Sfx,
    Music,
    Dialogue,
}

impl Category {
    pub const ALL: &[Category] = &[Category::Sfx, Category::Music, Category::Dialogue];
}

impl std::fmt::Display for Category {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Category::Sfx => write!(f, "SFX"),
            Category::Music => write!(f, "Music"),
            Category::Dialogue => write!(f, "Dialogue"),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Urgency {
    #[serde(rename = "MUST FIX")]
    MustFix,
    #[serde(rename = "Can be fixed")]
    CanBeFixed,
    #[serde(rename = "Good job")]
    GoodJob,
}

impl Urgency {
    pub const ALL: &[Urgency] = &[Urgency::MustFix, Urgency::CanBeFixed, Urgency::GoodJob];
}

impl std::fmt::Display for Urgency {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Urgency::MustFix => write!(f, "MUST FIX"),
            Urgency::CanBeFixed => write!(f, "Can be fixed"),
            Urgency::GoodJob => write!(f, "Good job"),
        }
    }
}

/// Fields a reviewer may edit on a log row. `None` leaves a field as is.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RowPatch {
    pub category: Option<Category>,
    pub urgency: Option<Urgency>,
    pub feedback: Option<String>,
}

/// Tabular counterpart of one annotation.
///
/// Timecodes mirror the annotation's current bounds. Category, urgency and
/// feedback belong to the row alone and never flow back to the annotation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReviewLogRow {
    id: AnnotationId,
    start_timecode: String,
    end_timecode: String,
    category: Category,
    urgency: Urgency,
    feedback: String,
    color_tag: ColorTag,
}

impl ReviewLogRow {
    pub(crate) fn for_annotation(annotation: &Annotation) -> Self {
        Self {
            id: annotation.id().clone(),
            start_timecode: format_timecode(annotation.start()),
            end_timecode: format_timecode(annotation.end()),
            category: Category::Dialogue,
            urgency: Urgency::CanBeFixed,
            feedback: String::new(),
            color_tag: annotation.color_tag().clone(),
        }
    }

    pub fn id(&self) -> &AnnotationId {
        &self.id
    }

    pub fn start_timecode(&self) -> &str {
        &self.start_timecode
    }

    pub fn end_timecode(&self) -> &str {
        &self.end_timecode
    }

    pub fn category(&self) -> Category {
        self.category
    }

    pub fn urgency(&self) -> Urgency {
        self.urgency
    }

    pub fn feedback(&self) -> &str {
        &self.feedback
    }

    pub fn color_tag(&self) -> &ColorTag {
        &self.color_tag
    }

    pub(crate) fn retime(&mut self, annotation: &Annotation) {
        self.start_timecode = format_timecode(annotation.start());
        self.end_timecode = format_timecode(annotation.end());
    }

    pub(crate) fn apply(&mut self, patch: RowPatch) {
        if let Some(category) = patch.category {
            self.category = category;
        }
        if let Some(urgency) = patch.urgency {
            self.urgency = urgency;
        }
        if let Some(feedback) = patch.feedback {
            self.feedback = feedback;
        }
    }
}

/// Rows in annotation-creation order.
#[derive(Debug, Clone, Default)]
pub struct ReviewLog {
    rows: Vec<ReviewLogRow>,
}

impl ReviewLog {
    pub fn rows(&self) -> &[ReviewLogRow] {
        &self.rows
    }

    pub fn get(&self, id: &AnnotationId) -> Option<&ReviewLogRow> {
        self.rows.iter().find(|r| &r.id == id)
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub(crate) fn get_mut(&mut self, id: &AnnotationId) -> Option<&mut ReviewLogRow> {
        self.rows.iter_mut().find(|r| &r.id == id)
    }

    pub(crate) fn push(&mut self, row: ReviewLogRow) {
        self.rows.push(row);
    }

    pub(crate) fn clear(&mut self) {
        self.rows.clear();
    }
}
