use std::sync::LazyLock;

use regex::Regex;
use serde::{Deserialize, Serialize};

use crate::shared::constants::{ANNOTATION_PALETTE, ROW_BACKGROUND_ALPHA, ROW_BACKGROUND_FALLBACK};

static RGB_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"rgba?\(([0-9]+),\s*([0-9]+),\s*([0-9]+)").expect("valid rgb regex"));

/// CSS colour string shared by an annotation and its review-log row.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ColorTag(String);

impl ColorTag {
    pub fn new(css: impl Into<String>) -> Self {
        Self(css.into())
    }

    /// Palette entry for the `n`th annotation, wrapping around.
    pub fn from_palette(n: usize) -> Self {
        Self(ANNOTATION_PALETTE[n % ANNOTATION_PALETTE.len()].to_string())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Same hue at low opacity, for tinting the matching log row.
    pub fn row_background(&self) -> String {
        match RGB_RE.captures(&self.0) {
            Some(caps) => format!(
                "rgba({},{},{},{ROW_BACKGROUND_ALPHA})",
                &caps[1], &caps[2], &caps[3]
            ),
            None => ROW_BACKGROUND_FALLBACK.to_string(),
        }
    }
}

impl std::fmt::Display for ColorTag {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}
