use std::sync::LazyLock;

use regex::Regex;

use crate::shared::timecode::tag_fields_to_seconds;

use super::transcript_segment::TranscriptSegment;

/// `[M:SS.mm]` through `[MM:SS.mmm]`, then the line text.
static LINE_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^\[([0-9]{1,2}):([0-9]{2})\.([0-9]{2,3})\]\s*(.*)$").expect("valid transcript regex")
});

/// Ordered transcript segments with a playback-time lookup.
///
/// Segments keep source order. Timestamps are assumed to increase down the
/// file but this is not enforced, and nothing is re-sorted.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TranscriptIndex {
    segments: Vec<TranscriptSegment>,
}

impl TranscriptIndex {
    /// Parses `[MM:SS.mmm] text` lines.
    ///
    /// Lines that don't match, and matching lines with no text, are dropped
    /// silently. Blank lines between entries are allowed.
    pub fn parse(text: &str) -> Self {
        if text.trim().is_empty() {
            return Self::default();
        }
        Self {
            segments: parse_tagged_lines(text.lines(), "seg"),
        }
    }

    /// Parses a reference script for synchronized scrolling.
    ///
    /// If any line carries a timestamp tag, only the tagged lines are used.
    /// Otherwise the non-blank lines are spread evenly across `duration`;
    /// an unknown duration yields no segments.
    pub fn parse_script_segments(script: &str, duration: f64) -> Self {
        let lines: Vec<&str> = script
            .lines()
            .map(str::trim)
            .filter(|l| !l.is_empty())
            .collect();
        if lines.is_empty() {
            return Self::default();
        }

        if lines.iter().any(|l| LINE_RE.is_match(l)) {
            return Self {
                segments: parse_tagged_lines(lines.into_iter(), "script"),
            };
        }

        if duration <= 0.0 {
            return Self::default();
        }
        let step = duration / lines.len() as f64;
        let segments = lines
            .into_iter()
            .enumerate()
            .map(|(i, text)| TranscriptSegment {
                id: format!("script-{i}"),
                start_time: i as f64 * step,
                text: text.to_string(),
            })
            .collect();
        Self { segments }
    }

    pub fn segments(&self) -> &[TranscriptSegment] {
        &self.segments
    }

    pub fn len(&self) -> usize {
        self.segments.len()
    }

    pub fn is_empty(&self) -> bool {
        self.segments.is_empty()
    }

    /// Index of the segment to highlight at playback time `t`.
    ///
    /// Scans from the end for the last segment starting at or before `t`.
    /// Before the first segment (or with no segments) this is 0; past the
    /// last start it stays on the last segment.
    pub fn active_index(&self, t: f64) -> usize {
        self.segments
            .iter()
            .rposition(|s| t >= s.start_time)
            .unwrap_or(0)
    }

    pub fn active_segment(&self, t: f64) -> Option<&TranscriptSegment> {
        self.segments.get(self.active_index(t))
    }

    /// Start of the following segment; `None` for the last one.
    pub fn segment_end(&self, index: usize) -> Option<f64> {
        self.segments.get(index + 1).map(|s| s.start_time)
    }

    /// Whether `t` falls inside segment `index`, i.e. at or after its start
    /// and before the next segment's start.
    pub fn contains_time(&self, index: usize, t: f64) -> bool {
        let Some(segment) = self.segments.get(index) else {
            return false;
        };
        let end = self.segment_end(index).unwrap_or(f64::INFINITY);
        t >= segment.start_time && t < end
    }
}

fn parse_tagged_lines<'a>(
    lines: impl Iterator<Item = &'a str>,
    id_prefix: &str,
) -> Vec<TranscriptSegment> {
    let mut segments = Vec::new();
    for line in lines {
        let Some(caps) = LINE_RE.captures(line) else {
            continue;
        };
        let text = caps[4].trim();
        if text.is_empty() {
            continue;
        }
        let (Ok(minutes), Ok(seconds)) = (caps[1].parse::<u32>(), caps[2].parse::<u32>()) else {
            continue;
        };
        segments.push(TranscriptSegment {
            id: format!("{id_prefix}-{}", segments.len()),
            start_time: tag_fields_to_seconds(minutes, seconds, &caps[3]),
            text: text.to_string(),
        });
    }
    segments
}
