use serde::{Deserialize, Serialize};

/// A half-open stretch `[start, end)` of audio estimated as heard.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CoverageInterval {
    pub start: f64,
    pub end: f64,
}

impl CoverageInterval {
    pub fn width(&self) -> f64 {
        self.end - self.start
    }
}

/// Merges raw play samples into sorted, non-overlapping intervals.
///
/// Each sample `t` stands for the trailing window `[max(0, t - window), t]`
/// covered since the previous sample. Windows are sorted by start and folded
/// in one pass: a window that starts at or before the current interval's end
/// extends it, anything later opens a new interval. Non-finite samples are
/// skipped and negative ones count as zero.
pub fn merge_play_samples(samples: &[f64], window: f64) -> Vec<CoverageInterval> {
    let mut sorted: Vec<f64> = samples
        .iter()
        .copied()
        .filter(|t| t.is_finite())
        .map(|t| t.max(0.0))
        .collect();
    sorted.sort_by(|a, b| a.total_cmp(b));

    let mut merged: Vec<CoverageInterval> = Vec::new();
    for t in sorted {
        let start = (t - window).max(0.0);
        match merged.last_mut() {
            Some(last) if start <= last.end => {
                last.end = last.end.max(t);
            }
            _ => merged.push(CoverageInterval { start, end: t }),
        }
    }
    merged
}

/// Total covered seconds, clamped to `[0, duration]`.
pub fn covered_seconds(intervals: &[CoverageInterval], duration: f64) -> f64 {
    let total: f64 = intervals.iter().map(CoverageInterval::width).sum();
    total.min(duration.max(0.0)).max(0.0)
}
