use crate::shared::constants::MARK_BONUS;

/// Composite engagement metric: coverage ratio plus a bonus per mark.
///
/// Formula: `min(1, covered / duration) + MARK_BONUS * marks`.
/// The coverage term is capped at 1, the mark bonus is not. When the
/// duration is unknown (`<= 0`) only the mark bonus counts.
pub struct ListenerScoreCalculator;

impl ListenerScoreCalculator {
    pub fn score(covered_seconds: f64, duration: f64, total_marks: usize) -> f64 {
        let mark_bonus = total_marks as f64 * MARK_BONUS;
        if duration <= 0.0 {
            return mark_bonus;
        }
        let coverage = (covered_seconds / duration).max(0.0);
        coverage.min(1.0) + mark_bonus
    }
}
