use serde::{Deserialize, Serialize};

use super::coverage::{covered_seconds, merge_play_samples};
use super::engagement_log::{EngagementLog, EngagementLogEntry};
use super::listener_score::ListenerScoreCalculator;

/// Engagement snapshot in the shape the external store expects.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EngagementPayload {
    pub play_segments: Vec<f64>,
    pub engagement_logs: Vec<EngagementLogEntry>,
    pub unique_seconds_played: f64,
    pub total_duration_seconds: f64,
    pub total_marks: usize,
    pub listener_score: f64,
}

impl EngagementPayload {
    /// Derives every computed field from the raw samples and the log.
    pub fn build(samples: &[f64], window: f64, log: &EngagementLog, duration: f64) -> Self {
        let intervals = merge_play_samples(samples, window);
        let unique_seconds_played = covered_seconds(&intervals, duration);
        let total_marks = log.mark_count();
        Self {
            play_segments: samples.to_vec(),
            engagement_logs: log.entries().to_vec(),
            unique_seconds_played,
            total_duration_seconds: duration.max(0.0),
            total_marks,
            listener_score: ListenerScoreCalculator::score(
                unique_seconds_played,
                duration,
                total_marks,
            ),
        }
    }

    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string(self)
    }

    pub fn to_json_pretty(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engagement::domain::engagement_log::EngagementEventType;
    use approx::assert_relative_eq;

    #[test]
    fn test_build_computes_score_and_marks() {
        let mut log = EngagementLog::new();
        log.record(EngagementEventType::Mark, 10, 2.0, None);
        log.record(EngagementEventType::Pause, 20, 15.0, None);
        let payload = EngagementPayload::build(&[5.0, 10.0, 15.0], 5.0, &log, 30.0);
        assert_relative_eq!(payload.unique_seconds_played, 15.0);
        assert_eq!(payload.total_marks, 1);
        assert_relative_eq!(payload.listener_score, 0.6, epsilon = 1e-9);
        assert_eq!(payload.engagement_logs.len(), 2);
    }

    #[test]
    fn test_zero_duration_score_is_mark_bonus_only() {
        let mut log = EngagementLog::new();
        log.record(EngagementEventType::Mark, 0, 1.0, None);
        log.record(EngagementEventType::Mark, 0, 2.0, None);
        let payload = EngagementPayload::build(&[5.0, 10.0], 5.0, &log, 0.0);
        assert_relative_eq!(payload.listener_score, 0.2, epsilon = 1e-9);
        assert_relative_eq!(payload.unique_seconds_played, 0.0);
    }

    #[test]
    fn test_json_field_names() {
        let payload = EngagementPayload::build(&[5.0], 5.0, &EngagementLog::new(), 10.0);
        let json: serde_json::Value = serde_json::from_str(&payload.to_json().unwrap()).unwrap();
        for key in [
            "playSegments",
            "engagementLogs",
            "uniqueSecondsPlayed",
            "totalDurationSeconds",
            "totalMarks",
            "listenerScore",
        ] {
            assert!(json.get(key).is_some(), "missing {key}");
        }
        assert_eq!(json["playSegments"][0], 5.0);
    }
}
