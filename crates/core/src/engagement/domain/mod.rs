pub mod coverage;
pub mod coverage_tracker;
pub mod engagement_log;
pub mod engagement_payload;
pub mod listener_score;
