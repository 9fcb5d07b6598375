use serde::{Deserialize, Serialize};

/// One timestamped line of a transcript or script.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TranscriptSegment {
    pub id: String,
    /// Seconds from the start of the audio.
    pub start_time: f64,
    pub text: String,
}
