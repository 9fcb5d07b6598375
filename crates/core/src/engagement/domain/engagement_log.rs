use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum EngagementEventType {
    #[serde(rename = "pause")]
    Pause,
    #[serde(rename = "skip_back_5")]
    SkipBack5,
    #[serde(rename = "skip_back_10")]
    SkipBack10,
    #[serde(rename = "skip_forward_5")]
    SkipForward5,
    #[serde(rename = "skip_forward_10")]
    SkipForward10,
    #[serde(rename = "volume_change")]
    VolumeChange,
    #[serde(rename = "mark")]
    Mark,
}

/// The four fixed skip buttons of the transport bar.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SkipAmount {
    Back10,
    Back5,
    Forward5,
    Forward10,
}

impl SkipAmount {
    pub fn seconds(self) -> f64 {
        match self {
            SkipAmount::Back10 => -10.0,
            SkipAmount::Back5 => -5.0,
            SkipAmount::Forward5 => 5.0,
            SkipAmount::Forward10 => 10.0,
        }
    }

    pub fn event_type(self) -> EngagementEventType {
        match self {
            SkipAmount::Back10 => EngagementEventType::SkipBack10,
            SkipAmount::Back5 => EngagementEventType::SkipBack5,
            SkipAmount::Forward5 => EngagementEventType::SkipForward5,
            SkipAmount::Forward10 => EngagementEventType::SkipForward10,
        }
    }

    /// Maps a button offset in seconds back to its amount.
    pub fn from_seconds(seconds: f64) -> Option<Self> {
        [
            SkipAmount::Back10,
            SkipAmount::Back5,
            SkipAmount::Forward5,
            SkipAmount::Forward10,
        ]
        .into_iter()
        .find(|a| (a.seconds() - seconds).abs() < f64::EPSILON)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EngagementLogEntry {
    #[serde(rename = "type")]
    pub kind: EngagementEventType,
    /// Wall-clock time in Unix epoch milliseconds.
    pub timestamp: i64,
    pub playback_time: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub value: Option<f64>,
}

/// Append-only audit trail of listener interactions for one loaded file.
///
/// Entries keep dispatch order whether they came from a timer, a transport
/// event or a direct user action. Nothing is edited or removed; the log is
/// only cleared when a new file replaces the current one.
#[derive(Debug, Default, Clone)]
pub struct EngagementLog {
    entries: Vec<EngagementLogEntry>,
}

impl EngagementLog {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn record(
        &mut self,
        kind: EngagementEventType,
        timestamp: i64,
        playback_time: f64,
        value: Option<f64>,
    ) {
        self.entries.push(EngagementLogEntry {
            kind,
            timestamp,
            playback_time,
            value,
        });
    }

    pub fn entries(&self) -> &[EngagementLogEntry] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn count(&self, kind: EngagementEventType) -> usize {
        self.entries.iter().filter(|e| e.kind == kind).count()
    }

    pub fn mark_count(&self) -> usize {
        self.count(EngagementEventType::Mark)
    }

    pub(crate) fn clear(&mut self) {
        self.entries.clear();
    }
}
