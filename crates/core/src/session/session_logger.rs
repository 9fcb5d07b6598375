use std::collections::VecDeque;

use serde::{Deserialize, Serialize};

use crate::shared::clock::{SystemClock, WallClock};
use crate::shared::constants::CONSOLE_CAPACITY;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ConsoleKind {
    Log,
    Error,
    Milestone,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ConsoleStatus {
    Success,
    Processing,
    Error,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ConsoleEntry {
    pub id: u64,
    pub wall_ms: i64,
    pub message: String,
    pub kind: ConsoleKind,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub status: Option<ConsoleStatus>,
}

/// Sink for user-facing session diagnostics.
///
/// Injected into the session so hosts decide where messages go (a console
/// pane, the `log` facade, nowhere) without the session knowing.
pub trait SessionLogger {
    fn record(&mut self, message: &str, kind: ConsoleKind, status: Option<ConsoleStatus>);

    fn info(&mut self, message: &str) {
        self.record(message, ConsoleKind::Log, None);
    }

    fn error(&mut self, message: &str) {
        self.record(message, ConsoleKind::Error, Some(ConsoleStatus::Error));
    }

    fn milestone(&mut self, message: &str, status: ConsoleStatus) {
        self.record(message, ConsoleKind::Milestone, Some(status));
    }
}

/// Discards everything. For tests where output is irrelevant.
pub struct NullSessionLogger;

impl SessionLogger for NullSessionLogger {
    fn record(&mut self, _message: &str, _kind: ConsoleKind, _status: Option<ConsoleStatus>) {}
}

/// Keeps the most recent entries for display and mirrors them to `log`.
///
/// Once `capacity` entries are held, each new entry evicts the oldest.
pub struct ConsoleSessionLogger {
    capacity: usize,
    next_id: u64,
    entries: VecDeque<ConsoleEntry>,
    clock: Box<dyn WallClock>,
}

impl ConsoleSessionLogger {
    pub fn new(capacity: usize) -> Self {
        Self::with_clock(capacity, Box::new(SystemClock))
    }

    pub fn with_clock(capacity: usize, clock: Box<dyn WallClock>) -> Self {
        Self {
            capacity: capacity.max(1),
            next_id: 0,
            entries: VecDeque::new(),
            clock,
        }
    }

    pub fn entries(&self) -> impl Iterator<Item = &ConsoleEntry> {
        self.entries.iter()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn clear(&mut self) {
        self.entries.clear();
    }
}

impl Default for ConsoleSessionLogger {
    fn default() -> Self {
        Self::new(CONSOLE_CAPACITY)
    }
}

impl SessionLogger for ConsoleSessionLogger {
    fn record(&mut self, message: &str, kind: ConsoleKind, status: Option<ConsoleStatus>) {
        match kind {
            ConsoleKind::Error => log::error!("{message}"),
            ConsoleKind::Milestone => log::info!("{message}"),
            ConsoleKind::Log => log::debug!("{message}"),
        }
        self.next_id += 1;
        if self.entries.len() == self.capacity {
            self.entries.pop_front();
        }
        self.entries.push_back(ConsoleEntry {
            id: self.next_id,
            wall_ms: self.clock.now_ms(),
            message: message.to_string(),
            kind,
            status,
        });
    }
}
