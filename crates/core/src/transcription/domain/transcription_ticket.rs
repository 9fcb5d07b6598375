use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use super::transcription_error::TranscriptionError;

/// Identifies one transcription request against the file that was loaded
/// when it was issued.
///
/// The abort flag is shared with the worker. Only the session sets it: when
/// the file is replaced, the session is torn down, or the request resolves.
#[derive(Debug, Clone)]
pub struct TranscriptionTicket {
    generation: u64,
    abort: Arc<AtomicBool>,
}

impl TranscriptionTicket {
    pub fn new(generation: u64) -> Self {
        Self {
            generation,
            abort: Arc::new(AtomicBool::new(false)),
        }
    }

    pub fn generation(&self) -> u64 {
        self.generation
    }

    pub fn abort(&self) {
        self.abort.store(true, Ordering::Relaxed);
    }

    pub fn is_aborted(&self) -> bool {
        self.abort.load(Ordering::Relaxed)
    }

    /// True for clones of the same request.
    pub fn is_same(&self, other: &TranscriptionTicket) -> bool {
        Arc::ptr_eq(&self.abort, &other.abort)
    }

    pub fn abort_flag(&self) -> Arc<AtomicBool> {
        Arc::clone(&self.abort)
    }
}

/// Result of a finished (or failed) transcription, still tagged with its
/// ticket so the session can decide whether it is stale.
#[derive(Debug, Clone)]
pub struct TranscriptionOutcome {
    pub ticket: TranscriptionTicket,
    pub result: Result<String, TranscriptionError>,
}
