use crate::annotation::domain::annotation::AnnotationId;
use crate::annotation::domain::review_log::RowPatch;
use crate::playback::domain::sample_timer::TimerId;
use crate::transcription::domain::transcription_ticket::TranscriptionOutcome;

/// Everything the review session reacts to, from every collaborator.
///
/// Hosts translate their native callbacks into these and feed them to
/// [`ReviewSession::dispatch`](super::review_session::ReviewSession::dispatch)
/// one at a time, in arrival order.
#[derive(Debug, Clone)]
pub enum SessionEvent {
    // Transport
    FileLoaded { source: String },
    Ready { duration: f64 },
    TransportError { message: String },
    Play { position: f64 },
    Pause { position: f64 },
    TimeUpdate { position: f64 },
    Seeked { position: f64 },
    SampleTick { timer: TimerId, position: f64 },
    Teardown,

    // Overlay and marking
    MarkingModeChanged { enabled: bool },
    GestureStarted,
    GesturePreview { start: f64, end: f64 },
    AnnotationCreated { start: f64, end: f64 },
    AnnotationAdopted { id: AnnotationId, start: f64, end: f64 },
    GestureEnd { id: AnnotationId, start: f64, end: f64 },

    // Review log and text panes
    LogRowEdited { id: AnnotationId, patch: RowPatch },
    ScriptChanged { text: String },
    TranscriptChanged { text: String },
    TranscriptionFinished(TranscriptionOutcome),
}
