use std::sync::Arc;
use std::thread;
use std::time::{Duration, Instant};

use crossbeam_channel::{Receiver, RecvTimeoutError, TryRecvError};

use crate::transcription::domain::audio_segment::AudioSegment;
use crate::transcription::domain::speech_recognizer::SpeechRecognizer;
use crate::transcription::domain::transcript_formatter::format_output;
use crate::transcription::domain::transcription_error::TranscriptionError;
use crate::transcription::domain::transcription_ticket::{TranscriptionOutcome, TranscriptionTicket};

/// Time allowed for a file of the given size.
pub fn timeout_for_size(size_mb: f64) -> Duration {
    if size_mb > 50.0 {
        Duration::from_secs(120)
    } else if size_mb > 20.0 {
        Duration::from_secs(90)
    } else {
        Duration::from_secs(60)
    }
}

/// Handle to a running background transcription.
pub struct TranscriptionJob {
    ticket: TranscriptionTicket,
    rx: Receiver<Result<String, TranscriptionError>>,
    deadline: Instant,
    settled: bool,
}

impl TranscriptionJob {
    pub fn ticket(&self) -> &TranscriptionTicket {
        &self.ticket
    }

    /// Blocks until the worker reports or the deadline passes.
    pub fn wait(self) -> TranscriptionOutcome {
        let result = match self.rx.recv_deadline(self.deadline) {
            Ok(result) => result,
            Err(RecvTimeoutError::Timeout) => Err(TranscriptionError::Timeout),
            Err(RecvTimeoutError::Disconnected) => Err(self.disconnected()),
        };
        TranscriptionOutcome {
            ticket: self.ticket,
            result,
        }
    }

    /// Non-blocking check. `None` while the worker is still running and the
    /// deadline has not passed, and on every call after an outcome was
    /// returned.
    pub fn try_poll(&mut self) -> Option<TranscriptionOutcome> {
        if self.settled {
            return None;
        }
        let result = match self.rx.try_recv() {
            Ok(result) => result,
            Err(TryRecvError::Disconnected) => Err(self.disconnected()),
            Err(TryRecvError::Empty) if Instant::now() >= self.deadline => Err(TranscriptionError::Timeout),
            Err(TryRecvError::Empty) => return None,
        };
        self.settled = true;
        Some(TranscriptionOutcome {
            ticket: self.ticket.clone(),
            result,
        })
    }

    fn disconnected(&self) -> TranscriptionError {
        if self.ticket.is_aborted() {
            TranscriptionError::Cancelled
        } else {
            TranscriptionError::WorkerDisconnected
        }
    }
}

/// Spawn a background transcription with the size-based timeout.
pub fn spawn(
    recognizer: Arc<dyn SpeechRecognizer>,
    audio: AudioSegment,
    size_mb: f64,
    ticket: TranscriptionTicket,
) -> TranscriptionJob {
    spawn_with_timeout(recognizer, audio, timeout_for_size(size_mb), ticket)
}

pub fn spawn_with_timeout(
    recognizer: Arc<dyn SpeechRecognizer>,
    audio: AudioSegment,
    timeout: Duration,
    ticket: TranscriptionTicket,
) -> TranscriptionJob {
    let (tx, rx) = crossbeam_channel::bounded::<Result<String, TranscriptionError>>(1);
    let abort = ticket.abort_flag();
    let generation = ticket.generation();

    thread::spawn(move || {
        let prepared = audio.for_recognition();
        log::info!(
            "Transcribing {:.1}s of audio (generation {generation})",
            prepared.duration()
        );
        let result = match recognizer.transcribe(&prepared) {
            Ok(output) => format_output(output),
            Err(e) => Err(TranscriptionError::Recognizer(e.to_string())),
        };
        if abort.load(std::sync::atomic::Ordering::Relaxed) {
            log::debug!("Dropping result for aborted generation {generation}");
            return;
        }
        let _ = tx.send(result);
    });

    TranscriptionJob {
        ticket,
        rx,
        deadline: Instant::now() + timeout,
        settled: false,
    }
}
