use super::audio_segment::AudioSegment;

/// One recognized span. `start` is absent when the recognizer could not
/// place it in time.
#[derive(Debug, Clone, PartialEq)]
pub struct TranscriptChunk {
    pub start: Option<f64>,
    pub text: String,
}

#[derive(Debug, Clone, PartialEq)]
pub enum RecognizerOutput {
    Chunks(Vec<TranscriptChunk>),
    Text(String),
    Empty,
}

/// Domain interface for speech-to-text.
///
/// Receives mono PCM at the transcription sample rate. Called from a worker
/// thread, so implementations must be shareable.
pub trait SpeechRecognizer: Send + Sync {
    fn transcribe(&self, audio: &AudioSegment) -> Result<RecognizerOutput, Box<dyn std::error::Error>>;
}
