use std::thread;
use std::time::Duration;

use crate::transcription::domain::audio_segment::AudioSegment;
use crate::transcription::domain::speech_recognizer::{RecognizerOutput, SpeechRecognizer, TranscriptChunk};

/// Recognizer that returns a fixed result, optionally after a delay.
/// Stands in for real inference in demos and tests.
pub struct CannedRecognizer {
    output: Result<RecognizerOutput, String>,
    delay: Duration,
}

impl CannedRecognizer {
    pub fn new(output: RecognizerOutput) -> Self {
        Self {
            output: Ok(output),
            delay: Duration::ZERO,
        }
    }

    pub fn failing(message: impl Into<String>) -> Self {
        Self {
            output: Err(message.into()),
            delay: Duration::ZERO,
        }
    }

    /// A short sample session transcript.
    pub fn demo() -> Self {
        let lines = [
            (0.0, "Hello and welcome to today's audio production quality control session."),
            (15.234, "The system performs real-time analysis of audio characteristics."),
            (32.567, "Automated transcription provides millisecond-accurate timestamps for every spoken segment."),
            (62.891, "Technical specifications are validated against broadcast standards."),
            (105.123, "Quality metrics include signal-to-noise ratio and peak level detection."),
            (138.456, "This concludes the demonstration transcript."),
        ];
        Self::new(RecognizerOutput::Chunks(
            lines
                .iter()
                .map(|(start, text)| TranscriptChunk {
                    start: Some(*start),
                    text: (*text).to_string(),
                })
                .collect(),
        ))
    }

    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = delay;
        self
    }
}

impl SpeechRecognizer for CannedRecognizer {
    fn transcribe(&self, _audio: &AudioSegment) -> Result<RecognizerOutput, Box<dyn std::error::Error>> {
        if !self.delay.is_zero() {
            thread::sleep(self.delay);
        }
        match &self.output {
            Ok(output) => Ok(output.clone()),
            Err(message) => Err(message.clone().into()),
        }
    }
}
