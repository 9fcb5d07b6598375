use crate::shared::timecode::format_timecode;

use super::speech_recognizer::RecognizerOutput;
use super::transcription_error::TranscriptionError;

/// Renders recognizer output as transcript text, one `[MM:SS.mmm] text`
/// entry per chunk separated by blank lines.
pub fn format_output(output: RecognizerOutput) -> Result<String, TranscriptionError> {
    match output {
        RecognizerOutput::Chunks(chunks) if !chunks.is_empty() => Ok(chunks
            .iter()
            .filter_map(|c| {
                let text = c.text.trim();
                if text.is_empty() {
                    None
                } else {
                    Some(format!("[{}] {text}", format_timecode(c.start.unwrap_or(0.0))))
                }
            })
            .collect::<Vec<_>>()
            .join("\n\n")),
        RecognizerOutput::Text(text) => Ok(format!("[00:00.000] {}", text.trim())),
        _ => Err(TranscriptionError::NoOutput),
    }
}
