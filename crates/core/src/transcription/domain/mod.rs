pub mod audio_segment;
pub mod speech_recognizer;
pub mod transcript_formatter;
pub mod transcription_error;
pub mod transcription_ticket;
