use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum TranscriptionError {
    #[error("File too large for transcription ({size_mb:.1}MB > {limit_mb:.0}MB). Use a smaller file.")]
    FileTooLarge { size_mb: f64, limit_mb: f64 },
    #[error("Transcription timeout. Try a shorter file.")]
    Timeout,
    #[error("Transcription failed: {0}")]
    Recognizer(String),
    #[error("No transcription output received")]
    NoOutput,
    #[error("Transcription worker stopped unexpectedly")]
    WorkerDisconnected,
    #[error("Transcription cancelled")]
    Cancelled,
}
