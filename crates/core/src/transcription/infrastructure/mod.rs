pub mod canned_recognizer;
pub mod transcription_worker;
