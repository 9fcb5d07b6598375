pub mod annotation;
pub mod engagement;
pub mod playback;
pub mod session;
pub mod shared;
pub mod transcript;
pub mod transcription;
