pub mod audio_transport;
pub mod sample_timer;
