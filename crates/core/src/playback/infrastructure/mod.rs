pub mod manual_sample_timer;
pub mod playback_simulator;
