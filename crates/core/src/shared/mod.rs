pub mod clock;
pub mod constants;
pub mod settings;
pub mod timecode;
