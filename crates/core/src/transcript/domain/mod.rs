pub mod script_cross_check;
pub mod transcript_index;
pub mod transcript_segment;
