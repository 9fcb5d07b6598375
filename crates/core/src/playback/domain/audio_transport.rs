/// Domain interface for the host's audio player.
///
/// Decoding, output and waveform drawing live behind this trait; the review
/// engine only issues commands and reads the clock. Transport events
/// (play, pause, time updates, ready, error) reach the engine as
/// [`crate::session::session_event::SessionEvent`]s.
pub trait AudioTransport {
    fn load(&mut self, source: &str);
    fn play_pause(&mut self);
    /// Relative seek in seconds; negative values skip back.
    fn skip(&mut self, seconds: f64);
    fn set_volume(&mut self, volume: f64);
    fn current_time(&self) -> f64;
    fn duration(&self) -> f64;
}
