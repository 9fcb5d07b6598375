/// Identifies one arming of a [`SampleTimer`].
///
/// Ids are never reused, so a tick carrying an old id can be told apart
/// from a tick of the currently armed timer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
pub struct TimerId(pub u64);

/// Host-provided repeating timer used for play-position sampling.
///
/// `arm` starts a timer that fires every `period_secs` until `disarm` is
/// called with the same id. Each firing is delivered back to the session as
/// a `SampleTick` event carrying the id.
pub trait SampleTimer {
    fn arm(&mut self, period_secs: f64) -> TimerId;
    fn disarm(&mut self, id: TimerId);
}
