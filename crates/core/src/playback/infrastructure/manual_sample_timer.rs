use crate::playback::domain::sample_timer::{SampleTimer, TimerId};

struct ArmedTimer {
    id: TimerId,
    period: f64,
    elapsed: f64,
}

/// [`SampleTimer`] driven by explicitly elapsed virtual time.
///
/// Used for headless replays and tests: the host calls [`elapse`] as its
/// virtual clock moves and forwards every returned id as a tick. Every
/// armed timer is tracked separately, so a timer that was never disarmed
/// keeps firing and shows up in [`armed_count`].
///
/// [`elapse`]: ManualSampleTimer::elapse
/// [`armed_count`]: ManualSampleTimer::armed_count
#[derive(Default)]
pub struct ManualSampleTimer {
    next_id: u64,
    armed: Vec<ArmedTimer>,
}

impl ManualSampleTimer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn armed_count(&self) -> usize {
        self.armed.len()
    }

    pub fn is_armed(&self, id: TimerId) -> bool {
        self.armed.iter().any(|t| t.id == id)
    }

    /// Advances every armed timer by `secs` and returns the ids that fired,
    /// one entry per completed period, in firing order.
    pub fn elapse(&mut self, secs: f64) -> Vec<TimerId> {
        let mut fired = Vec::new();
        if secs <= 0.0 {
            return fired;
        }
        for timer in &mut self.armed {
            timer.elapsed += secs;
            while timer.elapsed + 1e-9 >= timer.period {
                timer.elapsed -= timer.period;
                fired.push(timer.id);
            }
        }
        fired
    }
}

impl SampleTimer for ManualSampleTimer {
    fn arm(&mut self, period_secs: f64) -> TimerId {
        self.next_id += 1;
        let id = TimerId(self.next_id);
        self.armed.push(ArmedTimer {
            id,
            period: period_secs.max(f64::EPSILON),
            elapsed: 0.0,
        });
        id
    }

    fn disarm(&mut self, id: TimerId) {
        self.armed.retain(|t| t.id != id);
    }
}
