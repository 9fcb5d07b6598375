use crate::playback::domain::sample_timer::{SampleTimer, TimerId};

use super::coverage::{covered_seconds, merge_play_samples, CoverageInterval};

/// Records where the playhead was, once per sampling period, while playing.
///
/// The sampling timer is armed on play and disarmed synchronously on pause,
/// seek and teardown. Ticks are accepted only from the currently armed
/// timer, so a late tick from a disarmed timer never adds a sample.
///
/// Alongside the coarse samples the tracker accumulates active play time:
/// the distance the playhead travelled while playing, summed per run.
pub struct CoverageTracker {
    period: f64,
    samples: Vec<f64>,
    armed: Option<TimerId>,
    playing: bool,
    run_start: f64,
    last_position: f64,
    active_play_time: f64,
}

impl CoverageTracker {
    pub fn new(period_secs: f64) -> Self {
        Self {
            period: period_secs,
            samples: Vec::new(),
            armed: None,
            playing: false,
            run_start: 0.0,
            last_position: 0.0,
            active_play_time: 0.0,
        }
    }

    pub fn period(&self) -> f64 {
        self.period
    }

    pub fn samples(&self) -> &[f64] {
        &self.samples
    }

    pub fn is_sampling(&self) -> bool {
        self.armed.is_some()
    }

    pub fn armed_timer(&self) -> Option<TimerId> {
        self.armed
    }

    pub fn active_play_time(&self) -> f64 {
        self.active_play_time
    }

    pub fn intervals(&self) -> Vec<CoverageInterval> {
        merge_play_samples(&self.samples, self.period)
    }

    pub fn covered_seconds(&self, duration: f64) -> f64 {
        covered_seconds(&self.intervals(), duration)
    }

    pub fn on_play(&mut self, position: f64, timer: &mut dyn SampleTimer) {
        self.playing = true;
        self.run_start = position;
        self.last_position = position;
        self.arm(timer);
    }

    pub fn on_pause(&mut self, position: f64, timer: &mut dyn SampleTimer) {
        self.disarm(timer);
        if self.playing {
            self.close_run(position);
        }
        self.playing = false;
        self.last_position = position;
    }

    pub fn on_time_update(&mut self, position: f64) {
        self.last_position = position;
    }

    /// Handles a jump of the playhead.
    ///
    /// The running timer is dropped immediately; if playback continues a
    /// fresh timer starts counting from the new position.
    pub fn on_seek(&mut self, position: f64, timer: &mut dyn SampleTimer) {
        self.disarm(timer);
        if self.playing {
            self.close_run(self.last_position);
            self.run_start = position;
            self.arm(timer);
        }
        self.last_position = position;
    }

    /// Records a sample if `id` belongs to the armed timer. Returns whether
    /// the sample was kept.
    pub fn on_tick(&mut self, id: TimerId, position: f64) -> bool {
        if !self.playing || self.armed != Some(id) {
            log::debug!("Ignoring stale sample tick {id:?}");
            return false;
        }
        self.last_position = position;
        self.samples.push(position);
        true
    }

    /// Stops sampling without touching recorded data.
    pub fn teardown(&mut self, timer: &mut dyn SampleTimer) {
        if self.playing {
            self.close_run(self.last_position);
        }
        self.disarm(timer);
        self.playing = false;
    }

    /// Stops sampling and forgets everything recorded for the current file.
    pub fn reset(&mut self, timer: &mut dyn SampleTimer) {
        self.disarm(timer);
        self.samples.clear();
        self.playing = false;
        self.run_start = 0.0;
        self.last_position = 0.0;
        self.active_play_time = 0.0;
    }

    fn arm(&mut self, timer: &mut dyn SampleTimer) {
        if self.armed.is_none() {
            self.armed = Some(timer.arm(self.period));
        }
    }

    fn disarm(&mut self, timer: &mut dyn SampleTimer) {
        if let Some(id) = self.armed.take() {
            timer.disarm(id);
        }
    }

    fn close_run(&mut self, position: f64) {
        self.active_play_time += (position - self.run_start).max(0.0);
        self.run_start = position;
    }
}
