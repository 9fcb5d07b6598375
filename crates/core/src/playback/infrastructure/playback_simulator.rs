use crate::playback::domain::audio_transport::AudioTransport;
use crate::session::session_event::SessionEvent;

/// Virtual-clock [`AudioTransport`] for headless replays and tests.
///
/// Behaves like a media element with a known duration: commands change the
/// playhead and queue the transport events a real player would emit. The
/// host drains them with [`take_events`](PlaybackSimulator::take_events)
/// and dispatches them to the session in order.
pub struct PlaybackSimulator {
    source_duration: f64,
    fail_decode: bool,
    source: Option<String>,
    ready: bool,
    duration: f64,
    position: f64,
    playing: bool,
    volume: f64,
    events: Vec<SessionEvent>,
}

impl PlaybackSimulator {
    /// A transport whose next loaded source decodes to `duration` seconds.
    pub fn new(duration: f64) -> Self {
        Self {
            source_duration: duration.max(0.0),
            fail_decode: false,
            source: None,
            ready: false,
            duration: 0.0,
            position: 0.0,
            playing: false,
            volume: 0.7,
            events: Vec::new(),
        }
    }

    /// A transport whose loads always fail to decode.
    pub fn failing() -> Self {
        Self {
            fail_decode: true,
            ..Self::new(0.0)
        }
    }

    pub fn is_playing(&self) -> bool {
        self.playing
    }

    pub fn volume(&self) -> f64 {
        self.volume
    }

    pub fn source(&self) -> Option<&str> {
        self.source.as_deref()
    }

    /// Moves the playhead forward by `secs` of playback, if playing.
    ///
    /// Emits a time update, and a pause when the end of the file is reached.
    pub fn advance(&mut self, secs: f64) {
        if !self.playing || secs <= 0.0 {
            return;
        }
        self.position = (self.position + secs).min(self.duration);
        self.events.push(SessionEvent::TimeUpdate {
            position: self.position,
        });
        if self.position >= self.duration {
            self.playing = false;
            self.events.push(SessionEvent::Pause {
                position: self.position,
            });
        }
    }

    /// Absolute seek, as from a click on the waveform.
    pub fn seek_to(&mut self, position: f64) {
        if !self.ready {
            return;
        }
        self.position = position.clamp(0.0, self.duration);
        self.events.push(SessionEvent::Seeked {
            position: self.position,
        });
        self.events.push(SessionEvent::TimeUpdate {
            position: self.position,
        });
    }

    pub fn take_events(&mut self) -> Vec<SessionEvent> {
        std::mem::take(&mut self.events)
    }
}

impl AudioTransport for PlaybackSimulator {
    fn load(&mut self, source: &str) {
        self.source = Some(source.to_string());
        self.ready = false;
        self.playing = false;
        self.position = 0.0;
        self.duration = 0.0;
        self.events.push(SessionEvent::FileLoaded {
            source: source.to_string(),
        });
        if self.fail_decode || self.source_duration <= 0.0 {
            self.events.push(SessionEvent::TransportError {
                message: format!("failed to decode {source}"),
            });
            return;
        }
        self.ready = true;
        self.duration = self.source_duration;
        self.events.push(SessionEvent::Ready {
            duration: self.duration,
        });
    }

    fn play_pause(&mut self) {
        if !self.ready {
            return;
        }
        if self.playing {
            self.playing = false;
            self.events.push(SessionEvent::Pause {
                position: self.position,
            });
        } else if self.position < self.duration {
            self.playing = true;
            self.events.push(SessionEvent::Play {
                position: self.position,
            });
        }
    }

    fn skip(&mut self, seconds: f64) {
        self.seek_to(self.position + seconds);
    }

    fn set_volume(&mut self, volume: f64) {
        self.volume = volume.clamp(0.0, 1.0);
    }

    fn current_time(&self) -> f64 {
        self.position
    }

    fn duration(&self) -> f64 {
        self.duration
    }
}
