use std::fs;
use std::path::{Path, PathBuf};

use serde::Deserialize;
use thiserror::Error;

use qc_portal_core::annotation::domain::review_log::{Category, ReviewLogRow, RowPatch, Urgency};
use qc_portal_core::annotation::infrastructure::in_memory_overlay::InMemoryOverlay;
use qc_portal_core::engagement::domain::engagement_log::SkipAmount;
use qc_portal_core::engagement::domain::engagement_payload::EngagementPayload;
use qc_portal_core::playback::domain::audio_transport::AudioTransport;
use qc_portal_core::playback::infrastructure::manual_sample_timer::ManualSampleTimer;
use qc_portal_core::playback::infrastructure::playback_simulator::PlaybackSimulator;
use qc_portal_core::session::review_session::{ReviewSession, SessionContext};
use qc_portal_core::session::session_event::SessionEvent;
use qc_portal_core::session::session_logger::{ConsoleEntry, ConsoleSessionLogger};
use qc_portal_core::shared::clock::WallClock;
use qc_portal_core::shared::settings::Settings;
use qc_portal_core::transcript::domain::script_cross_check::CrossCheckResult;

/// Virtual time between transport updates while advancing.
const REPLAY_STEP_SECS: f64 = 0.25;

#[derive(Error, Debug)]
pub enum ScenarioError {
    #[error("failed to read scenario {path}: {source}")]
    Read {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("invalid scenario {path}: {source}")]
    Parse {
        path: PathBuf,
        source: serde_json::Error,
    },
    #[error("step {step}: no annotation at index {index}")]
    NoSuchAnnotation { step: usize, index: usize },
    #[error("step {step}: skip must be -10, -5, 5 or 10 seconds, got {seconds}")]
    InvalidSkip { step: usize, seconds: f64 },
}

/// A scripted review of one simulated audio file.
#[derive(Debug, Clone, Deserialize)]
pub struct Scenario {
    #[serde(default = "default_source")]
    pub source: String,
    pub duration: f64,
    /// Simulate a file the transport cannot decode.
    #[serde(default)]
    pub fail_decode: bool,
    #[serde(default)]
    pub steps: Vec<Step>,
}

fn default_source() -> String {
    "scenario.wav".to_string()
}

/// One reviewer action. Annotations are addressed by creation index.
#[derive(Debug, Clone, Deserialize)]
#[serde(tag = "action", rename_all = "snake_case")]
pub enum Step {
    Play,
    Pause,
    Advance { secs: f64 },
    Seek { to: f64 },
    Skip { seconds: f64 },
    Volume { level: f64 },
    Mark { start: f64, end: f64 },
    Resize { index: usize, start: f64, end: f64 },
    Edit {
        index: usize,
        category: Option<Category>,
        urgency: Option<Urgency>,
        feedback: Option<String>,
    },
    Script { text: String },
    Transcript { text: String },
}

impl Scenario {
    pub fn load(path: &Path) -> Result<Self, ScenarioError> {
        let json = fs::read_to_string(path).map_err(|source| ScenarioError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        serde_json::from_str(&json).map_err(|source| ScenarioError::Parse {
            path: path.to_path_buf(),
            source,
        })
    }
}

/// End state of a replayed scenario.
pub struct ReplayReport {
    pub rows: Vec<ReviewLogRow>,
    pub payload: EngagementPayload,
    pub cross_check: Option<CrossCheckResult>,
    pub active_play_time: f64,
    pub console: Vec<ConsoleEntry>,
}

struct Replay<'c> {
    session: ReviewSession,
    transport: PlaybackSimulator,
    overlay: InMemoryOverlay,
    timer: ManualSampleTimer,
    logger: ConsoleSessionLogger,
    clock: &'c dyn WallClock,
}

impl Replay<'_> {
    fn dispatch(&mut self, event: SessionEvent) {
        let mut ctx = SessionContext {
            overlay: &mut self.overlay,
            timer: &mut self.timer,
            clock: self.clock,
            logger: &mut self.logger,
        };
        self.session.dispatch(event, &mut ctx);
    }

    fn pump(&mut self) {
        for event in self.transport.take_events() {
            self.dispatch(event);
        }
    }

    fn advance(&mut self, secs: f64) {
        let mut remaining = secs;
        while remaining > 1e-9 {
            let dt = remaining.min(REPLAY_STEP_SECS);
            remaining -= dt;
            self.transport.advance(dt);
            self.pump();
            for id in self.timer.elapse(dt) {
                let position = self.transport.current_time();
                self.dispatch(SessionEvent::SampleTick { timer: id, position });
            }
        }
    }

    fn annotation_id(
        &self,
        step: usize,
        index: usize,
    ) -> Result<qc_portal_core::annotation::domain::annotation::AnnotationId, ScenarioError> {
        self.session
            .annotations()
            .get(index)
            .map(|a| a.id().clone())
            .ok_or(ScenarioError::NoSuchAnnotation { step, index })
    }

    fn apply(&mut self, step_no: usize, step: &Step) -> Result<(), ScenarioError> {
        match step {
            Step::Play => {
                if !self.transport.is_playing() {
                    self.session.request_play_pause(&mut self.transport);
                }
            }
            Step::Pause => {
                if self.transport.is_playing() {
                    self.session.request_play_pause(&mut self.transport);
                }
            }
            Step::Advance { secs } => self.advance(*secs),
            Step::Seek { to } => self.transport.seek_to(*to),
            Step::Skip { seconds } => {
                let amount = SkipAmount::from_seconds(*seconds).ok_or(ScenarioError::InvalidSkip {
                    step: step_no,
                    seconds: *seconds,
                })?;
                let mut ctx = SessionContext {
                    overlay: &mut self.overlay,
                    timer: &mut self.timer,
                    clock: self.clock,
                    logger: &mut self.logger,
                };
                self.session.request_skip(amount, &mut self.transport, &mut ctx);
            }
            Step::Volume { level } => {
                let mut ctx = SessionContext {
                    overlay: &mut self.overlay,
                    timer: &mut self.timer,
                    clock: self.clock,
                    logger: &mut self.logger,
                };
                self.session.request_volume(*level, &mut self.transport, &mut ctx);
            }
            Step::Mark { start, end } => {
                if !self.session.annotation_engine().is_marking() {
                    self.dispatch(SessionEvent::MarkingModeChanged { enabled: true });
                }
                self.dispatch(SessionEvent::GestureStarted);
                self.dispatch(SessionEvent::AnnotationCreated {
                    start: *start,
                    end: *end,
                });
            }
            Step::Resize { index, start, end } => {
                let id = self.annotation_id(step_no, *index)?;
                self.dispatch(SessionEvent::GestureEnd {
                    id,
                    start: *start,
                    end: *end,
                });
            }
            Step::Edit {
                index,
                category,
                urgency,
                feedback,
            } => {
                let id = self.annotation_id(step_no, *index)?;
                self.dispatch(SessionEvent::LogRowEdited {
                    id,
                    patch: RowPatch {
                        category: *category,
                        urgency: *urgency,
                        feedback: feedback.clone(),
                    },
                });
            }
            Step::Script { text } => self.dispatch(SessionEvent::ScriptChanged { text: text.clone() }),
            Step::Transcript { text } => {
                self.dispatch(SessionEvent::TranscriptChanged { text: text.clone() })
            }
        }
        self.pump();
        Ok(())
    }
}

/// Runs every step against a simulated transport and reports the result.
pub fn replay(
    scenario: &Scenario,
    settings: Settings,
    clock: &dyn WallClock,
) -> Result<ReplayReport, ScenarioError> {
    let transport = if scenario.fail_decode {
        PlaybackSimulator::failing()
    } else {
        PlaybackSimulator::new(scenario.duration)
    };
    let mut replay = Replay {
        logger: ConsoleSessionLogger::new(settings.console_capacity),
        session: ReviewSession::new(settings),
        transport,
        overlay: InMemoryOverlay::new(),
        timer: ManualSampleTimer::new(),
        clock,
    };

    replay.transport.load(&scenario.source);
    replay.pump();

    for (i, step) in scenario.steps.iter().enumerate() {
        log::debug!("Step {}: {step:?}", i + 1);
        replay.apply(i + 1, step)?;
    }
    replay.dispatch(SessionEvent::Teardown);

    Ok(ReplayReport {
        rows: replay.session.review_log().rows().to_vec(),
        payload: replay.session.payload(),
        cross_check: replay.session.cross_check().cloned(),
        active_play_time: replay.session.coverage().active_play_time(),
        console: replay.logger.entries().cloned().collect(),
    })
}
