use crate::annotation::domain::annotation::{Annotation, AnnotationId};
use crate::annotation::domain::annotation_sync_engine::AnnotationSyncEngine;
use crate::annotation::domain::overlay_renderer::OverlayRenderer;
use crate::annotation::domain::review_log::{ReviewLog, RowPatch};
use crate::engagement::domain::coverage_tracker::CoverageTracker;
use crate::engagement::domain::engagement_log::{EngagementEventType, EngagementLog, SkipAmount};
use crate::engagement::domain::engagement_payload::EngagementPayload;
use crate::playback::domain::audio_transport::AudioTransport;
use crate::playback::domain::sample_timer::SampleTimer;
use crate::shared::clock::WallClock;
use crate::shared::settings::Settings;
use crate::shared::timecode::format_timecode;
use crate::transcript::domain::script_cross_check::{CrossCheckResult, ScriptCrossChecker};
use crate::transcript::domain::transcript_index::TranscriptIndex;
use crate::transcript::domain::transcript_segment::TranscriptSegment;
use crate::transcription::domain::transcription_error::TranscriptionError;
use crate::transcription::domain::transcription_ticket::{TranscriptionOutcome, TranscriptionTicket};

use super::session_event::SessionEvent;
use super::session_logger::{ConsoleStatus, SessionLogger};

/// Collaborators lent to the session for one dispatch.
pub struct SessionContext<'a> {
    pub overlay: &'a mut dyn OverlayRenderer,
    pub timer: &'a mut dyn SampleTimer,
    pub clock: &'a dyn WallClock,
    pub logger: &'a mut dyn SessionLogger,
}

/// Per-file review state and the single entry point for every event.
///
/// Loading a file resets coverage, the engagement log, annotations, the
/// transcript and any in-flight transcription. The reference script is the
/// reviewer's own text and survives file changes.
pub struct ReviewSession {
    settings: Settings,
    coverage: CoverageTracker,
    engagement: EngagementLog,
    annotations: AnnotationSyncEngine,
    cross_checker: ScriptCrossChecker,
    transcript_text: String,
    transcript: TranscriptIndex,
    script_text: String,
    script: TranscriptIndex,
    cross_check: Option<CrossCheckResult>,
    source: Option<String>,
    duration: f64,
    position: f64,
    playing: bool,
    controls_enabled: bool,
    generation: u64,
    transcription: Option<TranscriptionTicket>,
    transcription_error: Option<String>,
}

impl Default for ReviewSession {
    fn default() -> Self {
        Self::new(Settings::default())
    }
}

impl ReviewSession {
    /// Out-of-range settings fall back to their defaults.
    pub fn new(settings: Settings) -> Self {
        let settings = settings.sanitized();
        Self {
            coverage: CoverageTracker::new(settings.sample_period_secs),
            engagement: EngagementLog::new(),
            annotations: AnnotationSyncEngine::new(settings.min_annotation_secs),
            cross_checker: ScriptCrossChecker::new(settings.phrase_match_ratio),
            transcript_text: String::new(),
            transcript: TranscriptIndex::default(),
            script_text: String::new(),
            script: TranscriptIndex::default(),
            cross_check: None,
            source: None,
            duration: 0.0,
            position: 0.0,
            playing: false,
            controls_enabled: false,
            generation: 0,
            transcription: None,
            transcription_error: None,
            settings,
        }
    }

    pub fn dispatch(&mut self, event: SessionEvent, ctx: &mut SessionContext<'_>) {
        match event {
            SessionEvent::FileLoaded { source } => self.on_file_loaded(source, ctx),
            SessionEvent::Ready { duration } => self.on_ready(duration, ctx),
            SessionEvent::TransportError { message } => {
                self.controls_enabled = false;
                self.playing = false;
                self.coverage.teardown(&mut *ctx.timer);
                ctx.logger.error(&format!("Audio transport error: {message}"));
            }
            SessionEvent::Play { position } => {
                self.playing = true;
                self.position = position;
                self.coverage.on_play(position, &mut *ctx.timer);
            }
            SessionEvent::Pause { position } => {
                self.playing = false;
                self.position = position;
                self.coverage.on_pause(position, &mut *ctx.timer);
                self.engagement
                    .record(EngagementEventType::Pause, ctx.clock.now_ms(), position, None);
            }
            SessionEvent::TimeUpdate { position } => {
                self.position = position;
                self.coverage.on_time_update(position);
            }
            SessionEvent::Seeked { position } => {
                self.position = position;
                self.coverage.on_seek(position, &mut *ctx.timer);
            }
            SessionEvent::SampleTick { timer, position } => {
                self.position = position;
                self.coverage.on_tick(timer, position);
            }
            SessionEvent::Teardown => self.on_teardown(ctx),
            SessionEvent::MarkingModeChanged { enabled } => {
                self.annotations.set_marking_mode(enabled);
                ctx.logger.info(if enabled {
                    "Marking mode on"
                } else {
                    "Marking mode off"
                });
            }
            SessionEvent::GestureStarted => self.annotations.begin_gesture(),
            SessionEvent::GesturePreview { start, end } => self.annotations.update_preview(start, end),
            SessionEvent::AnnotationCreated { start, end } => {
                if let Some(annotation) = self.annotations.complete_gesture(start, end) {
                    self.record_mark(&annotation, ctx);
                }
                self.annotations.reconcile(&mut *ctx.overlay);
            }
            SessionEvent::AnnotationAdopted { id, start, end } => {
                if let Some(annotation) = self.annotations.adopt_annotation(id, start, end) {
                    self.record_mark(&annotation, ctx);
                }
                self.annotations.reconcile(&mut *ctx.overlay);
            }
            SessionEvent::GestureEnd { id, start, end } => {
                if let Err(e) = self.annotations.resize_annotation(&id, start, end) {
                    log::warn!("Resize rejected: {e}");
                    ctx.logger.error(&format!("Resize rejected: {e}"));
                }
                self.annotations.reconcile(&mut *ctx.overlay);
            }
            SessionEvent::LogRowEdited { id, patch } => self.on_row_edited(&id, patch, ctx),
            SessionEvent::ScriptChanged { text } => {
                self.script_text = text;
                self.script = TranscriptIndex::parse_script_segments(&self.script_text, self.duration);
                self.recompute_cross_check();
            }
            SessionEvent::TranscriptChanged { text } => self.set_transcript(text),
            SessionEvent::TranscriptionFinished(outcome) => self.on_transcription_finished(outcome, ctx),
        }
    }

    /// Play/pause button. Returns whether the command reached the transport.
    pub fn request_play_pause(&mut self, transport: &mut dyn AudioTransport) -> bool {
        if !self.controls_enabled {
            return false;
        }
        transport.play_pause();
        true
    }

    /// One of the fixed skip buttons. Logged at the pre-skip position.
    pub fn request_skip(
        &mut self,
        amount: SkipAmount,
        transport: &mut dyn AudioTransport,
        ctx: &mut SessionContext<'_>,
    ) -> bool {
        if !self.controls_enabled {
            return false;
        }
        self.engagement
            .record(amount.event_type(), ctx.clock.now_ms(), transport.current_time(), None);
        transport.skip(amount.seconds());
        true
    }

    /// Volume slider. Always available, even before the file is ready.
    pub fn request_volume(
        &mut self,
        volume: f64,
        transport: &mut dyn AudioTransport,
        ctx: &mut SessionContext<'_>,
    ) {
        let volume = volume.clamp(0.0, 1.0);
        transport.set_volume(volume);
        self.engagement.record(
            EngagementEventType::VolumeChange,
            ctx.clock.now_ms(),
            transport.current_time(),
            Some(volume),
        );
    }

    /// Issues a ticket for transcribing the current file, aborting any
    /// earlier request. Files over the configured size limit are refused.
    pub fn begin_transcription(
        &mut self,
        size_mb: f64,
        ctx: &mut SessionContext<'_>,
    ) -> Result<TranscriptionTicket, TranscriptionError> {
        if size_mb > self.settings.max_transcription_mb {
            let err = TranscriptionError::FileTooLarge {
                size_mb,
                limit_mb: self.settings.max_transcription_mb,
            };
            self.transcription_error = Some(err.to_string());
            ctx.logger.error(&err.to_string());
            return Err(err);
        }
        self.abort_transcription();
        let ticket = TranscriptionTicket::new(self.generation);
        self.transcription = Some(ticket.clone());
        self.transcription_error = None;
        ctx.logger
            .milestone("Transcription started", ConsoleStatus::Processing);
        Ok(ticket)
    }

    pub fn payload(&self) -> EngagementPayload {
        EngagementPayload::build(
            self.coverage.samples(),
            self.coverage.period(),
            &self.engagement,
            self.duration,
        )
    }

    pub fn listener_score(&self) -> f64 {
        self.payload().listener_score
    }

    pub fn settings(&self) -> &Settings {
        &self.settings
    }

    pub fn coverage(&self) -> &CoverageTracker {
        &self.coverage
    }

    pub fn engagement_log(&self) -> &EngagementLog {
        &self.engagement
    }

    pub fn annotations(&self) -> &[Annotation] {
        self.annotations.annotations()
    }

    pub fn annotation_engine(&self) -> &AnnotationSyncEngine {
        &self.annotations
    }

    pub fn review_log(&self) -> &ReviewLog {
        self.annotations.review_log()
    }

    pub fn transcript(&self) -> &TranscriptIndex {
        &self.transcript
    }

    pub fn transcript_text(&self) -> &str {
        &self.transcript_text
    }

    pub fn script(&self) -> &TranscriptIndex {
        &self.script
    }

    pub fn script_text(&self) -> &str {
        &self.script_text
    }

    pub fn cross_check(&self) -> Option<&CrossCheckResult> {
        self.cross_check.as_ref()
    }

    /// Transcript line to highlight at the current position.
    pub fn active_segment_index(&self) -> usize {
        self.transcript.active_index(self.position)
    }

    pub fn active_segment(&self) -> Option<&TranscriptSegment> {
        self.transcript.active_segment(self.position)
    }

    pub fn active_script_index(&self) -> usize {
        self.script.active_index(self.position)
    }

    pub fn source(&self) -> Option<&str> {
        self.source.as_deref()
    }

    pub fn duration(&self) -> f64 {
        self.duration
    }

    pub fn position(&self) -> f64 {
        self.position
    }

    pub fn is_playing(&self) -> bool {
        self.playing
    }

    pub fn controls_enabled(&self) -> bool {
        self.controls_enabled
    }

    pub fn generation(&self) -> u64 {
        self.generation
    }

    pub fn is_transcribing(&self) -> bool {
        self.transcription.is_some()
    }

    pub fn transcription_error(&self) -> Option<&str> {
        self.transcription_error.as_deref()
    }

    fn on_file_loaded(&mut self, source: String, ctx: &mut SessionContext<'_>) {
        self.abort_transcription();
        self.generation += 1;
        self.coverage.reset(&mut *ctx.timer);
        self.engagement.clear();
        self.annotations.reset();
        self.annotations.reconcile(&mut *ctx.overlay);
        self.transcript_text.clear();
        self.transcript = TranscriptIndex::default();
        self.transcription_error = None;
        self.script = TranscriptIndex::parse_script_segments(&self.script_text, 0.0);
        self.recompute_cross_check();
        self.duration = 0.0;
        self.position = 0.0;
        self.playing = false;
        self.controls_enabled = false;
        ctx.logger.info(&format!("Loading {source}"));
        self.source = Some(source);
    }

    fn on_ready(&mut self, duration: f64, ctx: &mut SessionContext<'_>) {
        self.duration = if duration.is_finite() { duration.max(0.0) } else { 0.0 };
        self.annotations.set_duration(self.duration);
        self.script = TranscriptIndex::parse_script_segments(&self.script_text, self.duration);
        self.controls_enabled = true;
        ctx.logger.milestone(
            &format!("Audio ready ({})", format_timecode(self.duration)),
            ConsoleStatus::Success,
        );
    }

    fn on_teardown(&mut self, ctx: &mut SessionContext<'_>) {
        self.coverage.teardown(&mut *ctx.timer);
        self.abort_transcription();
        self.playing = false;
        self.controls_enabled = false;
    }

    fn on_row_edited(&mut self, id: &AnnotationId, patch: RowPatch, ctx: &mut SessionContext<'_>) {
        if let Err(e) = self.annotations.edit_log_row(id, patch) {
            log::warn!("Row edit rejected: {e}");
            ctx.logger.error(&format!("Row edit rejected: {e}"));
        }
    }

    fn on_transcription_finished(&mut self, outcome: TranscriptionOutcome, ctx: &mut SessionContext<'_>) {
        let TranscriptionOutcome { ticket, result } = outcome;
        let pending = self
            .transcription
            .as_ref()
            .is_some_and(|current| current.is_same(&ticket));
        if !pending || ticket.is_aborted() || ticket.generation() != self.generation {
            log::debug!(
                "Discarding transcription for generation {} (current {})",
                ticket.generation(),
                self.generation
            );
            return;
        }
        self.transcription = None;
        // Settled: the worker drops anything it still produces.
        ticket.abort();
        match result {
            Ok(text) => {
                self.transcription_error = None;
                self.set_transcript(text);
                ctx.logger.milestone(
                    &format!("Transcription complete ({} segments)", self.transcript.len()),
                    ConsoleStatus::Success,
                );
            }
            Err(e) => {
                ctx.logger.error(&e.to_string());
                self.transcription_error = Some(e.to_string());
            }
        }
    }

    fn record_mark(&mut self, annotation: &Annotation, ctx: &mut SessionContext<'_>) {
        self.engagement.record(
            EngagementEventType::Mark,
            ctx.clock.now_ms(),
            annotation.midpoint(),
            None,
        );
        ctx.logger.info(&format!(
            "Marked {} - {}",
            format_timecode(annotation.start()),
            format_timecode(annotation.end())
        ));
    }

    fn set_transcript(&mut self, text: String) {
        self.transcript = TranscriptIndex::parse(&text);
        self.transcript_text = text;
        self.recompute_cross_check();
    }

    fn abort_transcription(&mut self) {
        if let Some(ticket) = self.transcription.take() {
            ticket.abort();
        }
    }

    fn recompute_cross_check(&mut self) {
        self.cross_check = self.cross_checker.check(&self.script_text, &self.transcript_text);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::annotation::domain::review_log::Urgency;
    use crate::annotation::infrastructure::in_memory_overlay::InMemoryOverlay;
    use crate::playback::infrastructure::manual_sample_timer::ManualSampleTimer;
    use crate::playback::infrastructure::playback_simulator::PlaybackSimulator;
    use crate::session::session_logger::{ConsoleKind, ConsoleSessionLogger};
    use crate::shared::clock::FixedClock;
    use approx::assert_relative_eq;

    struct Harness {
        session: ReviewSession,
        transport: PlaybackSimulator,
        overlay: InMemoryOverlay,
        timer: ManualSampleTimer,
        clock: FixedClock,
        logger: ConsoleSessionLogger,
    }

    impl Harness {
        fn new(duration: f64) -> Self {
            let mut h = Self {
                session: ReviewSession::default(),
                transport: PlaybackSimulator::new(duration),
                overlay: InMemoryOverlay::new(),
                timer: ManualSampleTimer::new(),
                clock: FixedClock::new(1_700_000_000_000),
                logger: ConsoleSessionLogger::with_clock(100, Box::new(FixedClock::new(0))),
            };
            h.transport.load("take-1.wav");
            h.pump();
            h
        }

        fn dispatch(&mut self, event: SessionEvent) {
            let mut ctx = SessionContext {
                overlay: &mut self.overlay,
                timer: &mut self.timer,
                clock: &self.clock,
                logger: &mut self.logger,
            };
            self.session.dispatch(event, &mut ctx);
        }

        fn pump(&mut self) {
            for event in self.transport.take_events() {
                self.dispatch(event);
            }
        }

        fn play_pause(&mut self) {
            self.session.request_play_pause(&mut self.transport);
            self.pump();
        }

        fn skip(&mut self, amount: SkipAmount) {
            let mut ctx = SessionContext {
                overlay: &mut self.overlay,
                timer: &mut self.timer,
                clock: &self.clock,
                logger: &mut self.logger,
            };
            self.session.request_skip(amount, &mut self.transport, &mut ctx);
            self.pump();
        }

        /// Advances playback one second at a time, delivering timer ticks.
        fn run(&mut self, secs: u32) {
            for _ in 0..secs {
                self.transport.advance(1.0);
                self.pump();
                for id in self.timer.elapse(1.0) {
                    let position = self.transport.current_time();
                    self.dispatch(SessionEvent::SampleTick { timer: id, position });
                }
            }
        }

        fn mark(&mut self, start: f64, end: f64) {
            self.dispatch(SessionEvent::GestureStarted);
            self.dispatch(SessionEvent::AnnotationCreated { start, end });
        }

        fn ticket(&mut self, size_mb: f64) -> Result<TranscriptionTicket, TranscriptionError> {
            let mut ctx = SessionContext {
                overlay: &mut self.overlay,
                timer: &mut self.timer,
                clock: &self.clock,
                logger: &mut self.logger,
            };
            self.session.begin_transcription(size_mb, &mut ctx)
        }
    }

    #[test]
    fn test_ready_enables_controls() {
        let h = Harness::new(60.0);
        assert!(h.session.controls_enabled());
        assert_relative_eq!(h.session.duration(), 60.0);
        assert_eq!(h.session.source(), Some("take-1.wav"));
    }

    #[test]
    fn test_transport_error_disables_controls_only() {
        let mut h = Harness::new(60.0);
        h.dispatch(SessionEvent::MarkingModeChanged { enabled: true });
        h.mark(1.0, 3.0);
        h.dispatch(SessionEvent::TransportError {
            message: "decoder crashed".into(),
        });
        assert!(!h.session.controls_enabled());
        assert!(!h.session.request_play_pause(&mut h.transport));
        assert_eq!(h.session.annotations().len(), 1);
        assert!(h.logger.entries().any(|e| e.kind == ConsoleKind::Error));
    }

    #[test]
    fn test_play_pause_samples_and_logs_pause() {
        let mut h = Harness::new(60.0);
        h.play_pause();
        h.run(12);
        h.play_pause();
        assert_eq!(h.session.coverage().samples(), &[5.0, 10.0]);
        assert_eq!(h.timer.armed_count(), 0);
        assert_eq!(h.session.engagement_log().count(EngagementEventType::Pause), 1);
        let pause = &h.session.engagement_log().entries()[0];
        assert_relative_eq!(pause.playback_time, 12.0);
        assert_eq!(pause.timestamp, 1_700_000_000_000);
    }

    #[test]
    fn test_skip_logged_at_pre_skip_position() {
        let mut h = Harness::new(60.0);
        h.play_pause();
        h.run(7);
        h.skip(SkipAmount::Back5);
        let entry = h.session.engagement_log().entries().last().unwrap().clone();
        assert_eq!(entry.kind, EngagementEventType::SkipBack5);
        assert_relative_eq!(entry.playback_time, 7.0);
        assert_relative_eq!(h.session.position(), 2.0);
        assert!(h.session.coverage().is_sampling());
    }

    #[test]
    fn test_skip_ignored_before_ready() {
        let mut h = Harness::new(60.0);
        h.dispatch(SessionEvent::FileLoaded {
            source: "next.wav".into(),
        });
        h.skip(SkipAmount::Forward10);
        assert!(h.session.engagement_log().is_empty());
    }

    #[test]
    fn test_volume_change_carries_value() {
        let mut h = Harness::new(60.0);
        let mut ctx = SessionContext {
            overlay: &mut h.overlay,
            timer: &mut h.timer,
            clock: &h.clock,
            logger: &mut h.logger,
        };
        h.session.request_volume(0.35, &mut h.transport, &mut ctx);
        let entry = &h.session.engagement_log().entries()[0];
        assert_eq!(entry.kind, EngagementEventType::VolumeChange);
        assert_eq!(entry.value, Some(0.35));
        assert_relative_eq!(h.transport.volume(), 0.35);
    }

    #[test]
    fn test_mark_adds_row_overlay_region_and_log_entry() {
        let mut h = Harness::new(60.0);
        h.dispatch(SessionEvent::MarkingModeChanged { enabled: true });
        h.mark(10.0, 14.0);

        assert_eq!(h.session.annotations().len(), 1);
        assert_eq!(h.session.review_log().len(), 1);
        assert_eq!(h.overlay.list_annotations().len(), 1);
        let mark = &h.session.engagement_log().entries()[0];
        assert_eq!(mark.kind, EngagementEventType::Mark);
        assert_relative_eq!(mark.playback_time, 12.0);
        assert_relative_eq!(h.session.listener_score(), 0.1);
    }

    #[test]
    fn test_short_drag_adds_nothing() {
        let mut h = Harness::new(60.0);
        h.dispatch(SessionEvent::MarkingModeChanged { enabled: true });
        h.mark(10.0, 10.05);
        assert!(h.session.annotations().is_empty());
        assert!(h.session.engagement_log().is_empty());
        assert!(h.overlay.list_annotations().is_empty());
    }

    #[test]
    fn test_preview_region_never_becomes_authoritative() {
        let mut h = Harness::new(60.0);
        h.dispatch(SessionEvent::MarkingModeChanged { enabled: true });
        h.dispatch(SessionEvent::GestureStarted);
        h.overlay.add_preview_region(3.0, 3.05);
        h.dispatch(SessionEvent::GesturePreview { start: 3.0, end: 3.05 });
        h.dispatch(SessionEvent::AnnotationCreated { start: 3.0, end: 3.05 });
        assert!(h.session.annotations().is_empty());
        assert!(h.overlay.list_annotations().is_empty());
    }

    #[test]
    fn test_resize_updates_row_and_overlay_in_place() {
        let mut h = Harness::new(120.0);
        h.dispatch(SessionEvent::MarkingModeChanged { enabled: true });
        h.mark(10.0, 12.0);
        let id = h.session.annotations()[0].id().clone();
        let instance = h.overlay.instance_of(&id);

        h.dispatch(SessionEvent::LogRowEdited {
            id: id.clone(),
            patch: RowPatch {
                urgency: Some(Urgency::MustFix),
                ..RowPatch::default()
            },
        });
        h.dispatch(SessionEvent::GestureEnd {
            id: id.clone(),
            start: 20.0,
            end: 25.0,
        });

        let row = h.session.review_log().get(&id).unwrap();
        assert_eq!(row.start_timecode(), "00:20.000");
        assert_eq!(row.urgency(), Urgency::MustFix);
        assert_eq!(h.overlay.instance_of(&id), instance);
        assert_eq!(h.overlay.updates, 1);
        assert_eq!(h.session.engagement_log().mark_count(), 1);
    }

    #[test]
    fn test_unknown_resize_is_logged_not_fatal() {
        let mut h = Harness::new(60.0);
        h.dispatch(SessionEvent::GestureEnd {
            id: AnnotationId::new("sel-ghost"),
            start: 1.0,
            end: 2.0,
        });
        assert!(h.logger.entries().any(|e| e.message.contains("sel-ghost")));
    }

    #[test]
    fn test_adopted_annotation_counts_as_mark() {
        let mut h = Harness::new(60.0);
        let id = AnnotationId::new("sel-import");
        h.dispatch(SessionEvent::AnnotationAdopted {
            id: id.clone(),
            start: 4.0,
            end: 6.0,
        });
        h.dispatch(SessionEvent::AnnotationAdopted { id, start: 4.0, end: 6.0 });
        assert_eq!(h.session.annotations().len(), 1);
        assert_eq!(h.session.engagement_log().mark_count(), 1);
    }

    #[test]
    fn test_file_load_resets_per_file_state() {
        let mut h = Harness::new(60.0);
        h.dispatch(SessionEvent::ScriptChanged {
            text: "hello world".into(),
        });
        h.dispatch(SessionEvent::TranscriptChanged {
            text: "[00:00.000] hello world".into(),
        });
        h.dispatch(SessionEvent::MarkingModeChanged { enabled: true });
        h.mark(1.0, 2.0);
        h.play_pause();
        h.run(6);

        h.transport.load("take-2.wav");
        h.pump();

        assert!(h.session.annotations().is_empty());
        assert!(h.session.engagement_log().is_empty());
        assert!(h.session.coverage().samples().is_empty());
        assert!(h.session.transcript().is_empty());
        assert!(h.session.cross_check().is_none());
        assert_eq!(h.session.script_text(), "hello world");
        assert!(h.overlay.list_annotations().is_empty());
        assert_eq!(h.timer.armed_count(), 0);
        assert_eq!(h.session.generation(), 2);
    }

    #[test]
    fn test_cross_check_follows_text_changes() {
        let mut h = Harness::new(60.0);
        h.dispatch(SessionEvent::ScriptChanged {
            text: "hello world\nmissing line here".into(),
        });
        assert!(h.session.cross_check().is_none());
        h.dispatch(SessionEvent::TranscriptChanged {
            text: "[00:00.000] Hello, world!".into(),
        });
        let result = h.session.cross_check().unwrap();
        assert_eq!((result.found, result.total), (1, 2));
        assert_eq!(result.missing_phrases, vec!["missing line here".to_string()]);
    }

    #[test]
    fn test_active_segment_follows_position() {
        let mut h = Harness::new(60.0);
        h.dispatch(SessionEvent::TranscriptChanged {
            text: "[00:00.000] one\n\n[00:05.000] two\n\n[00:09.500] three".into(),
        });
        h.play_pause();
        h.run(6);
        assert_eq!(h.session.active_segment_index(), 1);
        assert_eq!(h.session.active_segment().unwrap().text, "two");
    }

    #[test]
    fn test_script_segments_spread_once_duration_known() {
        let mut h = Harness::new(40.0);
        h.dispatch(SessionEvent::ScriptChanged {
            text: "a\nb\nc\nd".into(),
        });
        assert_eq!(h.session.script().len(), 4);
        assert_relative_eq!(h.session.script().segments()[2].start_time, 20.0);
    }

    #[test]
    fn test_transcription_commits_for_current_file() {
        let mut h = Harness::new(60.0);
        let ticket = h.ticket(5.0).unwrap();
        assert!(h.session.is_transcribing());
        h.dispatch(SessionEvent::TranscriptionFinished(TranscriptionOutcome {
            ticket,
            result: Ok("[00:01.000] hi".into()),
        }));
        assert!(!h.session.is_transcribing());
        assert_eq!(h.session.transcript().len(), 1);
    }

    #[test]
    fn test_late_transcription_for_replaced_file_is_discarded() {
        let mut h = Harness::new(60.0);
        let stale = h.ticket(5.0).unwrap();

        h.transport.load("take-2.wav");
        h.pump();
        assert!(stale.is_aborted());

        h.dispatch(SessionEvent::TranscriptionFinished(TranscriptionOutcome {
            ticket: stale,
            result: Ok("[00:00.000] from the old file".into()),
        }));
        assert!(h.session.transcript().is_empty());
        assert_eq!(h.session.transcript_text(), "");
    }

    #[test]
    fn test_superseded_ticket_is_discarded() {
        let mut h = Harness::new(60.0);
        let first = h.ticket(5.0).unwrap();
        let second = h.ticket(5.0).unwrap();
        assert!(first.is_aborted());
        h.dispatch(SessionEvent::TranscriptionFinished(TranscriptionOutcome {
            ticket: first,
            result: Ok("[00:00.000] old".into()),
        }));
        assert!(h.session.transcript().is_empty());
        assert!(h.session.is_transcribing());
        h.dispatch(SessionEvent::TranscriptionFinished(TranscriptionOutcome {
            ticket: second,
            result: Ok("[00:00.000] new".into()),
        }));
        assert_eq!(h.session.transcript().segments()[0].text, "new");
    }

    #[test]
    fn test_oversized_file_rejected() {
        let mut h = Harness::new(60.0);
        let err = h.ticket(150.0).unwrap_err();
        assert!(matches!(err, TranscriptionError::FileTooLarge { .. }));
        assert!(!h.session.is_transcribing());
        assert!(h.session.transcription_error().is_some());
    }

    #[test]
    fn test_transcription_failure_is_not_fatal() {
        let mut h = Harness::new(60.0);
        let ticket = h.ticket(5.0).unwrap();
        h.dispatch(SessionEvent::TranscriptionFinished(TranscriptionOutcome {
            ticket,
            result: Err(TranscriptionError::Timeout),
        }));
        assert_eq!(
            h.session.transcription_error(),
            Some("Transcription timeout. Try a shorter file.")
        );
        assert!(h.session.controls_enabled());
    }

    #[test]
    fn test_result_after_timeout_is_discarded() {
        let mut h = Harness::new(60.0);
        let ticket = h.ticket(5.0).unwrap();
        h.dispatch(SessionEvent::TranscriptionFinished(TranscriptionOutcome {
            ticket: ticket.clone(),
            result: Err(TranscriptionError::Timeout),
        }));
        assert!(ticket.is_aborted());

        h.dispatch(SessionEvent::TranscriptionFinished(TranscriptionOutcome {
            ticket,
            result: Ok("[00:00.000] arrived after timeout".into()),
        }));
        assert!(h.session.transcript().is_empty());
        assert_eq!(
            h.session.transcription_error(),
            Some("Transcription timeout. Try a shorter file.")
        );
    }

    #[test]
    fn test_unissued_ticket_is_discarded() {
        let mut h = Harness::new(60.0);
        let _pending = h.ticket(5.0).unwrap();
        let generation = h.session.generation;
        h.dispatch(SessionEvent::TranscriptionFinished(TranscriptionOutcome {
            ticket: TranscriptionTicket::new(generation),
            result: Ok("[00:00.000] forged".into()),
        }));
        assert!(h.session.transcript().is_empty());
        assert!(h.session.is_transcribing());
    }

    #[test]
    fn test_zero_sample_period_falls_back_to_default() {
        let session = ReviewSession::new(Settings {
            sample_period_secs: 0.0,
            ..Settings::default()
        });
        assert_relative_eq!(session.coverage().period(), 5.0);
    }

    #[test]
    fn test_teardown_stops_sampling() {
        let mut h = Harness::new(60.0);
        h.play_pause();
        h.run(3);
        h.dispatch(SessionEvent::Teardown);
        assert_eq!(h.timer.armed_count(), 0);
        assert!(!h.session.coverage().is_sampling());
    }
}
