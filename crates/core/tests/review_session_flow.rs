use std::sync::Arc;
use std::time::Duration;

use approx::assert_relative_eq;

use qc_portal_core::annotation::domain::overlay_renderer::OverlayRenderer;
use qc_portal_core::annotation::domain::review_log::{Category, RowPatch, Urgency};
use qc_portal_core::annotation::infrastructure::in_memory_overlay::InMemoryOverlay;
use qc_portal_core::engagement::domain::engagement_log::{EngagementEventType, SkipAmount};
use qc_portal_core::playback::domain::audio_transport::AudioTransport;
use qc_portal_core::playback::infrastructure::manual_sample_timer::ManualSampleTimer;
use qc_portal_core::playback::infrastructure::playback_simulator::PlaybackSimulator;
use qc_portal_core::session::review_session::{ReviewSession, SessionContext};
use qc_portal_core::session::session_event::SessionEvent;
use qc_portal_core::session::session_logger::NullSessionLogger;
use qc_portal_core::shared::clock::FixedClock;
use qc_portal_core::transcription::domain::audio_segment::AudioSegment;
use qc_portal_core::transcription::domain::speech_recognizer::RecognizerOutput;
use qc_portal_core::transcription::infrastructure::canned_recognizer::CannedRecognizer;
use qc_portal_core::transcription::infrastructure::transcription_worker;

struct Host {
    session: ReviewSession,
    transport: PlaybackSimulator,
    overlay: InMemoryOverlay,
    timer: ManualSampleTimer,
    clock: FixedClock,
    logger: NullSessionLogger,
}

impl Host {
    fn new(duration: f64) -> Self {
        Self {
            session: ReviewSession::default(),
            transport: PlaybackSimulator::new(duration),
            overlay: InMemoryOverlay::new(),
            timer: ManualSampleTimer::new(),
            clock: FixedClock::new(1_700_000_000_000),
            logger: NullSessionLogger,
        }
    }

    fn send(&mut self, event: SessionEvent) {
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
            self.send(event);
        }
    }

    fn load(&mut self, source: &str) {
        self.transport.load(source);
        self.pump();
    }

    fn toggle(&mut self) {
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

    fn listen(&mut self, secs: u32) {
        for _ in 0..secs {
            self.transport.advance(1.0);
            self.clock.advance(1000);
            self.pump();
            for id in self.timer.elapse(1.0) {
                let position = self.transport.current_time();
                self.send(SessionEvent::SampleTick { timer: id, position });
            }
        }
    }

    fn transcribe(&mut self, recognizer: CannedRecognizer) {
        let ticket = {
            let mut ctx = SessionContext {
                overlay: &mut self.overlay,
                timer: &mut self.timer,
                clock: &self.clock,
                logger: &mut self.logger,
            };
            self.session.begin_transcription(2.0, &mut ctx).unwrap()
        };
        let audio = AudioSegment::new(vec![0.0; 44100 * 2], 44100, 2);
        let outcome = transcription_worker::spawn(Arc::new(recognizer), audio, 2.0, ticket).wait();
        self.send(SessionEvent::TranscriptionFinished(outcome));
    }
}

#[test]
fn full_review_produces_consistent_log_and_payload() {
    let mut host = Host::new(150.0);
    host.load("episode-12.wav");
    host.transcribe(CannedRecognizer::demo());
    assert_eq!(host.session.transcript().len(), 6);

    host.send(SessionEvent::ScriptChanged {
        text: "Hello and welcome to today's audio production quality control session.\n\
               This line was cut in the edit."
            .into(),
    });
    let check = host.session.cross_check().unwrap();
    assert_eq!((check.found, check.total), (1, 2));
    assert!(!check.all_found);

    host.toggle();
    host.listen(20);
    assert_eq!(host.session.active_segment_index(), 1);

    host.send(SessionEvent::MarkingModeChanged { enabled: true });
    host.send(SessionEvent::GestureStarted);
    host.send(SessionEvent::GesturePreview { start: 16.0, end: 17.0 });
    host.send(SessionEvent::AnnotationCreated { start: 16.0, end: 19.0 });
    host.send(SessionEvent::GestureStarted);
    host.send(SessionEvent::AnnotationCreated { start: 30.0, end: 30.05 });

    host.skip(SkipAmount::Back10);
    host.listen(5);
    host.toggle();

    let ids: Vec<_> = host.session.annotations().iter().map(|a| a.id().clone()).collect();
    assert_eq!(ids.len(), 1);
    host.send(SessionEvent::GestureEnd {
        id: ids[0].clone(),
        start: 15.5,
        end: 19.0,
    });
    host.send(SessionEvent::LogRowEdited {
        id: ids[0].clone(),
        patch: RowPatch {
            category: Some(Category::Sfx),
            urgency: Some(Urgency::MustFix),
            feedback: Some("door slam clipped".into()),
        },
    });

    let row = host.session.review_log().get(&ids[0]).unwrap();
    assert_eq!(row.start_timecode(), "00:15.500");
    assert_eq!(row.category(), Category::Sfx);
    assert_eq!(host.overlay.list_annotations().len(), 1);
    assert_relative_eq!(host.overlay.list_annotations()[0].start, 15.5);

    let payload = host.session.payload();
    assert_eq!(payload.play_segments, vec![5.0, 10.0, 15.0, 20.0, 15.0]);
    assert_relative_eq!(payload.unique_seconds_played, 20.0);
    assert_eq!(payload.total_marks, 1);
    assert_relative_eq!(payload.listener_score, 20.0 / 150.0 + 0.1);

    let kinds: Vec<_> = payload.engagement_logs.iter().map(|e| e.kind).collect();
    assert_eq!(
        kinds,
        vec![
            EngagementEventType::Mark,
            EngagementEventType::SkipBack10,
            EngagementEventType::Pause
        ]
    );
    assert_relative_eq!(payload.engagement_logs[0].playback_time, 17.5);

    let json: serde_json::Value = serde_json::from_str(&payload.to_json().unwrap()).unwrap();
    assert_eq!(json["engagementLogs"][1]["type"], "skip_back_10");
    assert_eq!(json["totalMarks"], 1);
    assert!(json["engagementLogs"][0].get("value").is_none());
}

#[test]
fn replacing_the_file_discards_a_late_transcription() {
    let mut host = Host::new(60.0);
    host.load("first.wav");

    let ticket = {
        let mut ctx = SessionContext {
            overlay: &mut host.overlay,
            timer: &mut host.timer,
            clock: &host.clock,
            logger: &mut host.logger,
        };
        host.session.begin_transcription(1.0, &mut ctx).unwrap()
    };
    let recognizer = CannedRecognizer::new(RecognizerOutput::Text("words from first.wav".into()))
        .with_delay(Duration::from_millis(50));
    let job = transcription_worker::spawn(
        Arc::new(recognizer),
        AudioSegment::new(vec![0.0; 16000], 16000, 1),
        1.0,
        ticket,
    );

    host.load("second.wav");
    let outcome = job.wait();
    host.send(SessionEvent::TranscriptionFinished(outcome));

    assert!(host.session.transcript().is_empty());
    assert_eq!(host.session.transcript_text(), "");
    assert_eq!(host.session.source(), Some("second.wav"));
}

#[test]
fn transport_failure_leaves_review_data_alone() {
    let mut host = Host::new(60.0);
    host.load("ok.wav");
    host.send(SessionEvent::MarkingModeChanged { enabled: true });
    host.send(SessionEvent::AnnotationCreated { start: 2.0, end: 4.0 });
    host.toggle();
    host.listen(6);

    host.send(SessionEvent::TransportError {
        message: "device lost".into(),
    });

    assert!(!host.session.controls_enabled());
    assert_eq!(host.session.annotations().len(), 1);
    assert_eq!(host.session.coverage().samples(), &[5.0]);
    assert_eq!(host.timer.armed_count(), 0);
}
