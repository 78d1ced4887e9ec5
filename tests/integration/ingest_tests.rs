//! Serial line → ReceiverService → servos, driven through `ingest_once`.

use std::sync::Mutex;

use crate::mock_hw::{LogSink, ManualClock, MockServos, ScriptedSerial, ServoCall};

use pantilt::app::command::Angle;
use pantilt::app::events::AppEvent;
use pantilt::app::ingest::{IngestOutcome, ingest_once};
use pantilt::app::ports::TimePort;
use pantilt::app::service::{self, ReceiverService};
use pantilt::app::snapshot::EpisodePhase;
use pantilt::config::SystemConfig;
use pantilt::error::{ActuatorError, ParseError};
use pantilt::serial::line::LineReader;

struct Rig {
    reader: LineReader<ScriptedSerial>,
    svc: Mutex<ReceiverService>,
    clock: ManualClock,
    hw: MockServos,
    sink: LogSink,
}

impl Rig {
    fn new(serial: ScriptedSerial) -> Self {
        let svc = Mutex::new(ReceiverService::new(&SystemConfig::default()));
        let mut hw = MockServos::new();
        let mut sink = LogSink::new();
        service::lock(&svc).start(&mut hw, &mut sink);
        Self {
            reader: LineReader::new(serial),
            svc,
            clock: ManualClock::new(),
            hw,
            sink,
        }
    }

    fn pass(&mut self) -> IngestOutcome {
        ingest_once(
            &mut self.reader,
            &self.svc,
            &self.clock,
            &mut self.hw,
            &mut self.sink,
        )
        .unwrap()
    }

    /// One pass per line, `gap_us` apart.
    fn run(&mut self, lines: usize, gap_us: u64) -> Vec<IngestOutcome> {
        (0..lines)
            .map(|_| {
                let outcome = self.pass();
                self.clock.advance(gap_us);
                outcome
            })
            .collect()
    }
}

fn deg(d: u8) -> Angle {
    Angle::new(d).unwrap()
}

// ── Mixed valid / invalid stream ──────────────────────────────

#[test]
fn mixed_stream_applies_valid_and_counts_rejections() {
    let mut rig = Rig::new(ScriptedSerial::lines(&["90", "45", "200", "-5", "120"]));
    let outcomes = rig.run(5, 100_000);

    assert_eq!(
        outcomes,
        vec![
            IngestOutcome::Applied(deg(90)),
            IngestOutcome::Applied(deg(45)),
            IngestOutcome::Rejected(ParseError::OutOfRange(200)),
            IngestOutcome::Rejected(ParseError::OutOfRange(-5)),
            IngestOutcome::Applied(deg(120)),
        ]
    );

    // Homing writes first, then only accepted pans.
    assert_eq!(rig.hw.calls[..2], [ServoCall::Pan(90), ServoCall::Tilt(90)]);
    assert_eq!(rig.hw.pan_history(), vec![90, 90, 45, 120]);

    let svc = service::lock(&rig.svc);
    let view = svc.snapshot(rig.clock.uptime_us());
    assert_eq!(view.total_messages, 3);
    assert_eq!(view.parse_errors, 2);
    assert_eq!(view.position, deg(120));
    // Accepted at 0, 100 ms and 400 ms.
    assert_eq!(view.history_us.as_slice(), &[100_000, 300_000]);
}

#[test]
fn garbage_line_is_accepted_as_zero() {
    let mut rig = Rig::new(ScriptedSerial::lines(&["hello"]));
    assert_eq!(rig.pass(), IngestOutcome::Applied(deg(0)));
    assert_eq!(service::lock(&rig.svc).current().position, deg(0));
}

#[test]
fn crlf_and_split_reads_are_reassembled() {
    let mut serial = ScriptedSerial::new();
    serial.push(b"1");
    serial.push(b"7\r");
    serial.push(b"\n");
    let mut rig = Rig::new(serial);

    assert_eq!(rig.pass(), IngestOutcome::Idle);
    assert_eq!(rig.pass(), IngestOutcome::Idle);
    assert_eq!(rig.pass(), IngestOutcome::Applied(deg(17)));
}

#[test]
fn overlong_line_is_not_a_parse_error() {
    let mut serial = ScriptedSerial::new();
    serial.push(&[b'9'; 100]);
    serial.push(b"\n30\n");
    let mut rig = Rig::new(serial);

    let outcomes = rig.run(6, 1_000);
    assert!(outcomes.contains(&IngestOutcome::Applied(deg(30))));
    assert_eq!(rig.reader.overflowed(), 1);

    let svc = service::lock(&rig.svc);
    assert_eq!(svc.stats().parse_errors(), 0);
    assert_eq!(svc.stats().total_messages(), 1);
}

#[test]
fn servo_fault_leaves_counters_untouched() {
    let mut rig = Rig::new(ScriptedSerial::lines(&["10", "20"]));
    assert_eq!(rig.pass(), IngestOutcome::Applied(deg(10)));
    rig.hw.fail_pan = true;
    rig.clock.advance(5_000);
    assert_eq!(
        rig.pass(),
        IngestOutcome::Faulted(ActuatorError::PwmWriteFailed)
    );

    let svc = service::lock(&rig.svc);
    assert_eq!(svc.current().position, deg(10));
    assert_eq!(svc.stats().total_messages(), 1);
    assert_eq!(svc.stats().parse_errors(), 0);
    assert_eq!(
        rig.sink.count(|e| matches!(e, AppEvent::ActuatorFault { .. })),
        1
    );
}

// ── Stress episode lifecycle ──────────────────────────────────

#[test]
fn burst_opens_and_idle_closes_episode() {
    let lines: Vec<String> = (0..20).map(|i| (i * 9).to_string()).collect();
    let refs: Vec<&str> = lines.iter().map(String::as_str).collect();
    let mut rig = Rig::new(ScriptedSerial::lines(&refs));

    // 20 messages, 50 ms apart: t = 0 .. 950 ms.
    rig.run(20, 50_000);
    {
        let svc = service::lock(&rig.svc);
        let view = svc.snapshot(950_000);
        assert_eq!(view.stress.phase, EpisodePhase::Active);
        assert_eq!(view.stress.messages, 20);
        assert_eq!(view.stress.elapsed_ms, 950);
    }
    assert_eq!(
        rig.sink.count(|e| matches!(e, AppEvent::StressStarted { .. })),
        1
    );

    // Idle passes age the episode out once the quiet period has passed.
    rig.clock.set(1_900_000);
    assert_eq!(rig.pass(), IngestOutcome::Idle);
    assert_eq!(
        rig.sink.count(|e| matches!(e, AppEvent::StressEnded { .. })),
        0
    );
    rig.clock.set(1_950_000);
    assert_eq!(rig.pass(), IngestOutcome::Idle);

    let ended = rig
        .sink
        .events
        .iter()
        .find_map(|e| match e {
            AppEvent::StressEnded {
                messages,
                duration_ms,
                messages_per_sec,
            } => Some((*messages, *duration_ms, *messages_per_sec)),
            _ => None,
        })
        .unwrap();
    assert_eq!(ended.0, 20);
    assert_eq!(ended.1, 950);
    let rate = ended.2.unwrap();
    assert!((rate - 20_000.0 / 950.0).abs() < 0.01);

    // Result is retained.
    let view = service::lock(&rig.svc).snapshot(5_000_000);
    assert_eq!(view.stress.phase, EpisodePhase::Finished);
    assert_eq!(view.stress.elapsed_ms, 950);
}

#[test]
fn slow_stream_never_opens_episode() {
    let lines: Vec<String> = (0..30).map(|i| (i * 6).to_string()).collect();
    let refs: Vec<&str> = lines.iter().map(String::as_str).collect();
    let mut rig = Rig::new(ScriptedSerial::lines(&refs));
    rig.run(30, 200_000);

    let view = service::lock(&rig.svc).snapshot(6_000_000);
    assert_eq!(view.stress.phase, EpisodePhase::None);
    assert_eq!(view.stress.messages_per_sec, None);
}
