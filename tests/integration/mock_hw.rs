//! Mock adapters for integration tests.
//!
//! Records every servo write and every emitted event so tests can assert
//! on the full history without touching real PWM or UART registers.

use std::cell::Cell;
use std::collections::VecDeque;

use pantilt::app::command::Angle;
use pantilt::app::events::AppEvent;
use pantilt::app::ports::{ActuatorPort, EventSink, TimePort};
use pantilt::error::ActuatorError;
use pantilt::serial::transport::Transport;

// ── Servo call record ─────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ServoCall {
    Pan(u8),
    Tilt(u8),
}

// ── MockServos ────────────────────────────────────────────────

#[derive(Default)]
pub struct MockServos {
    pub calls: Vec<ServoCall>,
    /// When set, every pan write fails.
    pub fail_pan: bool,
}

#[allow(dead_code)]
impl MockServos {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn pan_history(&self) -> Vec<u8> {
        self.calls
            .iter()
            .filter_map(|c| match c {
                ServoCall::Pan(d) => Some(*d),
                ServoCall::Tilt(_) => None,
            })
            .collect()
    }
}

impl ActuatorPort for MockServos {
    fn write_pan(&mut self, angle: Angle) -> Result<(), ActuatorError> {
        if self.fail_pan {
            return Err(ActuatorError::PwmWriteFailed);
        }
        self.calls.push(ServoCall::Pan(angle.degrees()));
        Ok(())
    }

    fn write_tilt(&mut self, angle: Angle) -> Result<(), ActuatorError> {
        self.calls.push(ServoCall::Tilt(angle.degrees()));
        Ok(())
    }
}

// ── LogSink ───────────────────────────────────────────────────

#[derive(Default)]
pub struct LogSink {
    pub events: Vec<AppEvent>,
}

#[allow(dead_code)]
impl LogSink {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn count(&self, pred: impl Fn(&AppEvent) -> bool) -> usize {
        self.events.iter().filter(|e| pred(e)).count()
    }
}

impl EventSink for LogSink {
    fn emit(&mut self, event: &AppEvent) {
        self.events.push(event.clone());
    }
}

// ── ScriptedSerial ────────────────────────────────────────────

/// Hands out one pre-loaded chunk per `read`, then reports idle.
#[derive(Default)]
pub struct ScriptedSerial {
    chunks: VecDeque<Vec<u8>>,
}

#[allow(dead_code)]
impl ScriptedSerial {
    pub fn new() -> Self {
        Self::default()
    }

    /// Queue each line, newline-terminated, as its own chunk.
    pub fn lines(lines: &[&str]) -> Self {
        let mut s = Self::new();
        for line in lines {
            s.push(format!("{line}\n").as_bytes());
        }
        s
    }

    pub fn push(&mut self, bytes: &[u8]) {
        self.chunks.push_back(bytes.to_vec());
    }
}

impl Transport for ScriptedSerial {
    type Error = ();

    fn read(&mut self, buf: &mut [u8]) -> Result<usize, ()> {
        let Some(mut chunk) = self.chunks.pop_front() else {
            return Ok(0);
        };
        let n = chunk.len().min(buf.len());
        buf[..n].copy_from_slice(&chunk[..n]);
        if n < chunk.len() {
            self.chunks.push_front(chunk.split_off(n));
        }
        Ok(n)
    }

    fn available(&self) -> bool {
        !self.chunks.is_empty()
    }
}

// ── ManualClock ───────────────────────────────────────────────

#[derive(Default)]
pub struct ManualClock {
    now_us: Cell<u64>,
}

#[allow(dead_code)]
impl ManualClock {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set(&self, now_us: u64) {
        self.now_us.set(now_us);
    }

    pub fn advance(&self, delta_us: u64) {
        self.now_us.set(self.now_us.get() + delta_us);
    }
}

impl TimePort for ManualClock {
    fn uptime_us(&self) -> u64 {
        self.now_us.get()
    }
}
