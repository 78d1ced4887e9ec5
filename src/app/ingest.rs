//! One pass of the serial ingestion loop.
//!
//! ```text
//!  poll_line ──▶ timestamp ──▶ lock ──▶ handle_line ──▶ expire_idle
//! ```
//!
//! The arrival is timestamped before the lock is taken, so a query
//! holding the lock never skews the measured interval.

use std::sync::Mutex;

use crate::error::{ActuatorError, CommandError, ParseError};
use crate::serial::line::LineReader;
use crate::serial::transport::Transport;

use super::command::Angle;
use super::ports::{ActuatorPort, EventSink, TimePort};
use super::service::{self, ReceiverService};

/// What a single pass did.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IngestOutcome {
    /// No complete line was pending.
    Idle,
    Applied(Angle),
    Rejected(ParseError),
    Faulted(ActuatorError),
}

/// Service at most one pending line, then age out an idle stress episode.
///
/// Never blocks on the transport. The idle check runs on every pass,
/// including one whose read failed; the read error is returned after it.
/// Command-level failures are reported in the outcome.
pub fn ingest_once<T: Transport>(
    reader: &mut LineReader<T>,
    service: &Mutex<ReceiverService>,
    clock: &impl TimePort,
    hw: &mut impl ActuatorPort,
    sink: &mut impl EventSink,
) -> Result<IngestOutcome, T::Error> {
    let polled = reader.poll_line();
    let now_us = clock.uptime_us();

    let mut svc = service::lock(service);
    let outcome = match &polled {
        Ok(Some(line)) => match svc.handle_line(line, now_us, hw, sink) {
            Ok(angle) => IngestOutcome::Applied(angle),
            Err(CommandError::Parse(e)) => IngestOutcome::Rejected(e),
            Err(CommandError::Actuator(e)) => IngestOutcome::Faulted(e),
        },
        Ok(None) | Err(_) => IngestOutcome::Idle,
    };
    svc.expire_idle(now_us, sink);
    polled.map(|_| outcome)
}
