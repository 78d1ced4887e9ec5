//! Outbound application events.
//!
//! The [`ReceiverService`](super::service::ReceiverService) emits these
//! through the [`EventSink`](super::ports::EventSink) port. Adapters on
//! the other side decide what to do with them (serial log, test capture).

use crate::app::command::Angle;
use crate::error::{ActuatorError, ParseError};

/// Structured events emitted by the application core.
#[derive(Debug, Clone, PartialEq)]
pub enum AppEvent {
    /// The service has started and both axes sit at `initial`.
    Started { initial: Angle },

    /// A command line was accepted and the pan servo moved.
    AngleApplied { angle: Angle, total_messages: u64 },

    /// A command line was rejected by the parser.
    CommandRejected { error: ParseError, parse_errors: u64 },

    /// The servo driver failed to apply a validated angle.
    ActuatorFault { angle: Angle, error: ActuatorError },

    /// Burst traffic opened a stress episode.
    StressStarted { start_us: u64, message_count_at_start: u64 },

    /// A stress episode closed after its quiet period.
    StressEnded {
        messages: u64,
        duration_ms: u64,
        messages_per_sec: Option<f32>,
    },

    /// All aggregate statistics were reset.
    StatsReset,
}
