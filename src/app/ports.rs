//! Port traits — the hexagonal boundary between domain logic and the outside world.
//!
//! ```text
//!   Adapter ──▶ Port trait ──▶ ReceiverService (domain)
//! ```
//!
//! Driven adapters (servos, event sinks) implement these traits. The
//! [`ReceiverService`](super::service::ReceiverService) consumes them via
//! generics, so the domain core never touches hardware directly.
//!
//! The inbound byte channel is [`Transport`](crate::serial::transport::Transport);
//! the outbound query surface is [`QueryHandler`](crate::query::QueryHandler).

use crate::app::command::Angle;
use crate::error::ActuatorError;

// ───────────────────────────────────────────────────────────────
// Actuator port (driven adapter: domain → hardware)
// ───────────────────────────────────────────────────────────────

/// Write-side port: the domain calls this to command the servos.
pub trait ActuatorPort {
    /// Drive the pan servo to `angle`.
    fn write_pan(&mut self, angle: Angle) -> Result<(), ActuatorError>;

    /// Drive the tilt servo to `angle`.
    fn write_tilt(&mut self, angle: Angle) -> Result<(), ActuatorError>;
}

// ───────────────────────────────────────────────────────────────
// Event sink port (driven adapter: domain → logging / telemetry)
// ───────────────────────────────────────────────────────────────

/// The domain emits structured [`AppEvent`](super::events::AppEvent)s
/// through this port. Adapters decide where they go.
pub trait EventSink {
    fn emit(&mut self, event: &super::events::AppEvent);
}

// ───────────────────────────────────────────────────────────────
// Time port (driven adapter: monotonic clock → domain)
// ───────────────────────────────────────────────────────────────

/// Monotonic clock used to timestamp command arrivals.
pub trait TimePort {
    /// Microseconds since boot.
    fn uptime_us(&self) -> u64;
}
