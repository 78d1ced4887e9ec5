//! Receiver service — the hexagonal core.
//!
//! [`ReceiverService`] owns the actuator controller and the interval
//! statistics. It exposes a clean, hardware-agnostic API. All I/O flows
//! through port traits injected at call sites, making the entire service
//! testable with mock adapters.
//!
//! ```text
//!                ┌───────────────────────────┐
//!  command line ▶│      ReceiverService      │──▶ EventSink
//!                │ parse · apply · aggregate │
//!  ActuatorPort ◀│                           │──▶ StatsView
//!                └───────────────────────────┘
//! ```
//!
//! The ESP-IDF HTTP server answers queries from its own task, so the
//! service is shared as a [`SharedReceiver`]. Each operation takes the
//! lock once; a reset is therefore never observed half-done.

use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use log::{error, info, warn};

use crate::config::SystemConfig;
use crate::error::CommandError;

use super::actuator::ActuatorController;
use super::command::{self, Angle};
use super::events::AppEvent;
use super::ports::{ActuatorPort, EventSink};
use super::snapshot::{self, PositionView, RootView, StatsView};
use super::stats::IntervalStats;
use super::stress::StressTransition;

/// The service behind the single mutex shared with the query server.
pub type SharedReceiver = Arc<Mutex<ReceiverService>>;

/// Lock the shared service.
///
/// Every mutation completes before its guard drops, so a poisoned lock
/// still holds consistent state and is recovered rather than propagated.
pub fn lock(shared: &Mutex<ReceiverService>) -> MutexGuard<'_, ReceiverService> {
    shared.lock().unwrap_or_else(PoisonError::into_inner)
}

// ───────────────────────────────────────────────────────────────
// ReceiverService
// ───────────────────────────────────────────────────────────────

pub struct ReceiverService {
    actuator: ActuatorController,
    stats: IntervalStats,
}

impl ReceiverService {
    /// Construct the service from configuration.
    ///
    /// Does **not** touch the servos. Call [`start`](Self::start) next.
    pub fn new(config: &SystemConfig) -> Self {
        let initial = Angle::new(config.initial_position_deg).unwrap_or(Angle::CENTRE);
        Self {
            actuator: ActuatorController::new(initial),
            stats: IntervalStats::new(config.stress()),
        }
    }

    pub fn shared(self) -> SharedReceiver {
        Arc::new(Mutex::new(self))
    }

    // ── Lifecycle ─────────────────────────────────────────────

    /// Drive both axes to their initial position.
    pub fn start(&mut self, hw: &mut impl ActuatorPort, sink: &mut impl EventSink) {
        if let Err(e) = self.actuator.home(hw) {
            error!("Servo homing failed: {}", e);
        }
        let initial = self.actuator.position();
        sink.emit(&AppEvent::Started { initial });
        info!("ReceiverService started at {}", initial);
    }

    // ── Ingestion ─────────────────────────────────────────────

    /// Parse, apply and account for one command line received at `now_us`.
    ///
    /// A rejected line only bumps the parse-error counter. A driver
    /// failure leaves the position and every counter untouched.
    pub fn handle_line(
        &mut self,
        line: &str,
        now_us: u64,
        hw: &mut impl ActuatorPort,
        sink: &mut impl EventSink,
    ) -> Result<Angle, CommandError> {
        let angle = match command::parse(line) {
            Ok(angle) => angle,
            Err(error) => {
                let parse_errors = self.stats.record_rejection();
                warn!("Rejected {:?}: {}", line, error);
                sink.emit(&AppEvent::CommandRejected {
                    error,
                    parse_errors,
                });
                return Err(error.into());
            }
        };

        if let Err(e) = self.actuator.apply(angle, hw) {
            error!("Servo write to {} failed: {}", angle, e);
            sink.emit(&AppEvent::ActuatorFault { angle, error: e });
            return Err(e.into());
        }

        let transitions = self.stats.record_arrival(now_us);
        sink.emit(&AppEvent::AngleApplied {
            angle,
            total_messages: self.stats.total_messages(),
        });
        for t in transitions {
            Self::emit_transition(t, sink);
        }
        Ok(angle)
    }

    /// Age out a stress episode whose quiet period has passed.
    pub fn expire_idle(&mut self, now_us: u64, sink: &mut impl EventSink) {
        if let Some(t) = self.stats.expire_idle(now_us) {
            Self::emit_transition(t, sink);
        }
    }

    // ── Reset ─────────────────────────────────────────────────

    /// Return every aggregate counter to its startup value.
    /// The servo position is not statistics and is kept.
    pub fn reset_stats(&mut self, sink: &mut impl EventSink) {
        self.stats.reset();
        sink.emit(&AppEvent::StatsReset);
    }

    // ── Queries ───────────────────────────────────────────────

    pub fn snapshot(&self, now_us: u64) -> StatsView {
        snapshot::build_stats(self.actuator.state(), &self.stats, now_us)
    }

    pub fn current(&self) -> PositionView {
        snapshot::build_position(self.actuator.state())
    }

    pub fn root(&self) -> RootView {
        snapshot::build_root(self.actuator.state(), &self.stats)
    }

    pub fn stats(&self) -> &IntervalStats {
        &self.stats
    }

    // ── Internal ──────────────────────────────────────────────

    fn emit_transition(t: StressTransition, sink: &mut impl EventSink) {
        match t {
            StressTransition::Started(ep) => sink.emit(&AppEvent::StressStarted {
                start_us: ep.start_us,
                message_count_at_start: ep.message_count_at_start,
            }),
            StressTransition::Ended(ep) => sink.emit(&AppEvent::StressEnded {
                messages: ep.messages,
                duration_ms: ep.elapsed_ms(ep.last_message_us),
                messages_per_sec: ep.messages_per_sec(ep.last_message_us),
            }),
        }
    }
}
