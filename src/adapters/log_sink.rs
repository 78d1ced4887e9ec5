//! Log-based event sink adapter.
//!
//! Implements [`EventSink`] by writing structured application events to
//! the ESP-IDF logger (which goes to UART / USB-CDC in production).

use log::{debug, info, warn};

use crate::app::events::AppEvent;
use crate::app::ports::EventSink;

/// Adapter that logs every [`AppEvent`] to the serial console.
#[derive(Debug, Default, Clone, Copy)]
pub struct LogEventSink;

impl LogEventSink {
    pub fn new() -> Self {
        Self
    }
}

impl EventSink for LogEventSink {
    fn emit(&mut self, event: &AppEvent) {
        match event {
            AppEvent::Started { initial } => {
                info!("START | pan={} tilt={}", initial, initial);
            }
            AppEvent::AngleApplied {
                angle,
                total_messages,
            } => {
                debug!("MOVE  | pan={} | total={}", angle, total_messages);
            }
            AppEvent::CommandRejected {
                error,
                parse_errors,
            } => {
                warn!("REJECT| {} | errors={}", error, parse_errors);
            }
            AppEvent::ActuatorFault { angle, error } => {
                warn!("FAULT | pan={} | {}", angle, error);
            }
            AppEvent::StressStarted {
                start_us,
                message_count_at_start,
            } => {
                info!(
                    "STRESS| started at {}us after {} messages",
                    start_us, message_count_at_start
                );
            }
            AppEvent::StressEnded {
                messages,
                duration_ms,
                messages_per_sec,
            } => match messages_per_sec {
                Some(rate) => info!(
                    "STRESS| ended | {} msgs in {}ms = {:.1} msg/s",
                    messages, duration_ms, rate
                ),
                None => info!("STRESS| ended | {} msgs in {}ms", messages, duration_ms),
            },
            AppEvent::StatsReset => {
                info!("RESET | statistics cleared");
            }
        }
    }
}
