//! Read-only views of the receiver state for the query interface.
//!
//! Building a view never mutates the aggregator and is valid at any
//! count, including zero. Views are plain serialisable values; turning
//! them into bytes is the renderer's job
//! ([`StatsRenderer`](crate::query::render::StatsRenderer)).

use heapless::Vec;
use serde::Serialize;

use crate::app::actuator::ActuatorState;
use crate::app::command::Angle;
use crate::app::stats::{INTERVAL_HISTORY_SIZE, IntervalStats};
use crate::app::stress::StressEpisode;

/// `GET /current`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct PositionView {
    pub position: Angle,
    pub tilt: Angle,
}

/// `GET /` summary.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct RootView {
    pub pan: Angle,
    pub tilt: Angle,
    pub total_messages: u64,
}

/// Min / max / mean interval in microseconds. Absent until two messages.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct IntervalSummary {
    pub min_us: u64,
    pub max_us: u64,
    pub mean_us: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum EpisodePhase {
    /// No episode since startup / reset.
    None,
    /// Burst in progress; figures are live.
    Active,
    /// Last episode's final figures.
    Finished,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct EpisodeView {
    pub phase: EpisodePhase,
    pub elapsed_ms: u64,
    pub messages: u64,
    pub messages_per_sec: Option<f32>,
}

impl EpisodeView {
    pub fn from_episode(ep: &StressEpisode, now_us: u64) -> Self {
        let phase = if ep.active {
            EpisodePhase::Active
        } else if ep.has_result() {
            EpisodePhase::Finished
        } else {
            EpisodePhase::None
        };
        if phase == EpisodePhase::None {
            return Self {
                phase,
                elapsed_ms: 0,
                messages: 0,
                messages_per_sec: None,
            };
        }
        Self {
            phase,
            elapsed_ms: ep.elapsed_ms(now_us),
            messages: ep.messages,
            messages_per_sec: ep.messages_per_sec(now_us),
        }
    }
}

/// `GET /stats`.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct StatsView {
    pub position: Angle,
    pub tilt: Angle,
    pub total_messages: u64,
    pub parse_errors: u64,
    pub intervals: Option<IntervalSummary>,
    pub stress: EpisodeView,
    /// Retained intervals (µs), oldest first.
    pub history_us: Vec<u64, INTERVAL_HISTORY_SIZE>,
}

/// Assemble the full statistics view at `now_us`.
pub fn build_stats(actuator: ActuatorState, stats: &IntervalStats, now_us: u64) -> StatsView {
    let intervals = match (
        stats.min_interval_us(),
        stats.max_interval_us(),
        stats.mean_interval_us(),
    ) {
        (Some(min_us), Some(max_us), Some(mean_us)) => Some(IntervalSummary {
            min_us,
            max_us,
            mean_us,
        }),
        _ => None,
    };

    StatsView {
        position: actuator.pan,
        tilt: actuator.tilt,
        total_messages: stats.total_messages(),
        parse_errors: stats.parse_errors(),
        intervals,
        stress: EpisodeView::from_episode(stats.episode(), now_us),
        history_us: stats.history(),
    }
}

pub fn build_position(actuator: ActuatorState) -> PositionView {
    PositionView {
        position: actuator.pan,
        tilt: actuator.tilt,
    }
}

pub fn build_root(actuator: ActuatorState, stats: &IntervalStats) -> RootView {
    RootView {
        pan: actuator.pan,
        tilt: actuator.tilt,
        total_messages: stats.total_messages(),
    }
}
