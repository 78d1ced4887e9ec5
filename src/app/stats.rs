//! Inter-arrival interval statistics.
//!
//! [`IntervalStats`] is the single owner of every aggregate counter:
//! message and parse-error counts, running min / max / sum of intervals,
//! a fixed ring of the last [`INTERVAL_HISTORY_SIZE`] intervals, and the
//! stress-episode detector. It is updated once per applied command and
//! read by the snapshot builder.
//!
//! All times are microseconds on the monotonic uptime clock.

use heapless::Vec;

use super::stress::{StressConfig, StressDetector, StressEpisode, StressTransition};

/// Number of intervals retained for the history view.
pub const INTERVAL_HISTORY_SIZE: usize = 100;

/// `min_interval_us` before any interval has been recorded.
const NO_SAMPLE: u64 = u64::MAX;

// ───────────────────────────────────────────────────────────────
// Interval ring
// ───────────────────────────────────────────────────────────────

/// Fixed-capacity ring of interval samples with a write cursor.
///
/// Once full, each write overwrites the oldest sample. The cursor always
/// points at the slot the next sample goes into.
#[derive(Debug, Clone)]
pub struct IntervalHistory {
    samples: [u64; INTERVAL_HISTORY_SIZE],
    cursor: usize,
}

impl Default for IntervalHistory {
    fn default() -> Self {
        Self::new()
    }
}

impl IntervalHistory {
    pub const fn new() -> Self {
        Self {
            samples: [0; INTERVAL_HISTORY_SIZE],
            cursor: 0,
        }
    }

    pub fn push(&mut self, interval_us: u64) {
        self.samples[self.cursor] = interval_us;
        self.cursor = (self.cursor + 1) % INTERVAL_HISTORY_SIZE;
    }

    pub fn cursor(&self) -> usize {
        self.cursor
    }

    /// The newest `count` samples (capped at capacity), oldest first.
    pub fn ordered(&self, count: usize) -> Vec<u64, INTERVAL_HISTORY_SIZE> {
        let count = count.min(INTERVAL_HISTORY_SIZE);
        let start = (self.cursor + INTERVAL_HISTORY_SIZE - count) % INTERVAL_HISTORY_SIZE;
        (0..count)
            .map(|i| self.samples[(start + i) % INTERVAL_HISTORY_SIZE])
            .collect()
    }

    /// Zero every slot and rewind the cursor.
    pub fn clear(&mut self) {
        self.samples = [0; INTERVAL_HISTORY_SIZE];
        self.cursor = 0;
    }

    pub fn slots(&self) -> &[u64; INTERVAL_HISTORY_SIZE] {
        &self.samples
    }
}

// ───────────────────────────────────────────────────────────────
// Aggregator
// ───────────────────────────────────────────────────────────────

/// Stress transitions produced by one arrival (an end and a new onset
/// can coincide when `onset_count` is 1).
pub type Transitions = Vec<StressTransition, 2>;

/// Aggregate counters for the incoming command stream.
#[derive(Debug, Clone)]
pub struct IntervalStats {
    total_messages: u64,
    parse_errors: u64,
    min_interval_us: u64,
    max_interval_us: u64,
    sum_intervals_us: u64,
    last_message_us: Option<u64>,
    history: IntervalHistory,
    stress: StressDetector,
}

impl IntervalStats {
    pub fn new(stress: StressConfig) -> Self {
        Self {
            total_messages: 0,
            parse_errors: 0,
            min_interval_us: NO_SAMPLE,
            max_interval_us: 0,
            sum_intervals_us: 0,
            last_message_us: None,
            history: IntervalHistory::new(),
            stress: StressDetector::new(stress),
        }
    }

    /// Record one successfully applied command arriving at `now_us`.
    pub fn record_arrival(&mut self, now_us: u64) -> Transitions {
        let mut transitions = Transitions::new();

        let previous = self.last_message_us;
        let interval = previous.map(|prev| now_us.saturating_sub(prev));

        if let Some(interval) = interval {
            self.min_interval_us = self.min_interval_us.min(interval);
            self.max_interval_us = self.max_interval_us.max(interval);
            self.sum_intervals_us = self.sum_intervals_us.saturating_add(interval);
            self.history.push(interval);
        }
        self.total_messages += 1;
        self.last_message_us = Some(now_us);

        if let Some(t) = self.stress.expire(now_us) {
            let _ = transitions.push(t);
        }
        if let (Some(prev), Some(interval)) = (previous, interval) {
            if let Some(t) = self.stress.observe(interval, prev, now_us, self.total_messages) {
                let _ = transitions.push(t);
            }
        }
        transitions
    }

    /// Count a rejected command line. Returns the new error count.
    pub fn record_rejection(&mut self) -> u64 {
        self.parse_errors += 1;
        self.parse_errors
    }

    /// Close a stress episode whose quiet period has passed.
    pub fn expire_idle(&mut self, now_us: u64) -> Option<StressTransition> {
        self.stress.expire(now_us)
    }

    /// Return every counter, the ring, and the episode to startup values.
    pub fn reset(&mut self) {
        self.total_messages = 0;
        self.parse_errors = 0;
        self.min_interval_us = NO_SAMPLE;
        self.max_interval_us = 0;
        self.sum_intervals_us = 0;
        self.last_message_us = None;
        self.history.clear();
        self.stress.reset();
    }

    // ── Queries ───────────────────────────────────────────────

    pub fn total_messages(&self) -> u64 {
        self.total_messages
    }

    pub fn parse_errors(&self) -> u64 {
        self.parse_errors
    }

    /// Number of intervals recorded since the last reset.
    pub fn interval_count(&self) -> u64 {
        self.total_messages.saturating_sub(1)
    }

    pub fn min_interval_us(&self) -> Option<u64> {
        (self.min_interval_us != NO_SAMPLE).then_some(self.min_interval_us)
    }

    pub fn max_interval_us(&self) -> Option<u64> {
        (self.interval_count() > 0).then_some(self.max_interval_us)
    }

    pub fn sum_intervals_us(&self) -> u64 {
        self.sum_intervals_us
    }

    /// `sum / (total - 1)`; `None` until two messages have arrived.
    pub fn mean_interval_us(&self) -> Option<f64> {
        if self.total_messages <= 1 {
            return None;
        }
        let intervals = (self.total_messages - 1) as f64;
        Some(self.sum_intervals_us as f64 / intervals)
    }

    /// Retained intervals, oldest first.
    pub fn history(&self) -> Vec<u64, INTERVAL_HISTORY_SIZE> {
        let count = usize::try_from(self.interval_count()).unwrap_or(usize::MAX);
        self.history.ordered(count)
    }

    pub fn history_ring(&self) -> &IntervalHistory {
        &self.history
    }

    pub fn last_message_us(&self) -> Option<u64> {
        self.last_message_us
    }

    pub fn episode(&self) -> &StressEpisode {
        self.stress.episode()
    }
}
