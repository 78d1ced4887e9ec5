//! Stress-episode detection.
//!
//! A stress episode is a burst of command traffic, the kind the host's
//! `stress` test mode produces. The rule:
//!
//! - An interval at or below `burst_interval_us` is **fast**. A run of
//!   consecutive fast intervals begins at the arrival *preceding* the
//!   first fast interval. A slow interval breaks the run.
//! - **Onset**: when no episode is active and the run reaches
//!   `onset_count`, an episode opens with the run's start time and the
//!   message count before the run's first arrival.
//! - While active, every fast arrival extends the episode
//!   (`last_message_us`, `messages`). Slow arrivals do not.
//! - **End**: once `quiet_period_us` has passed since the last fast
//!   arrival. Checked on every arrival and on every control-loop pass.
//!   The finished episode is kept for reporting until the next onset or
//!   a reset.

use serde::Serialize;

/// Burst-detection thresholds.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StressConfig {
    /// Intervals at or below this are burst traffic (µs).
    pub burst_interval_us: u64,
    /// Consecutive burst intervals needed to open an episode.
    pub onset_count: u16,
    /// Time without burst traffic that closes an episode (µs).
    pub quiet_period_us: u64,
}

impl Default for StressConfig {
    fn default() -> Self {
        Self {
            burst_interval_us: 60_000,
            onset_count: 10,
            quiet_period_us: 1_000_000,
        }
    }
}

/// One detected burst, live or finished.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct StressEpisode {
    pub active: bool,
    /// Arrival time of the burst's first message (µs).
    pub start_us: u64,
    /// `total_messages` before the burst's first message.
    pub message_count_at_start: u64,
    /// Arrival time of the latest fast message in the burst (µs).
    pub last_message_us: u64,
    /// Messages in the burst, first message included.
    pub messages: u64,
}

impl StressEpisode {
    /// True while active, and after it ends until reset / next onset.
    pub fn has_result(&self) -> bool {
        self.active || self.messages > 0
    }

    /// Live elapsed time while active, final duration once ended.
    pub fn elapsed_ms(&self, now_us: u64) -> u64 {
        let end = if self.active { now_us } else { self.last_message_us };
        end.saturating_sub(self.start_us) / 1000
    }

    /// `messages * 1000 / elapsed_ms`; `None` with no episode or zero elapsed time.
    pub fn messages_per_sec(&self, now_us: u64) -> Option<f32> {
        if !self.has_result() {
            return None;
        }
        match self.elapsed_ms(now_us) {
            0 => None,
            ms => Some(self.messages as f32 * 1000.0 / ms as f32),
        }
    }
}

/// Episode state change reported back to the caller.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StressTransition {
    Started(StressEpisode),
    Ended(StressEpisode),
}

/// Tracks the current fast-interval run and the latest episode.
#[derive(Debug, Clone)]
pub struct StressDetector {
    config: StressConfig,
    episode: StressEpisode,
    run_len: u16,
    run_start_us: u64,
    run_start_count: u64,
}

impl StressDetector {
    pub fn new(config: StressConfig) -> Self {
        Self {
            config,
            episode: StressEpisode::default(),
            run_len: 0,
            run_start_us: 0,
            run_start_count: 0,
        }
    }

    /// Close the active episode if its quiet period has elapsed.
    pub fn expire(&mut self, now_us: u64) -> Option<StressTransition> {
        if self.episode.active
            && now_us.saturating_sub(self.episode.last_message_us) >= self.config.quiet_period_us
        {
            self.episode.active = false;
            self.run_len = 0;
            return Some(StressTransition::Ended(self.episode));
        }
        None
    }

    /// Feed one interval.
    ///
    /// * `previous_us` — arrival time of the message before this one.
    /// * `total_messages` — count including this arrival.
    pub fn observe(
        &mut self,
        interval_us: u64,
        previous_us: u64,
        now_us: u64,
        total_messages: u64,
    ) -> Option<StressTransition> {
        if interval_us > self.config.burst_interval_us {
            self.run_len = 0;
            return None;
        }

        if self.run_len == 0 {
            self.run_start_us = previous_us;
            // Both this arrival and the previous one are already counted.
            self.run_start_count = total_messages.saturating_sub(2);
        }
        self.run_len = self.run_len.saturating_add(1);

        if self.episode.active {
            self.episode.last_message_us = now_us;
            self.episode.messages = total_messages - self.episode.message_count_at_start;
            return None;
        }

        if self.run_len >= self.config.onset_count {
            self.episode = StressEpisode {
                active: true,
                start_us: self.run_start_us,
                message_count_at_start: self.run_start_count,
                last_message_us: now_us,
                messages: total_messages - self.run_start_count,
            };
            return Some(StressTransition::Started(self.episode));
        }
        None
    }

    pub fn episode(&self) -> &StressEpisode {
        &self.episode
    }

    /// Forget the episode and any partial run.
    pub fn reset(&mut self) {
        self.episode = StressEpisode::default();
        self.run_len = 0;
        self.run_start_us = 0;
        self.run_start_count = 0;
    }
}
