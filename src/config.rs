//! System configuration parameters
//!
//! All tunable parameters for the PanTilt receiver. Defaults match the
//! bench setup (SG90-class servo on a 50 Hz PWM channel, host sending
//! one angle per line at 115200 baud).

use serde::{Deserialize, Serialize};

use crate::app::stress::StressConfig;

/// Errors from configuration loading and validation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConfigError {
    /// The config document could not be deserialised.
    Malformed,
    /// A config field failed range validation.
    /// The `&'static str` describes which field and why.
    ValidationFailed(&'static str),
}

impl core::fmt::Display for ConfigError {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            Self::Malformed => write!(f, "config malformed"),
            Self::ValidationFailed(msg) => write!(f, "validation failed: {}", msg),
        }
    }
}

impl From<ConfigError> for crate::error::Error {
    fn from(e: ConfigError) -> Self {
        match e {
            ConfigError::Malformed => Self::Config("malformed"),
            ConfigError::ValidationFailed(msg) => Self::Config(msg),
        }
    }
}

/// Core system configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SystemConfig {
    // --- Servo ---
    /// Pulse width at 0 degrees (microseconds)
    pub servo_min_pulse_us: u16,
    /// Pulse width at 180 degrees (microseconds)
    pub servo_max_pulse_us: u16,
    /// Servo PWM frequency (Hz)
    pub servo_pwm_hz: u32,
    /// Position both axes are driven to at boot (degrees)
    pub initial_position_deg: u8,

    // --- Links ---
    /// Command UART baud rate
    pub serial_baud: u32,
    /// Query server TCP port
    pub http_port: u16,

    // --- Timing ---
    /// Delay at the end of each control loop iteration (milliseconds)
    pub loop_delay_ms: u32,

    // --- Stress detection ---
    /// Intervals at or below this count as burst traffic (microseconds)
    pub stress_burst_interval_us: u64,
    /// Consecutive burst intervals required to open an episode
    pub stress_onset_count: u16,
    /// Time without burst traffic that closes an episode (milliseconds)
    pub stress_quiet_period_ms: u64,
}

impl Default for SystemConfig {
    fn default() -> Self {
        Self {
            // Servo
            servo_min_pulse_us: 544,
            servo_max_pulse_us: 2400,
            servo_pwm_hz: 50,
            initial_position_deg: 90, // centre

            // Links
            serial_baud: 115_200,
            http_port: 80,

            // Timing
            loop_delay_ms: 10,

            // Stress detection
            stress_burst_interval_us: 60_000, // host stress script sends every 50 ms
            stress_onset_count: 10,
            stress_quiet_period_ms: 1000,
        }
    }
}

impl SystemConfig {
    /// Deserialise a JSON document and validate it.
    ///
    /// Missing fields fall back to their defaults.
    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        let cfg: Self = serde_json::from_str(json).map_err(|_| ConfigError::Malformed)?;
        cfg.validate()?;
        Ok(cfg)
    }

    /// Reject out-of-range values rather than clamping them.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if !(400..=2600).contains(&self.servo_min_pulse_us) {
            return Err(ConfigError::ValidationFailed(
                "servo_min_pulse_us must be 400–2600",
            ));
        }
        if !(400..=2600).contains(&self.servo_max_pulse_us) {
            return Err(ConfigError::ValidationFailed(
                "servo_max_pulse_us must be 400–2600",
            ));
        }
        if self.servo_min_pulse_us >= self.servo_max_pulse_us {
            return Err(ConfigError::ValidationFailed(
                "servo_min_pulse_us must be < servo_max_pulse_us",
            ));
        }
        if !(40..=400).contains(&self.servo_pwm_hz) {
            return Err(ConfigError::ValidationFailed("servo_pwm_hz must be 40–400"));
        }
        if u32::from(self.servo_max_pulse_us) >= 1_000_000 / self.servo_pwm_hz {
            return Err(ConfigError::ValidationFailed(
                "servo_max_pulse_us must fit inside one PWM period",
            ));
        }
        if self.initial_position_deg > 180 {
            return Err(ConfigError::ValidationFailed(
                "initial_position_deg must be 0–180",
            ));
        }
        if self.serial_baud == 0 {
            return Err(ConfigError::ValidationFailed("serial_baud must be > 0"));
        }
        if self.loop_delay_ms > 1000 {
            return Err(ConfigError::ValidationFailed(
                "loop_delay_ms must be 0–1000",
            ));
        }
        if self.stress_burst_interval_us == 0 {
            return Err(ConfigError::ValidationFailed(
                "stress_burst_interval_us must be > 0",
            ));
        }
        if self.stress_onset_count == 0 {
            return Err(ConfigError::ValidationFailed(
                "stress_onset_count must be > 0",
            ));
        }
        if self.stress_quiet_period_ms.saturating_mul(1000) <= self.stress_burst_interval_us {
            return Err(ConfigError::ValidationFailed(
                "stress_quiet_period_ms must exceed stress_burst_interval_us",
            ));
        }
        Ok(())
    }

    /// Stress-detection thresholds for the aggregator.
    pub fn stress(&self) -> StressConfig {
        StressConfig {
            burst_interval_us: self.stress_burst_interval_us,
            onset_count: self.stress_onset_count,
            quiet_period_us: self.stress_quiet_period_ms.saturating_mul(1000),
        }
    }
}
