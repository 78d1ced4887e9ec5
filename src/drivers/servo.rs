//! Hobby servo driver (SG90 / MG90S class).
//!
//! Positions a servo by pulse width on a fixed-period PWM channel:
//!
//! ```text
//! pulse_us = min_pulse + angle · (max_pulse − min_pulse) / 180
//! duty     = pulse_us · max_duty / period_us
//! ```
//!
//! ## Dual-target design
//!
//! The driver is generic over [`SetDutyCycle`]. On ESP-IDF it wraps a
//! LEDC channel; on host/test any mock channel will do.

use embedded_hal::pwm::SetDutyCycle;
use log::warn;

use crate::app::command::{ANGLE_MAX, Angle};
use crate::config::SystemConfig;
use crate::error::ActuatorError;

/// Pulse-width calibration and PWM frame rate.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ServoTiming {
    pub min_pulse_us: u16,
    pub max_pulse_us: u16,
    pub pwm_hz: u32,
}

impl ServoTiming {
    pub fn from_config(config: &SystemConfig) -> Self {
        Self {
            min_pulse_us: config.servo_min_pulse_us,
            max_pulse_us: config.servo_max_pulse_us,
            pwm_hz: config.servo_pwm_hz,
        }
    }

    pub fn period_us(&self) -> u32 {
        1_000_000 / self.pwm_hz.max(1)
    }

    pub fn pulse_us(&self, angle: Angle) -> u32 {
        let min = u32::from(self.min_pulse_us);
        let span = u32::from(self.max_pulse_us.saturating_sub(self.min_pulse_us));
        min + u32::from(angle.degrees()) * span / u32::from(ANGLE_MAX)
    }

    /// Duty value for `angle` on a channel whose full scale is `max_duty`.
    pub fn duty(&self, angle: Angle, max_duty: u16) -> u16 {
        let duty = u64::from(self.pulse_us(angle)) * u64::from(max_duty)
            / u64::from(self.period_us());
        u16::try_from(duty).unwrap_or(max_duty).min(max_duty)
    }
}

pub struct ServoDriver<P: SetDutyCycle> {
    pwm: P,
    timing: ServoTiming,
    angle: Option<Angle>,
}

impl<P: SetDutyCycle> ServoDriver<P> {
    pub fn new(pwm: P, timing: ServoTiming) -> Self {
        Self {
            pwm,
            timing,
            angle: None,
        }
    }

    /// Drive the servo to `angle`. The tracked angle only changes when
    /// the channel accepts the new duty.
    pub fn set_angle(&mut self, angle: Angle) -> Result<(), ActuatorError> {
        let duty = self.timing.duty(angle, self.pwm.max_duty_cycle());
        self.pwm.set_duty_cycle(duty).map_err(|e| {
            warn!("PWM duty {} rejected: {:?}", duty, e);
            ActuatorError::PwmWriteFailed
        })?;
        self.angle = Some(angle);
        Ok(())
    }

    /// Last angle written successfully; `None` before the first write.
    pub fn angle(&self) -> Option<Angle> {
        self.angle
    }
}
