//! Hardware adapter — bridges the servo drivers to the domain port trait.
//!
//! Owns both [`ServoDriver`]s and exposes them through [`ActuatorPort`].
//! This is the only module in the system that commands the servos. On
//! ESP-IDF the PWM channels are LEDC drivers; in tests they are mocks.

use embedded_hal::pwm::SetDutyCycle;

use crate::app::command::Angle;
use crate::app::ports::ActuatorPort;
use crate::drivers::servo::ServoDriver;
use crate::error::ActuatorError;

/// Concrete adapter that combines the pan and tilt servos.
pub struct ServoAdapter<P: SetDutyCycle, T: SetDutyCycle> {
    pan: ServoDriver<P>,
    tilt: ServoDriver<T>,
}

impl<P: SetDutyCycle, T: SetDutyCycle> ServoAdapter<P, T> {
    pub fn new(pan: ServoDriver<P>, tilt: ServoDriver<T>) -> Self {
        Self { pan, tilt }
    }

    pub fn pan(&self) -> &ServoDriver<P> {
        &self.pan
    }

    pub fn tilt(&self) -> &ServoDriver<T> {
        &self.tilt
    }
}

// ── ActuatorPort implementation ───────────────────────────────

impl<P: SetDutyCycle, T: SetDutyCycle> ActuatorPort for ServoAdapter<P, T> {
    fn write_pan(&mut self, angle: Angle) -> Result<(), ActuatorError> {
        self.pan.set_angle(angle)
    }

    fn write_tilt(&mut self, angle: Angle) -> Result<(), ActuatorError> {
        self.tilt.set_angle(angle)
    }
}
