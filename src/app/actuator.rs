//! Actuator controller — the only writer of the servo position.

use log::debug;
use serde::Serialize;

use crate::app::command::Angle;
use crate::app::ports::ActuatorPort;
use crate::error::ActuatorError;

/// Last applied position of each axis.
///
/// Tilt is driven once at start-up and tracked nominally; the command
/// stream only carries pan.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct ActuatorState {
    pub pan: Angle,
    pub tilt: Angle,
}

pub struct ActuatorController {
    state: ActuatorState,
}

impl ActuatorController {
    pub fn new(initial: Angle) -> Self {
        Self {
            state: ActuatorState {
                pan: initial,
                tilt: initial,
            },
        }
    }

    /// Drive both axes to the recorded start positions.
    pub fn home(&mut self, hw: &mut impl ActuatorPort) -> Result<(), ActuatorError> {
        hw.write_pan(self.state.pan)?;
        hw.write_tilt(self.state.tilt)
    }

    /// Move the pan servo. The recorded position only changes once the
    /// driver has accepted the write.
    pub fn apply(&mut self, angle: Angle, hw: &mut impl ActuatorPort) -> Result<(), ActuatorError> {
        hw.write_pan(angle)?;
        self.state.pan = angle;
        debug!("pan -> {}", angle);
        Ok(())
    }

    pub fn state(&self) -> ActuatorState {
        self.state
    }

    pub fn position(&self) -> Angle {
        self.state.pan
    }
}
