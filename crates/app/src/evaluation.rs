//! Trigger evaluation against live sensor readings.

use smarthome_domain::error::HomeError;
use smarthome_domain::trigger::{Condition, Trigger};

use crate::ports::TemperatureSensor;

/// Something that can be checked against the current state of the world.
pub trait Evaluate {
    /// Re-read whatever the condition depends on and test it.
    ///
    /// # Errors
    ///
    /// Propagates [`HomeError::Sensor`] from the sensor port.
    fn evaluate<S: TemperatureSensor + ?Sized>(&self, sensor: &S) -> Result<bool, HomeError>;
}

impl Evaluate for Condition {
    fn evaluate<S: TemperatureSensor + ?Sized>(&self, sensor: &S) -> Result<bool, HomeError> {
        match self {
            Self::TemperatureAtLeast { .. } => {
                let current = sensor.temperature()?;
                Ok(self.holds_for_temperature(current))
            }
            // Nothing to read: a generic condition never holds.
            Self::Never => Ok(false),
        }
    }
}

impl Evaluate for Trigger {
    fn evaluate<S: TemperatureSensor + ?Sized>(&self, sensor: &S) -> Result<bool, HomeError> {
        let fired = self.condition.evaluate(sensor)?;
        tracing::trace!(trigger = %self.id, kind = %self.kind, fired, "evaluated trigger");
        Ok(fired)
    }
}
