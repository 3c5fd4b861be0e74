//! Virtual thermometer — a reading that can be set from outside.

use std::sync::Mutex;

use smarthome_app::ports::TemperatureSensor;
use smarthome_domain::error::HomeError;

/// A simulated temperature sensor.
///
/// Share it behind an `Arc` to change the reading while the controller
/// holds it.
pub struct VirtualThermometer {
    reading: Mutex<f64>,
}

impl Default for VirtualThermometer {
    fn default() -> Self {
        Self::new(21.5)
    }
}

impl VirtualThermometer {
    #[must_use]
    pub fn new(initial: f64) -> Self {
        Self {
            reading: Mutex::new(initial),
        }
    }

    /// Replace the current reading.
    pub fn set(&self, value: f64) {
        let mut reading = self
            .reading
            .lock()
            .unwrap_or_else(std::sync::PoisonError::into_inner);
        *reading = value;
        tracing::debug!(temperature = value, "virtual reading changed");
    }

    #[must_use]
    pub fn get(&self) -> f64 {
        *self
            .reading
            .lock()
            .unwrap_or_else(std::sync::PoisonError::into_inner)
    }
}

impl TemperatureSensor for VirtualThermometer {
    fn temperature(&self) -> Result<f64, HomeError> {
        Ok(self.get())
    }
}
