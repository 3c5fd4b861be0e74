//! Sensor port — where temperature readings come from.

use smarthome_domain::error::HomeError;

/// Source of the current ambient temperature.
///
/// Implementations must return a fresh reading on every call; triggers
/// never cache a previous value.
pub trait TemperatureSensor {
    /// Read the current temperature.
    ///
    /// # Errors
    ///
    /// Returns [`HomeError::Sensor`] when no reading is available.
    fn temperature(&self) -> Result<f64, HomeError>;
}

impl<T: TemperatureSensor + ?Sized> TemperatureSensor for std::sync::Arc<T> {
    fn temperature(&self) -> Result<f64, HomeError> {
        (**self).temperature()
    }
}

impl<T: TemperatureSensor + ?Sized> TemperatureSensor for &T {
    fn temperature(&self) -> Result<f64, HomeError> {
        (**self).temperature()
    }
}
