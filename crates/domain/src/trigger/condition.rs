//! Condition — the predicate a trigger checks against the outside world.

use serde::{Deserialize, Serialize};

/// What a trigger tests when it is evaluated.
///
/// The predicate needs live readings, so evaluation itself lives in the
/// application layer next to the sensor port. This type only carries the
/// parameters.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Condition {
    /// Holds when the current temperature is at or above `threshold`.
    TemperatureAtLeast { threshold: f64 },
    /// Generic pass-through condition; it is stored but never holds.
    Never,
}

impl Condition {
    /// Whether a temperature reading satisfies this condition.
    #[must_use]
    pub fn holds_for_temperature(&self, current: f64) -> bool {
        match self {
            Self::TemperatureAtLeast { threshold } => current >= *threshold,
            Self::Never => false,
        }
    }
}

impl std::fmt::Display for Condition {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::TemperatureAtLeast { threshold } => write!(f, "temperature >= {threshold}"),
            Self::Never => f.write_str("never"),
        }
    }
}
