//! Trigger — a condition bound to the devices observing it.
//!
//! A trigger pairs a [`Condition`] with the [`Reaction`] its observers apply
//! when the condition holds. Observers are plain [`DeviceId`]s; the
//! controller owns both sides and walks the list when it notifies.

mod condition;
mod reaction;

pub use condition::Condition;
pub use reaction::Reaction;

use serde::{Deserialize, Serialize};

use crate::error::{HomeError, ParseError};
use crate::id::{DeviceId, TriggerId};

const TEMPERATURE: &str = "temperature";

/// Which family of trigger this is.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TriggerKind {
    Temperature,
    /// Any kind without built-in semantics, kept under its given name.
    Custom(String),
}

impl TriggerKind {
    /// Map a kind name to a kind. Names are case-sensitive.
    #[must_use]
    pub fn from_name(name: &str) -> Self {
        match name {
            TEMPERATURE => Self::Temperature,
            other => Self::Custom(other.to_string()),
        }
    }

    /// The name `removeTrigger` matches against.
    #[must_use]
    pub fn name(&self) -> &str {
        match self {
            Self::Temperature => TEMPERATURE,
            Self::Custom(name) => name,
        }
    }
}

impl std::fmt::Display for TriggerKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

/// A condition, its reaction and the ordered list of observing devices.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Trigger {
    pub id: TriggerId,
    pub kind: TriggerKind,
    pub condition: Condition,
    /// The condition text exactly as it was given.
    pub raw_condition: String,
    /// The action text exactly as it was given.
    pub action: String,
    pub reaction: Reaction,
    observers: Vec<DeviceId>,
}

impl Trigger {
    /// Build a trigger from the three textual `addTrigger` arguments.
    ///
    /// `temperature` parses `condition` as the numeric threshold and falls
    /// back to [`Reaction::TurnOff`] when `action` is not recognised. Every
    /// other kind becomes a [`TriggerKind::Custom`] trigger with a
    /// [`Condition::Never`] condition.
    ///
    /// # Errors
    ///
    /// Returns [`ParseError::InvalidThreshold`] when a temperature condition
    /// is not a finite number.
    pub fn from_parts(kind: &str, condition: &str, action: &str) -> Result<Self, HomeError> {
        let kind = TriggerKind::from_name(kind);
        let (parsed, fallback) = match kind {
            TriggerKind::Temperature => {
                let threshold = condition
                    .trim()
                    .parse::<f64>()
                    .ok()
                    .filter(|t| t.is_finite())
                    .ok_or_else(|| ParseError::InvalidThreshold(condition.to_string()))?;
                (Condition::TemperatureAtLeast { threshold }, Reaction::TurnOff)
            }
            TriggerKind::Custom(_) => (Condition::Never, Reaction::None),
        };
        Ok(Self {
            id: TriggerId::new(),
            kind,
            condition: parsed,
            raw_condition: condition.to_string(),
            action: action.to_string(),
            reaction: Reaction::parse(action).unwrap_or(fallback),
            observers: Vec::new(),
        })
    }

    /// Append an observer. Duplicates are kept and notified twice.
    pub fn add_observer(&mut self, device: DeviceId) {
        self.observers.push(device);
    }

    /// Remove the first occurrence of `device`.
    ///
    /// Returns `false` (and does nothing) when it is not observing.
    pub fn remove_observer(&mut self, device: DeviceId) -> bool {
        match self.observers.iter().position(|d| *d == device) {
            Some(index) => {
                self.observers.remove(index);
                true
            }
            None => false,
        }
    }

    pub fn clear_observers(&mut self) {
        self.observers.clear();
    }

    /// Observers in notification order.
    #[must_use]
    pub fn observers(&self) -> &[DeviceId] {
        &self.observers
    }
}
