//! Device — something in the house that can be switched on and off.

mod status;

pub use status::DeviceStatus;

use serde::{Deserialize, Serialize};

use crate::error::{HomeError, ValidationError};
use crate::id::{DeviceId, TriggerId};
use crate::trigger::Reaction;

/// A registered device.
///
/// `trigger` is a non-owning reference into the controller's trigger list.
/// The controller keeps it consistent when triggers come and go.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Device {
    pub id: DeviceId,
    /// Free-text category label, e.g. `"light"` or `"lock"`.
    pub kind: String,
    pub status: DeviceStatus,
    #[serde(skip)]
    pub trigger: Option<TriggerId>,
}

impl Device {
    /// Create a builder for constructing a [`Device`].
    #[must_use]
    pub fn builder() -> DeviceBuilder {
        DeviceBuilder::default()
    }

    /// Check domain invariants.
    ///
    /// # Errors
    ///
    /// Returns [`HomeError::Validation`] when `kind` is blank.
    pub fn validate(&self) -> Result<(), HomeError> {
        if self.kind.trim().is_empty() {
            return Err(ValidationError::EmptyKind.into());
        }
        Ok(())
    }

    pub fn turn_on(&mut self) {
        self.status = DeviceStatus::On;
    }

    pub fn turn_off(&mut self) {
        self.status = DeviceStatus::Off;
    }

    /// Apply the reaction carried by a trigger that just fired.
    pub fn apply(&mut self, reaction: Reaction) {
        match reaction {
            Reaction::TurnOn => self.turn_on(),
            Reaction::TurnOff => self.turn_off(),
            Reaction::None => {}
        }
    }

    /// Human-readable status line, e.g. `light 0 is on.`
    #[must_use]
    pub fn status_line(&self) -> String {
        format!("{} {} is {}.", self.kind, self.id, self.status)
    }
}

/// Step-by-step builder for [`Device`].
#[derive(Debug, Default)]
pub struct DeviceBuilder {
    id: Option<DeviceId>,
    kind: Option<String>,
    status: Option<DeviceStatus>,
}

impl DeviceBuilder {
    #[must_use]
    pub fn id(mut self, id: DeviceId) -> Self {
        self.id = Some(id);
        self
    }

    #[must_use]
    pub fn kind(mut self, kind: impl Into<String>) -> Self {
        self.kind = Some(kind.into());
        self
    }

    #[must_use]
    pub fn status(mut self, status: DeviceStatus) -> Self {
        self.status = Some(status);
        self
    }

    /// Consume the builder, validate, and return a [`Device`].
    ///
    /// A missing id defaults to `0`; registries usually assign one instead.
    ///
    /// # Errors
    ///
    /// Returns [`HomeError::Validation`] if `kind` is missing or blank.
    pub fn build(self) -> Result<Device, HomeError> {
        let device = Device {
            id: self.id.unwrap_or(DeviceId::new(0)),
            kind: self.kind.unwrap_or_default(),
            status: self.status.unwrap_or_default(),
            trigger: None,
        };
        device.validate()?;
        Ok(device)
    }
}
