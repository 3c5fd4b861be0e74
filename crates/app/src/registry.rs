//! Device registry — devices in registration order, addressed by stable id.

use smarthome_domain::device::{Device, DeviceStatus};
use smarthome_domain::error::{HomeError, NotFoundError, ValidationError};
use smarthome_domain::id::DeviceId;

/// Ordered collection of devices.
///
/// Iteration follows registration order. Lookup is by [`DeviceId`], so
/// removing a device never changes how the others are addressed.
#[derive(Debug, Default)]
pub struct DeviceRegistry {
    devices: Vec<Device>,
    next_id: DeviceId,
}

fn not_found(id: DeviceId) -> HomeError {
    NotFoundError {
        entity: "Device",
        id: id.to_string(),
    }
    .into()
}

impl DeviceRegistry {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a device under the id it already carries.
    ///
    /// # Errors
    ///
    /// Returns [`ValidationError::DuplicateId`] if the id is taken, or the
    /// device's own validation error.
    pub fn insert(&mut self, device: Device) -> Result<DeviceId, HomeError> {
        device.validate()?;
        if self.contains(device.id) {
            return Err(ValidationError::DuplicateId(device.id.get()).into());
        }
        let id = device.id;
        if id >= self.next_id {
            self.next_id = id.next();
        }
        self.devices.push(device);
        Ok(id)
    }

    /// Add a new device under the next free id.
    ///
    /// # Errors
    ///
    /// Returns [`ValidationError::EmptyKind`] when `kind` is blank.
    pub fn register(
        &mut self,
        kind: impl Into<String>,
        status: DeviceStatus,
    ) -> Result<DeviceId, HomeError> {
        let device = Device::builder()
            .id(self.next_id)
            .kind(kind)
            .status(status)
            .build()?;
        self.insert(device)
    }

    /// Remove and return a device.
    ///
    /// # Errors
    ///
    /// Returns [`HomeError::NotFound`] when no device has this id.
    pub fn remove(&mut self, id: DeviceId) -> Result<Device, HomeError> {
        let index = self
            .devices
            .iter()
            .position(|d| d.id == id)
            .ok_or_else(|| not_found(id))?;
        Ok(self.devices.remove(index))
    }

    /// # Errors
    ///
    /// Returns [`HomeError::NotFound`] when no device has this id.
    pub fn get(&self, id: DeviceId) -> Result<&Device, HomeError> {
        self.devices
            .iter()
            .find(|d| d.id == id)
            .ok_or_else(|| not_found(id))
    }

    /// # Errors
    ///
    /// Returns [`HomeError::NotFound`] when no device has this id.
    pub fn get_mut(&mut self, id: DeviceId) -> Result<&mut Device, HomeError> {
        self.devices
            .iter_mut()
            .find(|d| d.id == id)
            .ok_or_else(|| not_found(id))
    }

    #[must_use]
    pub fn contains(&self, id: DeviceId) -> bool {
        self.devices.iter().any(|d| d.id == id)
    }

    pub fn iter(&self) -> impl Iterator<Item = &Device> {
        self.devices.iter()
    }

    pub fn iter_mut(&mut self) -> impl Iterator<Item = &mut Device> {
        self.devices.iter_mut()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.devices.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.devices.is_empty()
    }
}
