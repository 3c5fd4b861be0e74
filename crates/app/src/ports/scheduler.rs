//! Scheduler port — deferred execution of a command.

use smarthome_domain::error::HomeError;
use smarthome_domain::id::DeviceId;

/// A command to run later on behalf of a device.
///
/// When the job fires, its owner feeds [`command`](Self::command) back
/// through [`SmartHome::execute`](crate::controller::SmartHome::execute), so a
/// scheduled `turnOn(3)` behaves exactly like a typed one.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScheduledJob {
    pub device: DeviceId,
    /// Opaque time specification, interpreted by the scheduler.
    pub at: String,
    pub command: String,
}

/// Fire-and-forget timed invocation.
///
/// Delivery is best effort. Retries, if any, belong to the implementation.
pub trait Scheduler {
    /// Register `job` for later execution.
    ///
    /// # Errors
    ///
    /// Returns [`HomeError::Scheduler`] when the time specification is not
    /// understood or the job cannot be queued.
    fn schedule(&self, job: ScheduledJob) -> Result<(), HomeError>;
}

impl<T: Scheduler + ?Sized> Scheduler for std::sync::Arc<T> {
    fn schedule(&self, job: ScheduledJob) -> Result<(), HomeError> {
        (**self).schedule(job)
    }
}
