//! Timer-backed scheduler.
//!
//! Each accepted job gets its own sleeping task. When the timer elapses the
//! job is sent back over an unbounded channel; whoever owns the controller
//! drains that channel and runs the command.

use chrono::Utc;
use tokio::sync::mpsc;

use smarthome_app::ports::{ScheduledJob, Scheduler};
use smarthome_domain::error::HomeError;

use crate::error::SchedulerError;
use crate::time_spec::TimeSpec;

/// [`Scheduler`] implementation on top of tokio timers.
#[derive(Clone)]
pub struct TokioScheduler {
    sender: mpsc::UnboundedSender<ScheduledJob>,
}

impl TokioScheduler {
    /// Create a scheduler and the receiver that due jobs are delivered to.
    #[must_use]
    pub fn channel() -> (Self, mpsc::UnboundedReceiver<ScheduledJob>) {
        let (sender, receiver) = mpsc::unbounded_channel();
        (Self { sender }, receiver)
    }
}

impl Scheduler for TokioScheduler {
    fn schedule(&self, job: ScheduledJob) -> Result<(), HomeError> {
        let spec: TimeSpec = job.at.parse()?;
        let handle = tokio::runtime::Handle::try_current().map_err(SchedulerError::NoRuntime)?;
        let delay = spec.delay_from(Utc::now());
        tracing::info!(
            device_id = %job.device,
            at = %job.at,
            delay_secs = delay.as_secs(),
            command = %job.command,
            "job scheduled"
        );

        let sender = self.sender.clone();
        handle.spawn(async move {
            tokio::time::sleep(delay).await;
            // The receiver only goes away on shutdown; the job is dropped then.
            if sender.send(job).is_err() {
                tracing::debug!("scheduler receiver closed, dropping job");
            }
        });
        Ok(())
    }
}
