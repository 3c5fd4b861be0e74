//! Scheduler adapter error types.

use smarthome_domain::error::HomeError;

/// Errors specific to the tokio scheduler.
#[derive(Debug, thiserror::Error)]
pub enum SchedulerError {
    /// The time specification matches none of the accepted formats.
    #[error("invalid time specification {0:?}")]
    InvalidTime(String),

    /// `schedule` was called outside a tokio runtime.
    #[error("no tokio runtime available")]
    NoRuntime(#[source] tokio::runtime::TryCurrentError),
}

impl From<SchedulerError> for HomeError {
    fn from(err: SchedulerError) -> Self {
        Self::Scheduler(Box::new(err))
    }
}
