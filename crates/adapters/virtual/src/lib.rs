//! # smarthome-adapter-virtual
//!
//! In-process adapters for the controller's ports.
//!
//! | Adapter | Port | Behaviour |
//! |---------|------|-----------|
//! | [`VirtualThermometer`] | `TemperatureSensor` | Returns whatever reading was last set |
//! | [`TokioScheduler`] | `Scheduler` | Sleeps on a tokio timer, then hands the job back over a channel |
//!
//! ## Dependency rule
//!
//! Depends on `smarthome-app` (port traits) and `smarthome-domain` only.

mod error;
mod scheduler;
mod thermometer;
pub mod time_spec;

pub use error::SchedulerError;
pub use scheduler::TokioScheduler;
pub use thermometer::VirtualThermometer;
