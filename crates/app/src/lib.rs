//! # smarthome-app
//!
//! Application layer — the controller, the command interpreter and
//! **port definitions** (traits).
//!
//! ## Responsibilities
//! - Define **port traits** that adapters must implement:
//!   - `TemperatureSensor` — current ambient temperature
//!   - `Scheduler` — deferred execution of a command string
//! - Parse the textual command grammar into typed `Command`s
//! - Evaluate triggers against live sensor readings
//! - Own the device registry and trigger list (`SmartHome`) and dispatch
//!   commands against them
//!
//! ## Dependency rule
//! Depends on `smarthome-domain` only (plus `tracing`, and `chumsky` for the
//! command grammar).
//! Never imports adapter crates. Adapters depend on *this* crate, not the reverse.

pub mod command;
pub mod controller;
pub mod evaluation;
pub mod ports;
pub mod registry;
