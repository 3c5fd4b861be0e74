//! # smarthome-domain
//!
//! Pure domain model for the smarthome controller.
//!
//! ## Responsibilities
//! - Foundational types: typed identifiers, error conventions
//! - Define **Devices** (things with an on/off status and at most one bound trigger)
//! - Define **Triggers** (condition → reaction, plus the ordered observer list)
//! - Contain all invariant enforcement and domain logic
//!
//! ## Dependency rule
//! This crate has **no internal dependencies**.
//! It must never import anything from `app`, adapters, or external IO crates.
//! All IO boundaries are expressed as traits in the `app` crate (ports).

pub mod error;
pub mod id;

pub mod device;
pub mod trigger;
