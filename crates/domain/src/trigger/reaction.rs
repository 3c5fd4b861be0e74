//! Reaction — what a device does when its trigger fires.

use serde::{Deserialize, Serialize};

/// Closed set of state transitions a trigger can drive.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Reaction {
    TurnOn,
    TurnOff,
    /// Fires without touching the device.
    None,
}

impl Reaction {
    /// Interpret the free-text `action` of an `addTrigger` command.
    ///
    /// Accepts `on`/`off` and the command names `turnOn`/`turnOff`, in any
    /// case and optionally in call form (`turnOff()`, `turnOff(2)`). The
    /// argument of a call form is ignored: a reaction always targets the
    /// observing device. Returns `None` for anything else.
    #[must_use]
    pub fn parse(action: &str) -> Option<Self> {
        let name = action
            .trim()
            .split('(')
            .next()
            .unwrap_or_default()
            .trim()
            .to_ascii_lowercase();
        match name.as_str() {
            "on" | "turnon" | "turn_on" => Some(Self::TurnOn),
            "off" | "turnoff" | "turn_off" => Some(Self::TurnOff),
            "none" => Some(Self::None),
            _ => None,
        }
    }
}

impl std::fmt::Display for Reaction {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::TurnOn => f.write_str("turn_on"),
            Self::TurnOff => f.write_str("turn_off"),
            Self::None => f.write_str("none"),
        }
    }
}
