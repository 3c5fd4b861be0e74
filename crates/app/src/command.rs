//! Command interpreter — text in, typed [`Command`] out.
//!
//! Parsing happens in two steps: [`RawCommand::parse`] splits a line into a
//! name and string arguments, then [`Command::try_from`] checks the name,
//! the arity and coerces arguments to their target types.

mod lexer;
mod parser;

pub use parser::RawCommand;

use std::str::FromStr;

use smarthome_domain::error::{HomeError, ParseError};
use smarthome_domain::id::DeviceId;

/// Every command name the interpreter understands.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CommandName {
    TurnOn,
    TurnOff,
    Schedule,
    AddTrigger,
    RemoveTrigger,
    ViewStatus,
}

impl CommandName {
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::TurnOn => "turnOn",
            Self::TurnOff => "turnOff",
            Self::Schedule => "schedule",
            Self::AddTrigger => "addTrigger",
            Self::RemoveTrigger => "removeTrigger",
            Self::ViewStatus => "viewStatus",
        }
    }

    /// Number of arguments the command takes.
    #[must_use]
    pub fn arity(self) -> usize {
        match self {
            Self::ViewStatus => 0,
            Self::TurnOn | Self::TurnOff | Self::RemoveTrigger => 1,
            Self::Schedule | Self::AddTrigger => 3,
        }
    }
}

impl FromStr for CommandName {
    type Err = HomeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "turnOn" => Ok(Self::TurnOn),
            "turnOff" => Ok(Self::TurnOff),
            "schedule" => Ok(Self::Schedule),
            "addTrigger" => Ok(Self::AddTrigger),
            "removeTrigger" => Ok(Self::RemoveTrigger),
            "viewStatus" => Ok(Self::ViewStatus),
            other => Err(HomeError::UnknownCommand(other.to_string())),
        }
    }
}

impl std::fmt::Display for CommandName {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A fully typed instruction, ready for dispatch.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    TurnOn {
        device: DeviceId,
    },
    TurnOff {
        device: DeviceId,
    },
    Schedule {
        device: DeviceId,
        at: String,
        command: String,
    },
    AddTrigger {
        kind: String,
        condition: String,
        action: String,
    },
    RemoveTrigger {
        kind: String,
    },
    ViewStatus,
}

impl Command {
    /// Parse and type a command line.
    ///
    /// # Errors
    ///
    /// Returns [`HomeError::Parse`] for malformed text, wrong arity or a
    /// non-numeric device id, and [`HomeError::UnknownCommand`] for names
    /// outside the grammar.
    pub fn parse(line: &str) -> Result<Self, HomeError> {
        RawCommand::parse(line)?.try_into()
    }

    #[must_use]
    pub fn name(&self) -> CommandName {
        match self {
            Self::TurnOn { .. } => CommandName::TurnOn,
            Self::TurnOff { .. } => CommandName::TurnOff,
            Self::Schedule { .. } => CommandName::Schedule,
            Self::AddTrigger { .. } => CommandName::AddTrigger,
            Self::RemoveTrigger { .. } => CommandName::RemoveTrigger,
            Self::ViewStatus => CommandName::ViewStatus,
        }
    }
}

fn device_id(raw: &str) -> Result<DeviceId, ParseError> {
    raw.parse()
        .map_err(|_| ParseError::InvalidDeviceId(raw.to_string()))
}

impl TryFrom<RawCommand> for Command {
    type Error = HomeError;

    fn try_from(raw: RawCommand) -> Result<Self, Self::Error> {
        let name: CommandName = raw.name.parse()?;
        if raw.args.len() != name.arity() {
            return Err(ParseError::Arity {
                command: name.as_str(),
                expected: name.arity(),
                found: raw.args.len(),
            }
            .into());
        }

        let mut args = raw.args.into_iter();
        let mut next = || args.next().unwrap_or_default();

        let command = match name {
            CommandName::TurnOn => Self::TurnOn {
                device: device_id(&next())?,
            },
            CommandName::TurnOff => Self::TurnOff {
                device: device_id(&next())?,
            },
            CommandName::Schedule => Self::Schedule {
                device: device_id(&next())?,
                at: next(),
                command: next(),
            },
            CommandName::AddTrigger => Self::AddTrigger {
                kind: next(),
                condition: next(),
                action: next(),
            },
            CommandName::RemoveTrigger => Self::RemoveTrigger { kind: next() },
            CommandName::ViewStatus => Self::ViewStatus,
        };
        Ok(command)
    }
}
