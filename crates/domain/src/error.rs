//! Common error types used across the workspace.
//!
//! Each layer defines its own typed errors and converts into [`HomeError`]
//! via `From`. Nothing here is fatal to the process: every variant is meant
//! to be reported to the caller, who keeps accepting commands.

/// Top-level error for every controller operation.
#[derive(Debug, thiserror::Error)]
pub enum HomeError {
    #[error("validation error")]
    Validation(#[from] ValidationError),

    #[error(transparent)]
    NotFound(#[from] NotFoundError),

    #[error(transparent)]
    Parse(#[from] ParseError),

    /// The command name is not part of the grammar.
    #[error("unknown command {0:?}")]
    UnknownCommand(String),

    /// The temperature sensor could not produce a reading.
    #[error("sensor error")]
    Sensor(#[source] Box<dyn std::error::Error + Send + Sync>),

    /// The scheduler refused or could not accept a job.
    #[error("scheduler error")]
    Scheduler(#[source] Box<dyn std::error::Error + Send + Sync>),
}

/// A domain invariant was violated.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ValidationError {
    /// A device kind must be a non-empty label.
    #[error("kind must not be empty")]
    EmptyKind,

    /// A device with this id is already registered.
    #[error("device id {0} is already registered")]
    DuplicateId(u32),
}

/// A lookup did not match anything.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("{entity} {id} not found")]
pub struct NotFoundError {
    pub entity: &'static str,
    pub id: String,
}

/// Malformed command text.
///
/// Offsets are byte positions into the raw command line.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ParseError {
    #[error("empty command")]
    Empty,

    #[error("unexpected character {found:?} at offset {offset}")]
    UnexpectedChar { found: char, offset: usize },

    #[error("expected {expected} at offset {offset}")]
    Expected {
        expected: &'static str,
        offset: usize,
    },

    #[error("unterminated string starting at offset {offset}")]
    UnterminatedString { offset: usize },

    #[error("unexpected trailing input at offset {offset}")]
    TrailingInput { offset: usize },

    #[error("command nested too deeply at offset {offset}")]
    TooDeep { offset: usize },

    #[error("{command} takes {expected} argument(s), got {found}")]
    Arity {
        command: &'static str,
        expected: usize,
        found: usize,
    },

    #[error("invalid device id {0:?}")]
    InvalidDeviceId(String),

    #[error("invalid temperature threshold {0:?}")]
    InvalidThreshold(String),
}
