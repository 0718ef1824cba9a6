//! Unified error types for the Aura SMBus crate.
//!
//! A single `Error` enum that every subsystem converts into, keeping the
//! caller's error handling uniform.  All variants are `Copy` so a failed
//! register write can be stored in a run report without allocation.

use core::fmt;

use crate::app::ports::TransportError;
use crate::color::ChannelError;

// ---------------------------------------------------------------------------
// Top-level error
// ---------------------------------------------------------------------------

/// Every fallible operation in the library funnels into this type.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Error {
    /// A bus transaction failed.
    Transport(TransportError),
    /// A colour channel argument was rejected.
    Channel(ChannelError),
    /// Configuration is invalid or could not be loaded.
    Config(&'static str),
    /// Index does not name a registered controller.
    NoSuchController(usize),
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Transport(e) => write!(f, "transport: {e}"),
            Self::Channel(e) => write!(f, "argument: {e}"),
            Self::Config(msg) => write!(f, "config: {msg}"),
            Self::NoSuchController(i) => write!(f, "no controller at index {i}"),
        }
    }
}

impl std::error::Error for Error {}

impl From<TransportError> for Error {
    fn from(e: TransportError) -> Self {
        Self::Transport(e)
    }
}

impl From<ChannelError> for Error {
    fn from(e: ChannelError) -> Self {
        Self::Channel(e)
    }
}

// ---------------------------------------------------------------------------
// Convenience Result alias
// ---------------------------------------------------------------------------

/// Crate-wide `Result` alias.
pub type Result<T> = core::result::Result<T, Error>;
