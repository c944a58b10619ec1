//! Unified error type for the upbox facade.
//!
//! Wraps the errors of the underlying crates behind one type so callers of
//! [`Upbox`](crate::Upbox) handle a single `Result`.

use thiserror::Error;
use upbox_core::{ErrorCode, Value};
use upbox_engine::ConfigError;

/// All upbox facade errors.
#[derive(Debug, Error)]
pub enum Error {
    /// A Box rejected the call (authorization, pause, layout, arguments, ...)
    #[error(transparent)]
    Box(#[from] upbox_core::Error),

    /// Configuration could not be loaded
    #[error(transparent)]
    Config(#[from] ConfigError),

    /// No catalog module has this name
    #[error("unknown module: {0}")]
    UnknownModule(String),

    /// An operation returned a value of an unexpected shape
    #[error("unexpected result from '{operation}': {value}")]
    UnexpectedValue {
        /// Operation that was called
        operation: String,
        /// Value it returned
        value: Value,
    },
}

/// Result type for upbox facade operations.
pub type Result<T> = std::result::Result<T, Error>;

impl Error {
    /// Stable code of the underlying Box error, if this is one.
    pub fn code(&self) -> Option<ErrorCode> {
        match self {
            Error::Box(e) => Some(e.code()),
            _ => None,
        }
    }

    /// Check if the call was rejected for lack of authority.
    pub fn is_authorization(&self) -> bool {
        matches!(self, Error::Box(e) if e.is_authorization())
    }

    /// Check if the call was rejected by the pause gate.
    pub fn is_paused(&self) -> bool {
        matches!(self, Error::Box(upbox_core::Error::Paused))
    }

    /// Check if this is a serious/unrecoverable error.
    pub fn is_serious(&self) -> bool {
        matches!(self, Error::Box(e) if e.is_serious())
    }
}
