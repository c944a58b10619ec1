//! Executor errors and their wire form

use serde::{Deserialize, Serialize};
use thiserror::Error;
use upbox_core::ErrorCode;

/// Result type for executor operations
pub type Result<T> = std::result::Result<T, Error>;

/// Errors returned by [`Executor::execute`](crate::Executor::execute)
#[derive(Debug, Clone, PartialEq, Error)]
pub enum Error {
    /// The host rejected the command
    #[error(transparent)]
    Box(#[from] upbox_core::Error),

    /// No catalog module has this name
    #[error("unknown module: {name}")]
    UnknownModule {
        /// Requested name
        name: String,
    },

    /// The command needs an instance and none was given or selected
    #[error("no instance selected")]
    NoInstance,

    /// The command needs a caller and none was given
    #[error("no caller given")]
    NoCaller,

    /// Configuration could not be loaded
    #[error("config error: {reason}")]
    Config {
        /// Description
        reason: String,
    },
}

impl Error {
    /// Stable error code
    pub fn code(&self) -> &'static str {
        match self {
            Error::Box(e) => e.code().as_str(),
            Error::UnknownModule { .. } => "UnknownModule",
            Error::NoInstance => "NoInstance",
            Error::NoCaller => "NoCaller",
            Error::Config { .. } => "Config",
        }
    }

    /// The underlying host error, if any
    pub fn box_error_code(&self) -> Option<ErrorCode> {
        match self {
            Error::Box(e) => Some(e.code()),
            _ => None,
        }
    }

    /// Serializable form
    pub fn to_wire(&self) -> WireError {
        WireError {
            code: self.code().to_string(),
            message: self.to_string(),
        }
    }
}

impl From<upbox_engine::ConfigError> for Error {
    fn from(e: upbox_engine::ConfigError) -> Self {
        Error::Config {
            reason: e.to_string(),
        }
    }
}

/// Error as rendered in JSON output
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WireError {
    /// Stable error code
    pub code: String,
    /// Human-readable message
    pub message: String,
}
