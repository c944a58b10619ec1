//! Error types for upbox
//!
//! Every failure surfaced to a caller is an [`Error`]. Errors are terminal for
//! the triggering call: the call has no side effect and the object stays
//! usable. Each variant maps to a stable [`ErrorCode`] used by the executor's
//! wire encoding.
//!
//! ## Error Codes (Canonical)
//!
//! | Code | Description |
//! |------|-------------|
//! | AlreadyInitialized | Initializer already ran |
//! | Unauthorized | Upgrade requested by a non-owner |
//! | NotOwner | Owner-only operation called by a non-owner |
//! | Paused | Operation attempted while paused |
//! | NotPaused | Unpause attempted while active |
//! | InvalidAmount | Stake/deposit amount is not positive |
//! | IncompatibleLayout | Upgrade target breaks the append-only layout |
//! | InvalidImplementation | Implementation module is malformed |
//! | InvalidAddress | Zero address where an identity is required |
//! | UnknownOperation | Active implementation has no such operation |
//! | InvalidArgument | Missing or ill-typed argument |
//! | UndeclaredSlot | Operation touched a slot it did not declare |
//! | TypeMismatch | Value does not match the slot type |
//! | Overflow | Arithmetic overflow or underflow |
//! | HandleNotFound | No instance behind the handle |
//! | Snapshot | Snapshot could not be encoded, decoded or restored |
//! | Internal | Bug or invariant violation |

use crate::types::ObjectHandle;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// All upbox errors.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum Error {
    /// Initializer invoked on an already initialized object
    #[error("Initializable: contract is already initialized")]
    AlreadyInitialized,

    /// Upgrade requested by someone other than the owner
    #[error("Unauthorized access")]
    Unauthorized,

    /// Owner-only operation requested by someone other than the owner
    #[error("Ownable: caller is not the owner")]
    NotOwner,

    /// Operation attempted while the pause gate is closed
    #[error("Pausable: paused")]
    Paused,

    /// Unpause attempted while the pause gate is open
    #[error("Pausable: not paused")]
    NotPaused,

    /// Amount must be strictly positive
    #[error("_amount > 0")]
    InvalidAmount,

    /// Upgrade target's slot layout is not an append-only extension
    #[error("incompatible storage layout: {reason}")]
    IncompatibleLayout {
        /// Which slot broke compatibility and how
        reason: String,
    },

    /// Implementation module fails structural validation
    #[error("invalid implementation {implementation}: {reason}")]
    InvalidImplementation {
        /// Offending implementation id
        implementation: String,
        /// What is wrong with it
        reason: String,
    },

    /// Zero address supplied where an identity is required
    #[error("Ownable: new owner is the zero address")]
    InvalidAddress,

    /// Active implementation does not expose the operation
    #[error("unknown operation '{operation}'")]
    UnknownOperation {
        /// Requested operation name
        operation: String,
    },

    /// Missing or ill-typed operation argument
    #[error("invalid argument: {reason}")]
    InvalidArgument {
        /// What is wrong with the argument
        reason: String,
    },

    /// Operation accessed a slot outside its declaration
    #[error("operation '{operation}' did not declare access to slot '{slot}'")]
    UndeclaredSlot {
        /// Operation name
        operation: String,
        /// Slot name
        slot: String,
    },

    /// Value does not match the slot's declared type
    #[error("type mismatch on slot '{slot}': expected {expected}, got {actual}")]
    TypeMismatch {
        /// Slot name
        slot: String,
        /// Declared type
        expected: String,
        /// Type actually supplied or found
        actual: String,
    },

    /// Arithmetic overflow or underflow
    #[error("arithmetic overflow")]
    Overflow,

    /// No instance is deployed behind the handle
    #[error("no object deployed at handle {handle}")]
    HandleNotFound {
        /// The unknown handle
        handle: ObjectHandle,
    },

    /// Snapshot encoding, decoding or restore failure
    #[error("snapshot error: {reason}")]
    Snapshot {
        /// Failure description
        reason: String,
    },

    /// Internal error (bug or invariant violation)
    #[error("internal error: {reason}")]
    Internal {
        /// Failure description
        reason: String,
    },
}

/// Result type for upbox operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Stable machine-readable error code
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ErrorCode {
    /// See [`Error::AlreadyInitialized`]
    AlreadyInitialized,
    /// See [`Error::Unauthorized`]
    Unauthorized,
    /// See [`Error::NotOwner`]
    NotOwner,
    /// See [`Error::Paused`]
    Paused,
    /// See [`Error::NotPaused`]
    NotPaused,
    /// See [`Error::InvalidAmount`]
    InvalidAmount,
    /// See [`Error::IncompatibleLayout`]
    IncompatibleLayout,
    /// See [`Error::InvalidImplementation`]
    InvalidImplementation,
    /// See [`Error::InvalidAddress`]
    InvalidAddress,
    /// See [`Error::UnknownOperation`]
    UnknownOperation,
    /// See [`Error::InvalidArgument`]
    InvalidArgument,
    /// See [`Error::UndeclaredSlot`]
    UndeclaredSlot,
    /// See [`Error::TypeMismatch`]
    TypeMismatch,
    /// See [`Error::Overflow`]
    Overflow,
    /// See [`Error::HandleNotFound`]
    HandleNotFound,
    /// See [`Error::Snapshot`]
    Snapshot,
    /// See [`Error::Internal`]
    Internal,
}

impl ErrorCode {
    /// Canonical string form
    pub const fn as_str(&self) -> &'static str {
        match self {
            ErrorCode::AlreadyInitialized => "AlreadyInitialized",
            ErrorCode::Unauthorized => "Unauthorized",
            ErrorCode::NotOwner => "NotOwner",
            ErrorCode::Paused => "Paused",
            ErrorCode::NotPaused => "NotPaused",
            ErrorCode::InvalidAmount => "InvalidAmount",
            ErrorCode::IncompatibleLayout => "IncompatibleLayout",
            ErrorCode::InvalidImplementation => "InvalidImplementation",
            ErrorCode::InvalidAddress => "InvalidAddress",
            ErrorCode::UnknownOperation => "UnknownOperation",
            ErrorCode::InvalidArgument => "InvalidArgument",
            ErrorCode::UndeclaredSlot => "UndeclaredSlot",
            ErrorCode::TypeMismatch => "TypeMismatch",
            ErrorCode::Overflow => "Overflow",
            ErrorCode::HandleNotFound => "HandleNotFound",
            ErrorCode::Snapshot => "Snapshot",
            ErrorCode::Internal => "Internal",
        }
    }
}

impl std::fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl Error {
    /// Stable error code for this error
    pub fn code(&self) -> ErrorCode {
        match self {
            Error::AlreadyInitialized => ErrorCode::AlreadyInitialized,
            Error::Unauthorized => ErrorCode::Unauthorized,
            Error::NotOwner => ErrorCode::NotOwner,
            Error::Paused => ErrorCode::Paused,
            Error::NotPaused => ErrorCode::NotPaused,
            Error::InvalidAmount => ErrorCode::InvalidAmount,
            Error::IncompatibleLayout { .. } => ErrorCode::IncompatibleLayout,
            Error::InvalidImplementation { .. } => ErrorCode::InvalidImplementation,
            Error::InvalidAddress => ErrorCode::InvalidAddress,
            Error::UnknownOperation { .. } => ErrorCode::UnknownOperation,
            Error::InvalidArgument { .. } => ErrorCode::InvalidArgument,
            Error::UndeclaredSlot { .. } => ErrorCode::UndeclaredSlot,
            Error::TypeMismatch { .. } => ErrorCode::TypeMismatch,
            Error::Overflow => ErrorCode::Overflow,
            Error::HandleNotFound { .. } => ErrorCode::HandleNotFound,
            Error::Snapshot { .. } => ErrorCode::Snapshot,
            Error::Internal { .. } => ErrorCode::Internal,
        }
    }

    /// Check if this error is an authorization failure
    pub fn is_authorization(&self) -> bool {
        matches!(self, Error::Unauthorized | Error::NotOwner)
    }

    /// Check if this error is a serious/unrecoverable error.
    pub fn is_serious(&self) -> bool {
        matches!(self, Error::Internal { .. })
    }

    /// Shorthand for an [`Error::InvalidArgument`]
    pub fn invalid_argument(reason: impl Into<String>) -> Self {
        Error::InvalidArgument {
            reason: reason.into(),
        }
    }

    /// Shorthand for an [`Error::Internal`]
    pub fn internal(reason: impl Into<String>) -> Self {
        Error::Internal {
            reason: reason.into(),
        }
    }
}
