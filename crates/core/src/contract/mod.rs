//! The contract between the controller and implementation modules
//!
//! - [`Implementation`]: the trait every module implements
//! - [`OperationSpec`]: per-operation declaration (kind, auth, slots)
//! - [`CallContext`]: the staged, declaration-checked view of storage
//! - [`args`]: argument decoding helpers for transition functions

pub mod args;
mod context;
mod implementation;
mod operation;

pub use context::{CallContext, Effects};
pub use implementation::{validate, Implementation, ImplementationId};
pub use operation::{AuthLevel, OperationKind, OperationSpec};
