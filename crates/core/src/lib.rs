//! Core types for upbox
//!
//! This crate defines the data model shared by every other crate:
//! - [`types`]: identities ([`Address`], [`ObjectHandle`])
//! - [`value`]: the [`Value`] carried by slots and arguments
//! - [`layout`]: append-only [`SlotLayout`]s and the framework prefix
//! - [`storage`]: the sparse [`SlotStore`] and its digest
//! - [`event`]: observable [`BoxEvent`]s
//! - [`contract`]: the [`Implementation`] trait and its call context
//! - [`error`]: the canonical [`Error`] type

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod contract;
pub mod error;
pub mod event;
pub mod layout;
pub mod storage;
pub mod types;
pub mod value;

pub use contract::{
    AuthLevel, CallContext, Effects, Implementation, ImplementationId, OperationKind,
    OperationSpec,
};
pub use error::{Error, ErrorCode, Result};
pub use event::BoxEvent;
pub use layout::{SlotDescriptor, SlotId, SlotLayout};
pub use storage::{SlotStore, StorageDigest};
pub use types::{Address, ObjectHandle};
pub use value::{Balances, SlotType, Value};
