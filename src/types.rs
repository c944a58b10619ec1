//! Public types for the upbox facade.
//!
//! This module re-exports types from internal crates with a clean public interface.

// Identities and values
pub use upbox_core::{Address, ObjectHandle, Value};

// Implementation contract
pub use upbox_core::{
    AuthLevel, CallContext, Implementation, ImplementationId, OperationKind, OperationSpec,
};

// Storage
pub use upbox_core::{SlotLayout, SlotType, StorageDigest};

// Events and errors
pub use upbox_core::{BoxEvent, ErrorCode};

// Engine
pub use upbox_engine::{
    ChainVerification, EventRecord, HostConfig, InitCall, InstanceStatus, PauseState,
    ReinitializerPolicy, UpgradeReceipt, UpgradeRecord,
};

// Modules
pub use upbox_modules::{BoxV1, BoxV2, BoxV3, Catalog};
