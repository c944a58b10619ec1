//! Results returned by the [`Executor`](crate::Executor)

use serde::{Deserialize, Serialize};
use upbox_core::{Address, ImplementationId, ObjectHandle, OperationSpec, Value};
use upbox_engine::{ChainVerification, EventRecord, InstanceStatus, UpgradeReceipt, UpgradeRecord};

/// A catalog entry
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ModuleInfo {
    /// Catalog name
    pub name: String,
    /// Implementation id
    pub implementation: ImplementationId,
    /// Operation names
    pub operations: Vec<String>,
}

/// Successful result of a [`Command`](crate::Command)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Output {
    /// Nothing to report
    Unit,
    /// Reply to `Ping`
    Pong {
        /// Crate version
        version: String,
    },
    /// Handle of a new instance
    Handle(ObjectHandle),
    /// Handles of all instances
    Handles(Vec<ObjectHandle>),
    /// Value returned by an operation
    Value(Value),
    /// Slot value, if the slot exists
    MaybeValue(Option<Value>),
    /// An identity
    Address(Address),
    /// Upgrade result
    Upgraded(UpgradeReceipt),
    /// Instance summary
    Status(InstanceStatus),
    /// Event records
    Events(Vec<EventRecord>),
    /// Chain verification result
    Chain(ChainVerification),
    /// Upgrade history
    History(Vec<UpgradeRecord>),
    /// Operation declarations
    Operations(Vec<OperationSpec>),
    /// Catalog entries
    Modules(Vec<ModuleInfo>),
}
