//! Commands accepted by the [`Executor`](crate::Executor)

use serde::{Deserialize, Serialize};
use upbox_core::{Address, ObjectHandle, Value};
use upbox_engine::InitCall;

/// A single request against a host
///
/// `handle` and `caller` are optional wherever a [`Session`](crate::Session)
/// can supply them; the bare executor rejects commands that leave them out.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Command {
    /// Liveness check
    Ping,

    /// Deploy a catalog module as a new instance
    Deploy {
        /// Initial owner (defaults to the session caller)
        owner: Option<Address>,
        /// Catalog name, e.g. `box-v1`
        module: String,
        /// Initializer to run during deployment
        init: Option<InitCall>,
    },

    /// Dispatch an implementation operation
    Call {
        /// Target instance
        handle: Option<ObjectHandle>,
        /// Calling identity
        caller: Option<Address>,
        /// Operation name
        operation: String,
        /// Arguments
        args: Vec<Value>,
    },

    /// Replace an instance's implementation with a catalog module
    Upgrade {
        /// Target instance
        handle: Option<ObjectHandle>,
        /// Calling identity
        caller: Option<Address>,
        /// Catalog name of the new implementation
        module: String,
    },

    /// Hand ownership to a new owner
    TransferOwnership {
        /// Target instance
        handle: Option<ObjectHandle>,
        /// Calling identity
        caller: Option<Address>,
        /// New owner
        new_owner: Address,
    },

    /// Close the pause gate
    Pause {
        /// Target instance
        handle: Option<ObjectHandle>,
        /// Calling identity
        caller: Option<Address>,
    },

    /// Open the pause gate
    Unpause {
        /// Target instance
        handle: Option<ObjectHandle>,
        /// Calling identity
        caller: Option<Address>,
    },

    /// Current owner
    Owner {
        /// Target instance
        handle: Option<ObjectHandle>,
    },

    /// Instance summary
    Status {
        /// Target instance
        handle: Option<ObjectHandle>,
    },

    /// Committed events, optionally from a sequence number on
    Events {
        /// Target instance
        handle: Option<ObjectHandle>,
        /// First sequence to return
        since: Option<u64>,
    },

    /// Check the event hash chain
    VerifyEvents {
        /// Target instance
        handle: Option<ObjectHandle>,
    },

    /// Upgrade history
    History {
        /// Target instance
        handle: Option<ObjectHandle>,
    },

    /// Operations of the active implementation
    Operations {
        /// Target instance
        handle: Option<ObjectHandle>,
    },

    /// Raw value of a named slot
    Slot {
        /// Target instance
        handle: Option<ObjectHandle>,
        /// Slot name
        name: String,
    },

    /// All deployed instances
    Instances,

    /// Modules available for deploy and upgrade
    Modules,
}

impl Command {
    /// Short name for logging
    pub fn name(&self) -> &'static str {
        match self {
            Command::Ping => "ping",
            Command::Deploy { .. } => "deploy",
            Command::Call { .. } => "call",
            Command::Upgrade { .. } => "upgrade",
            Command::TransferOwnership { .. } => "transfer_ownership",
            Command::Pause { .. } => "pause",
            Command::Unpause { .. } => "unpause",
            Command::Owner { .. } => "owner",
            Command::Status { .. } => "status",
            Command::Events { .. } => "events",
            Command::VerifyEvents { .. } => "verify_events",
            Command::History { .. } => "history",
            Command::Operations { .. } => "operations",
            Command::Slot { .. } => "slot",
            Command::Instances => "instances",
            Command::Modules => "modules",
        }
    }

    /// Fill in a missing handle and caller
    pub(crate) fn with_defaults(mut self, handle: Option<ObjectHandle>, caller: Address) -> Self {
        match &mut self {
            Command::Ping | Command::Instances | Command::Modules => {}
            Command::Deploy { owner, .. } => {
                owner.get_or_insert(caller);
            }
            Command::Call {
                handle: h,
                caller: c,
                ..
            }
            | Command::Upgrade {
                handle: h,
                caller: c,
                ..
            }
            | Command::TransferOwnership {
                handle: h,
                caller: c,
                ..
            }
            | Command::Pause {
                handle: h,
                caller: c,
            }
            | Command::Unpause {
                handle: h,
                caller: c,
            } => {
                if h.is_none() {
                    *h = handle;
                }
                c.get_or_insert(caller);
            }
            Command::Owner { handle: h }
            | Command::Status { handle: h }
            | Command::Events { handle: h, .. }
            | Command::VerifyEvents { handle: h }
            | Command::History { handle: h }
            | Command::Operations { handle: h }
            | Command::Slot { handle: h, .. } => {
                if h.is_none() {
                    *h = handle;
                }
            }
        }
        self
    }
}
