//! Observable events
//!
//! Events are emitted by successful calls only. A call that fails emits
//! nothing, and each successful triggering call emits its event exactly once.

use crate::types::Address;
use crate::ImplementationId;
use serde::{Deserialize, Serialize};
use std::fmt;

/// An event emitted by a Box
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum BoxEvent {
    /// Ownership moved from `previous` to `new`
    OwnershipTransferred {
        /// Owner before the transfer (zero at deployment)
        previous: Address,
        /// Owner after the transfer
        new: Address,
    },
    /// An initializer of the given version completed
    Initialized {
        /// Initializer version
        version: u64,
    },
    /// Pause gate closed by `account`
    Paused {
        /// Owner that paused
        account: Address,
    },
    /// Pause gate opened by `account`
    Unpaused {
        /// Owner that unpaused
        account: Address,
    },
    /// Active implementation replaced
    Upgraded {
        /// Newly active implementation
        implementation: ImplementationId,
    },
    /// `caller` staked `amount`
    Staked {
        /// Staker
        caller: Address,
        /// Amount added
        amount: u64,
    },
    /// `caller` deposited `amount`
    Deposited {
        /// Depositor
        caller: Address,
        /// Amount added
        amount: u64,
    },
}

impl BoxEvent {
    /// Event name, as used for filtering
    pub const fn kind(&self) -> &'static str {
        match self {
            BoxEvent::OwnershipTransferred { .. } => "OwnershipTransferred",
            BoxEvent::Initialized { .. } => "Initialized",
            BoxEvent::Paused { .. } => "Paused",
            BoxEvent::Unpaused { .. } => "Unpaused",
            BoxEvent::Upgraded { .. } => "Upgraded",
            BoxEvent::Staked { .. } => "Staked",
            BoxEvent::Deposited { .. } => "Deposited",
        }
    }
}

impl fmt::Display for BoxEvent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            BoxEvent::OwnershipTransferred { previous, new } => {
                write!(f, "OwnershipTransferred({}, {})", previous, new)
            }
            BoxEvent::Initialized { version } => write!(f, "Initialized({})", version),
            BoxEvent::Paused { account } => write!(f, "Paused({})", account),
            BoxEvent::Unpaused { account } => write!(f, "Unpaused({})", account),
            BoxEvent::Upgraded { implementation } => write!(f, "Upgraded({})", implementation),
            BoxEvent::Staked { caller, amount } => write!(f, "Staked({}, {})", caller, amount),
            BoxEvent::Deposited { caller, amount } => {
                write!(f, "Deposited({}, {})", caller, amount)
            }
        }
    }
}
