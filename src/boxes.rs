//! Typed handle to one deployed Box.
//!
//! [`BoxRef`] wraps an [`ObjectHandle`] and forwards to the host, decoding
//! the results of the built-in counter and staking operations into plain
//! Rust values.

use std::fmt;

use tracing::debug;
use upbox_core::{Address, ObjectHandle, Value};
use upbox_engine::{ChainVerification, EventRecord, InstanceStatus, UpgradeReceipt, UpgradeRecord};

use crate::error::{Error, Result};
use crate::upbox::Upbox;

/// Handle to one deployed Box
///
/// Every call names its caller explicitly; the Box enforces authorization
/// against its stored owner.
#[derive(Clone, Copy)]
pub struct BoxRef<'a> {
    upbox: &'a Upbox,
    handle: ObjectHandle,
}

impl<'a> BoxRef<'a> {
    pub(crate) fn new(upbox: &'a Upbox, handle: ObjectHandle) -> Self {
        Self { upbox, handle }
    }

    /// Handle of this Box
    pub fn handle(&self) -> ObjectHandle {
        self.handle
    }

    // =========================================================================
    // Operations
    // =========================================================================

    /// Run any operation of the active implementation
    pub fn call(&self, caller: Address, operation: &str, args: &[Value]) -> Result<Value> {
        debug!(handle = %self.handle, operation, "Call");
        Ok(self.upbox.host().dispatch(self.handle, operation, args, caller)?)
    }

    fn call_uint(&self, caller: Address, operation: &str, args: &[Value]) -> Result<u64> {
        let value = self.call(caller, operation, args)?;
        value.as_uint().ok_or_else(|| Error::UnexpectedValue {
            operation: operation.to_string(),
            value,
        })
    }

    /// Initialize the counter (`set`)
    pub fn set(&self, caller: Address, value: u64) -> Result<()> {
        self.call(caller, "set", &[Value::Uint(value)])?;
        Ok(())
    }

    /// Read the counter (`get`)
    pub fn get(&self, caller: Address) -> Result<u64> {
        self.call_uint(caller, "get", &[])
    }

    /// Run `increment`, returning the new counter
    ///
    /// Under `box-v1` this decrements the counter.
    pub fn increment(&self, caller: Address) -> Result<u64> {
        self.call_uint(caller, "increment", &[])
    }

    /// Stake `amount` for the caller
    pub fn stake(&self, caller: Address, amount: u64) -> Result<()> {
        self.call(caller, "stake", &[Value::Uint(amount)])?;
        Ok(())
    }

    /// Amount staked by the caller
    pub fn read_staked_amount(&self, caller: Address) -> Result<u64> {
        self.call_uint(caller, "read_staked_amount", &[])
    }

    /// Deposit `amount` for the caller
    pub fn deposit(&self, caller: Address, amount: u64) -> Result<()> {
        self.call(caller, "deposit", &[Value::Uint(amount)])?;
        Ok(())
    }

    /// Amount deposited by the caller
    pub fn read_deposited_amount(&self, caller: Address) -> Result<u64> {
        self.call_uint(caller, "read_deposited_amount", &[])
    }

    // =========================================================================
    // Administration
    // =========================================================================

    /// Upgrade to a catalog module
    pub fn upgrade(&self, caller: Address, module: &str) -> Result<UpgradeReceipt> {
        self.upbox
            .host()
            .upgrade_with(self.handle, caller, || self.upbox.module(module))
    }

    /// Hand the Box to a new owner
    pub fn transfer_ownership(&self, caller: Address, new_owner: Address) -> Result<()> {
        Ok(self
            .upbox
            .host()
            .transfer_ownership(self.handle, caller, new_owner)?)
    }

    /// Close the pause gate
    pub fn pause(&self, caller: Address) -> Result<()> {
        Ok(self.upbox.host().pause(self.handle, caller)?)
    }

    /// Open the pause gate
    pub fn unpause(&self, caller: Address) -> Result<()> {
        Ok(self.upbox.host().unpause(self.handle, caller)?)
    }

    // =========================================================================
    // Introspection
    // =========================================================================

    /// Current owner
    pub fn owner(&self) -> Result<Address> {
        Ok(self.upbox.host().owner(self.handle)?)
    }

    /// Whether the pause gate is closed
    pub fn is_paused(&self) -> Result<bool> {
        Ok(self
            .upbox
            .host()
            .with_instance(self.handle, |proxy| Ok(proxy.is_paused()))?)
    }

    /// Summary of the Box
    pub fn status(&self) -> Result<InstanceStatus> {
        Ok(self.upbox.host().status(self.handle)?)
    }

    /// Every implementation the Box has run, oldest first
    pub fn history(&self) -> Result<Vec<UpgradeRecord>> {
        Ok(self.upbox.host().history(self.handle)?)
    }

    /// All events, oldest first
    pub fn events(&self) -> Result<Vec<EventRecord>> {
        Ok(self.upbox.host().events(self.handle)?)
    }

    /// Events with sequence number `from` or later
    pub fn events_since(&self, from: u64) -> Result<Vec<EventRecord>> {
        Ok(self.upbox.host().events_since(self.handle, from)?)
    }

    /// Verify the event hash chain
    pub fn verify_events(&self) -> Result<ChainVerification> {
        Ok(self.upbox.host().verify_events(self.handle)?)
    }

    /// Raw value of a named slot in the active layout
    pub fn slot(&self, name: &str) -> Result<Option<Value>> {
        Ok(self.upbox.host().slot(self.handle, name)?)
    }
}

impl fmt::Debug for BoxRef<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("BoxRef").field("handle", &self.handle).finish()
    }
}
