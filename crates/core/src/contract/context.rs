//! Staged execution context for a single operation
//!
//! A [`CallContext`] is the only window an implementation has onto storage.
//! It enforces the operation's slot declaration and the layout's types, and
//! buffers every write and event. The controller applies the buffered
//! [`Effects`] only if the transition returns `Ok`; on error they are
//! dropped, so a failed call leaves no trace.

use crate::contract::OperationSpec;
use crate::error::{Error, Result};
use crate::event::BoxEvent;
use crate::layout::{SlotId, SlotLayout};
use crate::storage::SlotStore;
use crate::types::Address;
use crate::value::{SlotType, Value};
use std::collections::BTreeMap;

/// Writes and events produced by a successful operation
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Effects {
    /// Staged slot writes
    pub writes: BTreeMap<SlotId, Value>,
    /// Events in emission order
    pub events: Vec<BoxEvent>,
}

/// Execution context handed to an implementation's transition function
pub struct CallContext<'a> {
    caller: Address,
    operation: &'a OperationSpec,
    layout: &'a SlotLayout,
    store: &'a SlotStore,
    writes: BTreeMap<SlotId, Value>,
    events: Vec<BoxEvent>,
}

impl<'a> CallContext<'a> {
    /// Create a context over a committed store
    pub fn new(
        caller: Address,
        operation: &'a OperationSpec,
        layout: &'a SlotLayout,
        store: &'a SlotStore,
    ) -> Self {
        Self {
            caller,
            operation,
            layout,
            store,
            writes: BTreeMap::new(),
            events: Vec::new(),
        }
    }

    /// Identity that invoked the operation
    pub fn caller(&self) -> Address {
        self.caller
    }

    /// Name of the running operation
    pub fn operation(&self) -> &str {
        &self.operation.name
    }

    fn resolve(&self, slot: &str, write: bool) -> Result<(SlotId, SlotType)> {
        let declared = if write {
            self.operation.may_write(slot)
        } else {
            self.operation.may_read(slot)
        };
        if !declared {
            return Err(Error::UndeclaredSlot {
                operation: self.operation.name.clone(),
                slot: slot.to_string(),
            });
        }
        self.layout
            .position(slot)
            .map(|(id, desc)| (id, desc.ty))
            .ok_or_else(|| Error::UndeclaredSlot {
                operation: self.operation.name.clone(),
                slot: slot.to_string(),
            })
    }

    /// Read a declared slot, seeing this call's own staged writes
    pub fn read(&self, slot: &str) -> Result<Value> {
        let (id, ty) = self.resolve(slot, false)?;
        Ok(match self.writes.get(&id) {
            Some(staged) => staged.clone(),
            None => self.store.read(id, ty),
        })
    }

    /// Read a declared `Uint` slot
    pub fn read_uint(&self, slot: &str) -> Result<u64> {
        let value = self.read(slot)?;
        value.as_uint().ok_or_else(|| Error::TypeMismatch {
            slot: slot.to_string(),
            expected: SlotType::Uint.name().to_string(),
            actual: value.type_name().to_string(),
        })
    }

    /// Read one account's entry of a declared `Balances` slot
    pub fn read_balance(&self, slot: &str, account: Address) -> Result<u64> {
        let value = self.read(slot)?;
        let balances = value.as_balances().ok_or_else(|| Error::TypeMismatch {
            slot: slot.to_string(),
            expected: SlotType::Balances.name().to_string(),
            actual: value.type_name().to_string(),
        })?;
        Ok(balances.get(&account).copied().unwrap_or(0))
    }

    /// Stage a write to a declared slot
    pub fn write(&mut self, slot: &str, value: Value) -> Result<()> {
        let (id, ty) = self.resolve(slot, true)?;
        if !ty.admits(&value) {
            return Err(Error::TypeMismatch {
                slot: slot.to_string(),
                expected: ty.name().to_string(),
                actual: value.type_name().to_string(),
            });
        }
        self.writes.insert(id, value);
        Ok(())
    }

    /// Stage a write to a declared `Uint` slot
    pub fn write_uint(&mut self, slot: &str, value: u64) -> Result<()> {
        self.write(slot, Value::Uint(value))
    }

    /// Add `amount` to an account's entry of a `Balances` slot
    ///
    /// Returns the new balance. Fails with `Overflow` if the balance would
    /// exceed `u64::MAX`.
    pub fn credit(&mut self, slot: &str, account: Address, amount: u64) -> Result<u64> {
        let value = self.read(slot)?;
        let mut balances = match value {
            Value::Balances(b) => b,
            other => {
                return Err(Error::TypeMismatch {
                    slot: slot.to_string(),
                    expected: SlotType::Balances.name().to_string(),
                    actual: other.type_name().to_string(),
                })
            }
        };
        let entry = balances.entry(account).or_insert(0);
        *entry = entry.checked_add(amount).ok_or(Error::Overflow)?;
        let updated = *entry;
        self.write(slot, Value::Balances(balances))?;
        Ok(updated)
    }

    /// Stage an event
    ///
    /// Implementations may only emit business events; ownership, pause,
    /// initialization and upgrade events belong to the controller.
    pub fn emit(&mut self, event: BoxEvent) -> Result<()> {
        match event {
            BoxEvent::Staked { .. } | BoxEvent::Deposited { .. } => {
                self.events.push(event);
                Ok(())
            }
            other => Err(Error::internal(format!(
                "operation '{}' may not emit controller event {}",
                self.operation.name,
                other.kind()
            ))),
        }
    }

    /// Consume the context, yielding its staged effects
    pub fn into_effects(self) -> Effects {
        Effects {
            writes: self.writes,
            events: self.events,
        }
    }
}
