//! Pause gate
//!
//! The pause flag lives in the framework `paused` slot, so it survives
//! upgrades like any other stored value. [`PauseGate::guard`] is called once
//! per dispatched operation, before the operation is even looked up.

use serde::{Deserialize, Serialize};
use std::fmt;
use tracing::info;
use upbox_core::layout::PAUSED_SLOT;
use upbox_core::{Address, BoxEvent, Error, Result, SlotStore, SlotType, Value};
use upbox_security::AccessController;

/// Whether an instance accepts operations
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
pub enum PauseState {
    /// Operations are dispatched
    #[default]
    Active,
    /// Every dispatched operation fails with `Paused`
    Paused,
}

impl fmt::Display for PauseState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PauseState::Active => f.write_str("active"),
            PauseState::Paused => f.write_str("paused"),
        }
    }
}

/// Stateless operations over the `paused` slot
pub struct PauseGate;

impl PauseGate {
    /// Current state
    pub fn state(store: &SlotStore) -> PauseState {
        match store.read(PAUSED_SLOT, SlotType::Bool) {
            Value::Bool(true) => PauseState::Paused,
            _ => PauseState::Active,
        }
    }

    /// Fail with `Paused` if the gate is closed
    pub fn guard(store: &SlotStore) -> Result<()> {
        match Self::state(store) {
            PauseState::Active => Ok(()),
            PauseState::Paused => Err(Error::Paused),
        }
    }

    /// Close the gate
    pub fn pause(store: &mut SlotStore, caller: Address) -> Result<BoxEvent> {
        AccessController::require_owner(store, caller)?;
        if Self::state(store) == PauseState::Paused {
            return Err(Error::Paused);
        }
        store.write(PAUSED_SLOT, Value::Bool(true));
        info!(account = %caller, "Paused");
        Ok(BoxEvent::Paused { account: caller })
    }

    /// Open the gate
    pub fn unpause(store: &mut SlotStore, caller: Address) -> Result<BoxEvent> {
        AccessController::require_owner(store, caller)?;
        if Self::state(store) == PauseState::Active {
            return Err(Error::NotPaused);
        }
        store.write(PAUSED_SLOT, Value::Bool(false));
        info!(account = %caller, "Unpaused");
        Ok(BoxEvent::Unpaused { account: caller })
    }
}
