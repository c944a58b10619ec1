//! Single-owner access control for upbox
//!
//! The [`AccessController`] is a stateless facade over the `owner` framework
//! slot. Keeping the owner in the Box's own storage means ownership survives
//! every upgrade, and a transfer is a single slot write: the old owner loses
//! its privileges in the same step the new owner gains them.
//!
//! Two failure kinds are kept apart:
//! - [`Error::NotOwner`] for owner-only operations (pause, unpause, transfer)
//! - [`Error::Unauthorized`] for upgrade requests

use tracing::debug;
use upbox_core::layout::OWNER_SLOT;
use upbox_core::{Address, AuthLevel, BoxEvent, Error, Result, SlotStore, SlotType, Value};

/// Stateless access checks over the `owner` slot
pub struct AccessController;

impl AccessController {
    /// Current owner
    ///
    /// An object that was never assigned an owner reports [`Address::ZERO`],
    /// which no caller can match.
    pub fn owner(store: &SlotStore) -> Address {
        store
            .read(OWNER_SLOT, SlotType::Address)
            .as_address()
            .unwrap_or(Address::ZERO)
    }

    /// Check whether `who` is the current owner
    pub fn is_owner(store: &SlotStore, who: Address) -> bool {
        let owner = Self::owner(store);
        !owner.is_zero() && owner == who
    }

    /// Fail with `NotOwner` unless `caller` is the owner
    pub fn require_owner(store: &SlotStore, caller: Address) -> Result<()> {
        if Self::is_owner(store, caller) {
            Ok(())
        } else {
            debug!(%caller, "owner check failed");
            Err(Error::NotOwner)
        }
    }

    /// Fail with `Unauthorized` unless `caller` may upgrade
    pub fn authorize_upgrade(store: &SlotStore, caller: Address) -> Result<()> {
        if Self::is_owner(store, caller) {
            Ok(())
        } else {
            debug!(%caller, "upgrade authorization failed");
            Err(Error::Unauthorized)
        }
    }

    /// Check an operation's declared authorization level
    pub fn check(store: &SlotStore, caller: Address, level: AuthLevel) -> Result<()> {
        match level {
            AuthLevel::Public => Ok(()),
            AuthLevel::OwnerOnly => Self::require_owner(store, caller),
        }
    }

    /// Assign the first owner at deployment
    ///
    /// Emits `OwnershipTransferred { previous: ZERO, new: owner }`.
    pub fn initialize_owner(store: &mut SlotStore, owner: Address) -> Result<BoxEvent> {
        if owner.is_zero() {
            return Err(Error::InvalidAddress);
        }
        if !Self::owner(store).is_zero() {
            return Err(Error::internal("owner already assigned"));
        }
        store.write(OWNER_SLOT, Value::Address(owner));
        Ok(BoxEvent::OwnershipTransferred {
            previous: Address::ZERO,
            new: owner,
        })
    }

    /// Replace the owner
    ///
    /// The caller must be the owner and `new_owner` must not be the zero
    /// address. Transferring to the current owner is allowed and still
    /// produces the event.
    pub fn transfer_ownership(
        store: &mut SlotStore,
        caller: Address,
        new_owner: Address,
    ) -> Result<BoxEvent> {
        Self::require_owner(store, caller)?;
        if new_owner.is_zero() {
            return Err(Error::InvalidAddress);
        }
        let previous = Self::owner(store);
        store.write(OWNER_SLOT, Value::Address(new_owner));
        debug!(%previous, new = %new_owner, "ownership transferred");
        Ok(BoxEvent::OwnershipTransferred {
            previous,
            new: new_owner,
        })
    }
}
