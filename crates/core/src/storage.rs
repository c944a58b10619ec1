//! Slot storage
//!
//! [`SlotStore`] holds the values of a Box. It is owned by the proxy, never
//! by an implementation, and outlives every implementation swap.
//!
//! ## Sparse Representation
//!
//! Only written slots are stored. A slot that was never written reads as the
//! zero value of the type its layout declares. Upgrading to a layout with
//! more slots therefore changes nothing in the store, which is what makes
//! [`SlotStore::digest`] identical before and after an upgrade.

use crate::error::{Error, Result};
use crate::layout::{SlotId, SlotLayout};
use crate::value::{SlotType, Value};
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use std::collections::BTreeMap;
use std::fmt;

/// SHA-256 digest of a store's canonical encoding
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct StorageDigest(pub [u8; 32]);

impl fmt::Display for StorageDigest {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for byte in &self.0 {
            write!(f, "{:02x}", byte)?;
        }
        Ok(())
    }
}

/// Values of a Box, keyed by slot position
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SlotStore {
    values: BTreeMap<SlotId, Value>,
}

impl SlotStore {
    /// Create an empty store
    pub fn new() -> Self {
        Self::default()
    }

    /// Read a slot, falling back to the zero value of `ty`
    pub fn read(&self, id: SlotId, ty: SlotType) -> Value {
        self.values.get(&id).cloned().unwrap_or_else(|| ty.zero())
    }

    /// Raw access to a written slot
    pub fn get(&self, id: SlotId) -> Option<&Value> {
        self.values.get(&id)
    }

    /// Write a slot
    ///
    /// The caller is responsible for type checking against the layout.
    pub fn write(&mut self, id: SlotId, value: Value) {
        self.values.insert(id, value);
    }

    /// Apply a batch of staged writes
    pub fn apply(&mut self, writes: impl IntoIterator<Item = (SlotId, Value)>) {
        for (id, value) in writes {
            self.values.insert(id, value);
        }
    }

    /// Number of written slots
    pub fn len(&self) -> usize {
        self.values.len()
    }

    /// Check if nothing was ever written
    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// Iterate written slots in position order
    pub fn iter(&self) -> impl Iterator<Item = (SlotId, &Value)> {
        self.values.iter().map(|(id, v)| (*id, v))
    }

    /// Check every written slot against a layout
    ///
    /// Fails if a written position is not part of the layout or holds a
    /// value of the wrong type. Used when restoring snapshots.
    pub fn validate(&self, layout: &SlotLayout) -> Result<()> {
        for (id, value) in &self.values {
            let slot = layout.get(*id).ok_or_else(|| Error::Snapshot {
                reason: format!("stored slot {} is outside layout {}", id, layout),
            })?;
            if !slot.ty.admits(value) {
                return Err(Error::TypeMismatch {
                    slot: slot.name.clone(),
                    expected: slot.ty.name().to_string(),
                    actual: value.type_name().to_string(),
                });
            }
        }
        Ok(())
    }

    /// SHA-256 of the canonical (bincode) encoding of the store
    pub fn digest(&self) -> Result<StorageDigest> {
        let bytes = bincode::serialize(&self.values)
            .map_err(|e| Error::internal(format!("failed to encode store: {}", e)))?;
        let mut out = [0u8; 32];
        out.copy_from_slice(&Sha256::digest(&bytes));
        Ok(StorageDigest(out))
    }
}
