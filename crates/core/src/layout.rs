//! Storage slot layouts
//!
//! A [`SlotLayout`] is the ordered, named, typed list of slots an
//! implementation interprets. A slot's position is its index in the list.
//!
//! ## Append-Only Rule
//!
//! A layout `next` may replace a layout `current` only if `current` is an
//! exact prefix of `next`: same names, same types, same positions. New
//! versions may only add slots at the end. [`SlotLayout::check_extends`]
//! enforces the rule and names the first offending slot.
//!
//! ## Framework Prefix
//!
//! Every layout begins with three slots owned by the proxy itself:
//!
//! | Position | Name | Type |
//! |----------|------|------|
//! | 0 | `initialized` | Uint |
//! | 1 | `owner` | Address |
//! | 2 | `paused` | Bool |
//!
//! Implementations may read these slots but never declare them writable.

use crate::value::SlotType;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::fmt;

/// Position of a slot in a layout
pub type SlotId = u32;

/// Highest initializer version that has run
pub const INITIALIZED_SLOT: SlotId = 0;
/// Current owner identity
pub const OWNER_SLOT: SlotId = 1;
/// Pause gate state
pub const PAUSED_SLOT: SlotId = 2;

/// Name of the `initialized` framework slot
pub const INITIALIZED: &str = "initialized";
/// Name of the `owner` framework slot
pub const OWNER: &str = "owner";
/// Name of the `paused` framework slot
pub const PAUSED: &str = "paused";

/// Number of framework slots at the head of every layout
pub const FRAMEWORK_SLOTS: usize = 3;

/// A named, typed slot
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct SlotDescriptor {
    /// Slot name, unique within a layout
    pub name: String,
    /// Slot type, frozen once assigned
    pub ty: SlotType,
}

impl SlotDescriptor {
    /// Create a slot descriptor
    pub fn new(name: impl Into<String>, ty: SlotType) -> Self {
        Self {
            name: name.into(),
            ty,
        }
    }
}

impl fmt::Display for SlotDescriptor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.name, self.ty)
    }
}

/// Why a layout cannot replace another
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LayoutViolation {
    /// A slot of the current layout is missing from the new one
    Removed {
        /// Position of the missing slot
        position: SlotId,
        /// The slot that disappeared
        slot: SlotDescriptor,
    },
    /// The slot at a position has a different name
    Renamed {
        /// Position of the slot
        position: SlotId,
        /// Name in the current layout
        expected: String,
        /// Name in the new layout
        found: String,
    },
    /// The slot at a position has a different type
    Retyped {
        /// Position of the slot
        position: SlotId,
        /// Slot name
        name: String,
        /// Type in the current layout
        expected: SlotType,
        /// Type in the new layout
        found: SlotType,
    },
}

impl fmt::Display for LayoutViolation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LayoutViolation::Removed { position, slot } => {
                write!(f, "slot {} ({}) was removed", position, slot)
            }
            LayoutViolation::Renamed {
                position,
                expected,
                found,
            } => write!(
                f,
                "slot {} was '{}' and is now '{}'",
                position, expected, found
            ),
            LayoutViolation::Retyped {
                position,
                name,
                expected,
                found,
            } => write!(
                f,
                "slot {} ('{}') changed type from {} to {}",
                position, name, expected, found
            ),
        }
    }
}

/// Ordered, append-only list of slots
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct SlotLayout {
    slots: Vec<SlotDescriptor>,
}

impl SlotLayout {
    /// The three framework slots every layout starts with
    pub fn framework() -> Self {
        Self {
            slots: vec![
                SlotDescriptor::new(INITIALIZED, SlotType::Uint),
                SlotDescriptor::new(OWNER, SlotType::Address),
                SlotDescriptor::new(PAUSED, SlotType::Bool),
            ],
        }
    }

    /// Create a layout from raw descriptors, without the framework prefix
    ///
    /// Mostly useful for tests that need malformed layouts; implementations
    /// should start from [`SlotLayout::framework`].
    pub fn from_slots(slots: Vec<SlotDescriptor>) -> Self {
        Self { slots }
    }

    /// Append a slot, returning the extended layout
    ///
    /// # Examples
    ///
    /// ```
    /// use upbox_core::layout::SlotLayout;
    /// use upbox_core::value::SlotType;
    ///
    /// let v1 = SlotLayout::framework().with_slot("counter", SlotType::Uint);
    /// let v2 = v1.clone().with_slot("staked", SlotType::Balances);
    /// assert!(v2.check_extends(&v1).is_ok());
    /// assert!(v1.check_extends(&v2).is_err());
    /// ```
    pub fn with_slot(mut self, name: impl Into<String>, ty: SlotType) -> Self {
        self.slots.push(SlotDescriptor::new(name, ty));
        self
    }

    /// All slots in position order
    pub fn slots(&self) -> &[SlotDescriptor] {
        &self.slots
    }

    /// Number of slots
    pub fn len(&self) -> usize {
        self.slots.len()
    }

    /// Check if the layout has no slots
    pub fn is_empty(&self) -> bool {
        self.slots.is_empty()
    }

    /// Look up a slot by name
    pub fn position(&self, name: &str) -> Option<(SlotId, &SlotDescriptor)> {
        self.slots
            .iter()
            .enumerate()
            .find(|(_, s)| s.name == name)
            .map(|(i, s)| (i as SlotId, s))
    }

    /// Look up a slot by position
    pub fn get(&self, id: SlotId) -> Option<&SlotDescriptor> {
        self.slots.get(id as usize)
    }

    /// Check whether the named slot belongs to the framework prefix
    pub fn is_framework_slot(name: &str) -> bool {
        matches!(name, INITIALIZED | OWNER | PAUSED)
    }

    /// Check whether this layout begins with the framework prefix
    pub fn has_framework_prefix(&self) -> bool {
        self.check_extends(&Self::framework()).is_ok()
    }

    /// Find the first duplicated slot name, if any
    pub fn duplicate_name(&self) -> Option<&str> {
        let mut seen = HashSet::new();
        self.slots
            .iter()
            .find(|s| !seen.insert(s.name.as_str()))
            .map(|s| s.name.as_str())
    }

    /// Check that `self` is an append-only extension of `current`
    ///
    /// Every slot of `current` must appear in `self` at the same position
    /// with the same name and type. Extra trailing slots are allowed.
    pub fn check_extends(&self, current: &SlotLayout) -> Result<(), LayoutViolation> {
        for (i, old) in current.slots.iter().enumerate() {
            let position = i as SlotId;
            let new = match self.slots.get(i) {
                Some(s) => s,
                None => {
                    return Err(LayoutViolation::Removed {
                        position,
                        slot: old.clone(),
                    })
                }
            };
            if new.name != old.name {
                return Err(LayoutViolation::Renamed {
                    position,
                    expected: old.name.clone(),
                    found: new.name.clone(),
                });
            }
            if new.ty != old.ty {
                return Err(LayoutViolation::Retyped {
                    position,
                    name: old.name.clone(),
                    expected: old.ty,
                    found: new.ty,
                });
            }
        }
        Ok(())
    }

    /// Slots present in `self` but not in `current` (the appended tail)
    pub fn appended_since<'a>(&'a self, current: &SlotLayout) -> &'a [SlotDescriptor] {
        let start = current.len().min(self.slots.len());
        &self.slots[start..]
    }
}

impl fmt::Display for SlotLayout {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("[")?;
        for (i, slot) in self.slots.iter().enumerate() {
            if i > 0 {
                f.write_str(", ")?;
            }
            write!(f, "{}={}", i, slot)?;
        }
        f.write_str("]")
    }
}
