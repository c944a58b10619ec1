//! Value types for slot storage
//!
//! This module defines the canonical [`Value`] carried by slots, operation
//! arguments and operation results, and the [`SlotType`] a layout assigns to
//! each slot.
//!
//! ## Typing Rules
//!
//! - No implicit coercions: `Uint(1)` != `Int(1)`
//! - Every [`SlotType`] has a zero value; a slot that was never written
//!   reads as the zero value of its declared type
//! - `Balances` is an ordered map so that its canonical encoding is stable

use crate::types::Address;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;

/// Per-address balance map stored in a single slot
pub type Balances = BTreeMap<Address, u64>;

/// Canonical upbox Value type
///
/// ## The Six Types
///
/// 1. `Unit` - absence of a value (operations with no result)
/// 2. `Bool` - boolean flag
/// 3. `Uint` - 64-bit unsigned integer (counters, amounts, versions)
/// 4. `Int` - 64-bit signed integer
/// 5. `Address` - an identity
/// 6. `Balances` - address-keyed map of unsigned amounts
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Value {
    /// No value
    Unit,

    /// Boolean true or false
    Bool(bool),

    /// 64-bit unsigned integer
    Uint(u64),

    /// 64-bit signed integer
    Int(i64),

    /// Address-like identity
    Address(Address),

    /// Address-keyed balances
    Balances(Balances),
}

impl Value {
    /// Returns the type name as a string (for error messages)
    pub fn type_name(&self) -> &'static str {
        match self {
            Value::Unit => "Unit",
            Value::Bool(_) => "Bool",
            Value::Uint(_) => "Uint",
            Value::Int(_) => "Int",
            Value::Address(_) => "Address",
            Value::Balances(_) => "Balances",
        }
    }

    /// The slot type this value can be stored under, if any
    ///
    /// `Unit` is a result-only value and has no slot type.
    pub fn slot_type(&self) -> Option<SlotType> {
        match self {
            Value::Unit => None,
            Value::Bool(_) => Some(SlotType::Bool),
            Value::Uint(_) => Some(SlotType::Uint),
            Value::Int(_) => Some(SlotType::Int),
            Value::Address(_) => Some(SlotType::Address),
            Value::Balances(_) => Some(SlotType::Balances),
        }
    }

    /// Check if this value is unit
    pub fn is_unit(&self) -> bool {
        matches!(self, Value::Unit)
    }

    /// Try to get as bool
    pub fn as_bool(&self) -> Option<bool> {
        match self {
            Value::Bool(b) => Some(*b),
            _ => None,
        }
    }

    /// Try to get as u64
    pub fn as_uint(&self) -> Option<u64> {
        match self {
            Value::Uint(u) => Some(*u),
            _ => None,
        }
    }

    /// Try to get as i64
    pub fn as_int(&self) -> Option<i64> {
        match self {
            Value::Int(i) => Some(*i),
            _ => None,
        }
    }

    /// Try to get as address
    pub fn as_address(&self) -> Option<Address> {
        match self {
            Value::Address(a) => Some(*a),
            _ => None,
        }
    }

    /// Try to get as balances reference
    pub fn as_balances(&self) -> Option<&Balances> {
        match self {
            Value::Balances(b) => Some(b),
            _ => None,
        }
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Unit => f.write_str("()"),
            Value::Bool(b) => write!(f, "{}", b),
            Value::Uint(u) => write!(f, "{}", u),
            Value::Int(i) => write!(f, "{}", i),
            Value::Address(a) => write!(f, "{}", a),
            Value::Balances(b) => {
                f.write_str("{")?;
                for (i, (addr, amount)) in b.iter().enumerate() {
                    if i > 0 {
                        f.write_str(", ")?;
                    }
                    write!(f, "{}: {}", addr, amount)?;
                }
                f.write_str("}")
            }
        }
    }
}

impl From<bool> for Value {
    fn from(b: bool) -> Self {
        Value::Bool(b)
    }
}

impl From<u64> for Value {
    fn from(u: u64) -> Self {
        Value::Uint(u)
    }
}

impl From<i64> for Value {
    fn from(i: i64) -> Self {
        Value::Int(i)
    }
}

impl From<Address> for Value {
    fn from(a: Address) -> Self {
        Value::Address(a)
    }
}

impl From<Balances> for Value {
    fn from(b: Balances) -> Self {
        Value::Balances(b)
    }
}

/// Type of a storage slot
///
/// Once a layout assigns a type to a slot, no later layout may change it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum SlotType {
    /// Boolean flag
    Bool,
    /// Unsigned 64-bit integer
    Uint,
    /// Signed 64-bit integer
    Int,
    /// Address-like identity
    Address,
    /// Address-keyed balances
    Balances,
}

impl SlotType {
    /// Zero value read from a slot that was never written
    pub fn zero(&self) -> Value {
        match self {
            SlotType::Bool => Value::Bool(false),
            SlotType::Uint => Value::Uint(0),
            SlotType::Int => Value::Int(0),
            SlotType::Address => Value::Address(Address::ZERO),
            SlotType::Balances => Value::Balances(Balances::new()),
        }
    }

    /// Human-readable name
    pub const fn name(&self) -> &'static str {
        match self {
            SlotType::Bool => "Bool",
            SlotType::Uint => "Uint",
            SlotType::Int => "Int",
            SlotType::Address => "Address",
            SlotType::Balances => "Balances",
        }
    }

    /// Check whether a value may be stored in a slot of this type
    pub fn admits(&self, value: &Value) -> bool {
        value.slot_type() == Some(*self)
    }
}

impl fmt::Display for SlotType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}
