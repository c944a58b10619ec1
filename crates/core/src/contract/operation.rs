//! Operation declarations
//!
//! Every operation an implementation exposes is declared up front with an
//! [`OperationSpec`]: its kind, the authorization it requires and the slots
//! it reads and writes. The controller enforces the declaration; the
//! implementation only supplies the transition function.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Authorization required to call an operation
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
pub enum AuthLevel {
    /// Anyone may call
    #[default]
    Public,
    /// Only the current owner may call
    OwnerOnly,
}

impl fmt::Display for AuthLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AuthLevel::Public => f.write_str("public"),
            AuthLevel::OwnerOnly => f.write_str("owner-only"),
        }
    }
}

/// What an operation does to storage
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum OperationKind {
    /// Reads only; declares no writes
    View,
    /// Reads and writes declared slots
    Mutating,
    /// One-time initializer (version 1)
    Initializer,
    /// Initializer introduced by a later version
    ///
    /// Whether it may run after deployment is decided by the controller's
    /// reinitializer policy.
    Reinitializer(u64),
}

impl OperationKind {
    /// Initializer version this operation claims, if it is an initializer
    pub fn initializer_version(&self) -> Option<u64> {
        match self {
            OperationKind::Initializer => Some(1),
            OperationKind::Reinitializer(v) => Some(*v),
            _ => None,
        }
    }
}

impl fmt::Display for OperationKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            OperationKind::View => f.write_str("view"),
            OperationKind::Mutating => f.write_str("mutating"),
            OperationKind::Initializer => f.write_str("initializer"),
            OperationKind::Reinitializer(v) => write!(f, "reinitializer({})", v),
        }
    }
}

/// Declaration of one operation
///
/// # Examples
///
/// ```
/// use upbox_core::contract::{AuthLevel, OperationKind, OperationSpec};
///
/// let stake = OperationSpec::mutating("stake").writes(&["staked"]);
/// assert_eq!(stake.kind, OperationKind::Mutating);
/// assert_eq!(stake.auth, AuthLevel::Public);
/// assert!(stake.may_write("staked"));
/// assert!(stake.may_read("staked"));
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OperationSpec {
    /// Operation name, unique within an implementation
    pub name: String,
    /// Storage behavior
    pub kind: OperationKind,
    /// Required authorization
    pub auth: AuthLevel,
    /// Slots the operation reads
    pub reads: Vec<String>,
    /// Slots the operation writes (readable as well)
    pub writes: Vec<String>,
}

impl OperationSpec {
    fn new(name: impl Into<String>, kind: OperationKind) -> Self {
        Self {
            name: name.into(),
            kind,
            auth: AuthLevel::Public,
            reads: Vec::new(),
            writes: Vec::new(),
        }
    }

    /// Declare a read-only operation
    pub fn view(name: impl Into<String>) -> Self {
        Self::new(name, OperationKind::View)
    }

    /// Declare a state-mutating operation
    pub fn mutating(name: impl Into<String>) -> Self {
        Self::new(name, OperationKind::Mutating)
    }

    /// Declare the one-time initializer
    pub fn initializer(name: impl Into<String>) -> Self {
        Self::new(name, OperationKind::Initializer)
    }

    /// Declare a later-version initializer
    pub fn reinitializer(name: impl Into<String>, version: u64) -> Self {
        Self::new(name, OperationKind::Reinitializer(version))
    }

    /// Require the caller to be the owner
    pub fn owner_only(mut self) -> Self {
        self.auth = AuthLevel::OwnerOnly;
        self
    }

    /// Declare slots read by the operation
    pub fn reads(mut self, slots: &[&str]) -> Self {
        self.reads.extend(slots.iter().map(|s| s.to_string()));
        self
    }

    /// Declare slots written by the operation
    pub fn writes(mut self, slots: &[&str]) -> Self {
        self.writes.extend(slots.iter().map(|s| s.to_string()));
        self
    }

    /// Check whether the operation declared read access to a slot
    pub fn may_read(&self, slot: &str) -> bool {
        self.reads.iter().any(|s| s == slot) || self.may_write(slot)
    }

    /// Check whether the operation declared write access to a slot
    pub fn may_write(&self, slot: &str) -> bool {
        self.writes.iter().any(|s| s == slot)
    }

    /// Check whether this is an initializer of any version
    pub fn is_initializer(&self) -> bool {
        self.kind.initializer_version().is_some()
    }

    /// All declared slots, reads first
    pub fn declared_slots(&self) -> impl Iterator<Item = &str> {
        self.reads.iter().chain(self.writes.iter()).map(|s| s.as_str())
    }
}
