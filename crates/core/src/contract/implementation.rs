//! The implementation module contract
//!
//! An [`Implementation`] is immutable code: an id, a slot layout, a set of
//! operation declarations and a transition function. It never owns state.
//! The controller references implementations through `Arc<dyn
//! Implementation>`; upgrading swaps the reference, never the storage.

use crate::contract::{CallContext, OperationKind, OperationSpec};
use crate::error::{Error, Result};
use crate::layout::SlotLayout;
use crate::value::Value;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::fmt;

/// Identity of an implementation: a module name and a version
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct ImplementationId {
    /// Module name, shared by all versions
    pub name: String,
    /// Version number
    pub version: u32,
}

impl ImplementationId {
    /// Create an implementation id
    pub fn new(name: impl Into<String>, version: u32) -> Self {
        Self {
            name: name.into(),
            version,
        }
    }
}

impl fmt::Display for ImplementationId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}@{}", self.name, self.version)
    }
}

/// A swappable code unit interpreting a Box's storage
///
/// # Contract
///
/// - `layout()` and `operations()` are constant for the lifetime of the value
/// - `execute` touches storage only through the [`CallContext`] and is a pure
///   function of the slots it reads and its arguments
/// - `execute` is only ever called by the controller, after the pause gate,
///   authorization and initializer checks have passed
pub trait Implementation: Send + Sync {
    /// Identity of this implementation
    fn id(&self) -> ImplementationId;

    /// Slot layout this implementation interprets
    fn layout(&self) -> SlotLayout;

    /// Operations this implementation exposes
    fn operations(&self) -> Vec<OperationSpec>;

    /// Run the transition function of `operation`
    fn execute(&self, operation: &str, ctx: &mut CallContext<'_>, args: &[Value])
        -> Result<Value>;
}

/// Structural validation of an implementation's declarations
///
/// Checks that:
/// - the layout starts with the framework prefix and has unique slot names
/// - operation names are unique
/// - every declared slot exists in the layout
/// - no operation declares a framework slot writable
/// - view operations declare no writes
/// - reinitializer versions are greater than 1
pub fn validate(
    id: &ImplementationId,
    layout: &SlotLayout,
    operations: &[OperationSpec],
) -> Result<()> {
    let invalid = |reason: String| Error::InvalidImplementation {
        implementation: id.to_string(),
        reason,
    };

    if !layout.has_framework_prefix() {
        return Err(invalid(format!(
            "layout {} does not start with the framework slots",
            layout
        )));
    }
    if let Some(name) = layout.duplicate_name() {
        return Err(invalid(format!("slot '{}' is declared twice", name)));
    }

    let mut names = HashSet::new();
    for op in operations {
        if !names.insert(op.name.as_str()) {
            return Err(invalid(format!("operation '{}' is declared twice", op.name)));
        }
        for slot in op.declared_slots() {
            if layout.position(slot).is_none() {
                return Err(invalid(format!(
                    "operation '{}' declares unknown slot '{}'",
                    op.name, slot
                )));
            }
        }
        if let Some(slot) = op.writes.iter().find(|s| SlotLayout::is_framework_slot(s)) {
            return Err(invalid(format!(
                "operation '{}' may not write framework slot '{}'",
                op.name, slot
            )));
        }
        if op.kind == OperationKind::View && !op.writes.is_empty() {
            return Err(invalid(format!(
                "view operation '{}' declares writes",
                op.name
            )));
        }
        if let OperationKind::Reinitializer(v) = op.kind {
            if v < 2 {
                return Err(invalid(format!(
                    "reinitializer '{}' must have version 2 or higher, got {}",
                    op.name, v
                )));
            }
        }
    }
    Ok(())
}
