//! Implementation registry
//!
//! Holds the single active implementation of an instance together with the
//! declarations derived from it, and the append-only history of upgrades.
//! Swapping the active entry is a single pointer replacement under the
//! instance lock, so a call observes either the old or the new code.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;
use std::sync::Arc;
use upbox_core::contract::validate;
use upbox_core::{Implementation, ImplementationId, OperationSpec, Result, SlotLayout};

/// A validated implementation with its declarations cached
pub struct RegisteredImplementation {
    module: Arc<dyn Implementation>,
    id: ImplementationId,
    layout: SlotLayout,
    operations: BTreeMap<String, OperationSpec>,
}

impl RegisteredImplementation {
    /// Validate an implementation's declarations and cache them
    pub fn new(module: Arc<dyn Implementation>) -> Result<Self> {
        let id = module.id();
        let layout = module.layout();
        let specs = module.operations();
        validate(&id, &layout, &specs)?;
        let operations = specs.into_iter().map(|op| (op.name.clone(), op)).collect();
        Ok(Self {
            module,
            id,
            layout,
            operations,
        })
    }

    /// Implementation identity
    pub fn id(&self) -> &ImplementationId {
        &self.id
    }

    /// Declared slot layout
    pub fn layout(&self) -> &SlotLayout {
        &self.layout
    }

    /// Look up an operation declaration
    pub fn operation(&self, name: &str) -> Option<&OperationSpec> {
        self.operations.get(name)
    }

    /// All operation declarations, by name
    pub fn operations(&self) -> impl Iterator<Item = &OperationSpec> {
        self.operations.values()
    }

    /// The code itself
    pub fn module(&self) -> &Arc<dyn Implementation> {
        &self.module
    }
}

impl fmt::Debug for RegisteredImplementation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RegisteredImplementation")
            .field("id", &self.id)
            .field("slots", &self.layout.len())
            .field("operations", &self.operations.len())
            .finish()
    }
}

/// One entry of the upgrade history
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UpgradeRecord {
    /// Implementation replaced (`None` for the deployment entry)
    pub from: Option<ImplementationId>,
    /// Implementation installed
    pub to: ImplementationId,
    /// Microseconds since the Unix epoch
    pub at: i64,
}

/// The active implementation of one instance and how it got there
#[derive(Debug)]
pub struct ImplementationRegistry {
    active: Arc<RegisteredImplementation>,
    history: Vec<UpgradeRecord>,
}

impl ImplementationRegistry {
    /// Registry for a freshly deployed instance
    pub fn new(initial: RegisteredImplementation, at: i64) -> Self {
        let history = vec![UpgradeRecord {
            from: None,
            to: initial.id().clone(),
            at,
        }];
        Self {
            active: Arc::new(initial),
            history,
        }
    }

    /// Rebuild a registry from a recorded history
    ///
    /// The last history entry must name `active`.
    pub fn from_parts(
        active: RegisteredImplementation,
        history: Vec<UpgradeRecord>,
    ) -> std::result::Result<Self, String> {
        match history.last() {
            Some(last) if &last.to == active.id() => Ok(Self {
                active: Arc::new(active),
                history,
            }),
            Some(last) => Err(format!(
                "history ends at {} but active implementation is {}",
                last.to,
                active.id()
            )),
            None => Err("upgrade history is empty".to_string()),
        }
    }

    /// The active implementation
    pub fn active(&self) -> &Arc<RegisteredImplementation> {
        &self.active
    }

    /// Install `next` as the active implementation
    pub fn install(&mut self, next: RegisteredImplementation, at: i64) -> UpgradeRecord {
        let record = UpgradeRecord {
            from: Some(self.active.id().clone()),
            to: next.id().clone(),
            at,
        };
        self.active = Arc::new(next);
        self.history.push(record.clone());
        record
    }

    /// Undo the last [`install`](Self::install)
    pub(crate) fn revert(&mut self, previous: Arc<RegisteredImplementation>) {
        self.history.pop();
        self.active = previous;
    }

    /// Deployment entry followed by every upgrade, oldest first
    pub fn history(&self) -> &[UpgradeRecord] {
        &self.history
    }

    /// Number of upgrades since deployment
    pub fn upgrade_count(&self) -> usize {
        self.history.len().saturating_sub(1)
    }
}
