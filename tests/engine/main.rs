//! Engine Integration Tests
//!
//! Tests for upbox-engine: layout compatibility, atomicity, the event hash
//! chain, snapshots and host isolation.

#[path = "../common/mod.rs"]
mod common;

mod atomicity;
mod host_isolation;
mod layout_compat;
mod snapshots;

use upbox_core::{
    CallContext, Implementation, ImplementationId, OperationSpec, Result, SlotLayout, Value,
};

/// Implementation with a given layout and no operations
pub struct LayoutOnly {
    pub id: ImplementationId,
    pub layout: SlotLayout,
}

impl LayoutOnly {
    pub fn new(name: &str, layout: SlotLayout) -> Self {
        Self {
            id: ImplementationId::new(name, 9),
            layout,
        }
    }
}

impl Implementation for LayoutOnly {
    fn id(&self) -> ImplementationId {
        self.id.clone()
    }

    fn layout(&self) -> SlotLayout {
        self.layout.clone()
    }

    fn operations(&self) -> Vec<OperationSpec> {
        Vec::new()
    }

    fn execute(&self, _: &str, _: &mut CallContext<'_>, _: &[Value]) -> Result<Value> {
        Ok(Value::Unit)
    }
}
