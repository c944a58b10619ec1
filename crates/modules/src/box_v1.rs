use crate::{ops, BOX, COUNTER};
use upbox_core::{
    CallContext, Implementation, ImplementationId, OperationSpec, Result, SlotLayout, SlotType,
    Value,
};

/// First Box version
///
/// `increment` subtracts one from the counter. The behavior is kept as
/// deployed; [`BoxV2`](crate::BoxV2) fixes it.
#[derive(Debug, Clone, Copy, Default)]
pub struct BoxV1;

impl BoxV1 {
    pub(crate) fn base_layout() -> SlotLayout {
        SlotLayout::framework().with_slot(COUNTER, SlotType::Uint)
    }

    pub(crate) fn counter_operations() -> Vec<OperationSpec> {
        vec![
            OperationSpec::initializer("set").writes(&[COUNTER]),
            OperationSpec::view("get").reads(&[COUNTER]),
            OperationSpec::mutating("increment").writes(&[COUNTER]),
        ]
    }
}

impl Implementation for BoxV1 {
    fn id(&self) -> ImplementationId {
        ImplementationId::new(BOX, 1)
    }

    fn layout(&self) -> SlotLayout {
        Self::base_layout()
    }

    fn operations(&self) -> Vec<OperationSpec> {
        Self::counter_operations()
    }

    fn execute(&self, operation: &str, ctx: &mut CallContext<'_>, args: &[Value]) -> Result<Value> {
        match operation {
            "set" => ops::set(ctx, args),
            "get" => ops::get(ctx, args),
            "increment" => ops::decrement(ctx, args),
            other => Err(ops::unknown(other)),
        }
    }
}
