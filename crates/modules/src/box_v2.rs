use crate::{ops, BoxV1, BOX, STAKED};
use upbox_core::{
    CallContext, Implementation, ImplementationId, OperationSpec, Result, SlotLayout, SlotType,
    Value,
};

/// Second Box version: fixed `increment` and staking
#[derive(Debug, Clone, Copy, Default)]
pub struct BoxV2;

impl BoxV2 {
    pub(crate) fn staking_layout() -> SlotLayout {
        BoxV1::base_layout().with_slot(STAKED, SlotType::Balances)
    }

    pub(crate) fn staking_operations() -> Vec<OperationSpec> {
        let mut operations = BoxV1::counter_operations();
        operations.push(OperationSpec::mutating("stake").writes(&[STAKED]));
        operations.push(OperationSpec::view("read_staked_amount").reads(&[STAKED]));
        operations
    }

    pub(crate) fn execute_staking(
        operation: &str,
        ctx: &mut CallContext<'_>,
        args: &[Value],
    ) -> Result<Value> {
        match operation {
            "set" => ops::set(ctx, args),
            "get" => ops::get(ctx, args),
            "increment" => ops::increment(ctx, args),
            "stake" => ops::stake(ctx, args),
            "read_staked_amount" => ops::read_staked(ctx, args),
            other => Err(ops::unknown(other)),
        }
    }
}

impl Implementation for BoxV2 {
    fn id(&self) -> ImplementationId {
        ImplementationId::new(BOX, 2)
    }

    fn layout(&self) -> SlotLayout {
        Self::staking_layout()
    }

    fn operations(&self) -> Vec<OperationSpec> {
        Self::staking_operations()
    }

    fn execute(&self, operation: &str, ctx: &mut CallContext<'_>, args: &[Value]) -> Result<Value> {
        Self::execute_staking(operation, ctx, args)
    }
}
