use crate::{ops, BoxV2, BOX, DEPOSITED};
use upbox_core::{
    CallContext, Implementation, ImplementationId, OperationSpec, Result, SlotLayout, SlotType,
    Value,
};

/// Third Box version: v2 plus deposits
#[derive(Debug, Clone, Copy, Default)]
pub struct BoxV3;

impl Implementation for BoxV3 {
    fn id(&self) -> ImplementationId {
        ImplementationId::new(BOX, 3)
    }

    fn layout(&self) -> SlotLayout {
        BoxV2::staking_layout().with_slot(DEPOSITED, SlotType::Balances)
    }

    fn operations(&self) -> Vec<OperationSpec> {
        let mut operations = BoxV2::staking_operations();
        operations.push(OperationSpec::mutating("deposit").writes(&[DEPOSITED]));
        operations.push(OperationSpec::view("read_deposited_amount").reads(&[DEPOSITED]));
        operations
    }

    fn execute(&self, operation: &str, ctx: &mut CallContext<'_>, args: &[Value]) -> Result<Value> {
        match operation {
            "deposit" => ops::deposit(ctx, args),
            "read_deposited_amount" => ops::read_deposited(ctx, args),
            other => BoxV2::execute_staking(other, ctx, args),
        }
    }
}
