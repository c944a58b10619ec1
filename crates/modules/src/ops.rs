//! Transition functions shared between Box versions

use crate::{COUNTER, DEPOSITED, STAKED};
use upbox_core::contract::args;
use upbox_core::{BoxEvent, CallContext, Error, Result, Value};

pub(crate) fn set(ctx: &mut CallContext<'_>, args: &[Value]) -> Result<Value> {
    let value = args::uint(args, 0, "value")?;
    args::exactly(args, ctx.operation(), 1)?;
    ctx.write_uint(COUNTER, value)?;
    Ok(Value::Unit)
}

pub(crate) fn get(ctx: &mut CallContext<'_>, args: &[Value]) -> Result<Value> {
    args::none(args, ctx.operation())?;
    Ok(Value::Uint(ctx.read_uint(COUNTER)?))
}

/// The v1 `increment`, which subtracts
pub(crate) fn decrement(ctx: &mut CallContext<'_>, args: &[Value]) -> Result<Value> {
    args::none(args, ctx.operation())?;
    let value = ctx.read_uint(COUNTER)?.checked_sub(1).ok_or(Error::Overflow)?;
    ctx.write_uint(COUNTER, value)?;
    Ok(Value::Uint(value))
}

pub(crate) fn increment(ctx: &mut CallContext<'_>, args: &[Value]) -> Result<Value> {
    args::none(args, ctx.operation())?;
    let value = ctx.read_uint(COUNTER)?.checked_add(1).ok_or(Error::Overflow)?;
    ctx.write_uint(COUNTER, value)?;
    Ok(Value::Uint(value))
}

pub(crate) fn stake(ctx: &mut CallContext<'_>, args: &[Value]) -> Result<Value> {
    let amount = args::amount(args, 0)?;
    args::exactly(args, ctx.operation(), 1)?;
    let caller = ctx.caller();
    ctx.credit(STAKED, caller, amount)?;
    ctx.emit(BoxEvent::Staked { caller, amount })?;
    Ok(Value::Unit)
}

pub(crate) fn read_staked(ctx: &mut CallContext<'_>, args: &[Value]) -> Result<Value> {
    args::none(args, ctx.operation())?;
    Ok(Value::Uint(ctx.read_balance(STAKED, ctx.caller())?))
}

pub(crate) fn deposit(ctx: &mut CallContext<'_>, args: &[Value]) -> Result<Value> {
    let amount = args::amount(args, 0)?;
    args::exactly(args, ctx.operation(), 1)?;
    let caller = ctx.caller();
    ctx.credit(DEPOSITED, caller, amount)?;
    ctx.emit(BoxEvent::Deposited { caller, amount })?;
    Ok(Value::Unit)
}

pub(crate) fn read_deposited(ctx: &mut CallContext<'_>, args: &[Value]) -> Result<Value> {
    args::none(args, ctx.operation())?;
    Ok(Value::Uint(ctx.read_balance(DEPOSITED, ctx.caller())?))
}

pub(crate) fn unknown(operation: &str) -> Error {
    Error::UnknownOperation {
        operation: operation.to_string(),
    }
}
