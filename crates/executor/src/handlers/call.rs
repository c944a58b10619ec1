use upbox_core::{Address, ObjectHandle, Value};
use upbox_engine::Host;

use crate::{Output, Result};

/// Handle Call command.
pub(crate) fn call(
    host: &Host,
    handle: ObjectHandle,
    caller: Address,
    operation: &str,
    args: &[Value],
) -> Result<Output> {
    let value = host.dispatch(handle, operation, args, caller)?;
    Ok(Output::Value(value))
}
