//! Argument decoding helpers for transition functions

use crate::error::{Error, Result};
use crate::value::Value;

/// Reject any arguments for a nullary operation
pub fn none(args: &[Value], operation: &str) -> Result<()> {
    exactly(args, operation, 0)
}

/// Reject a call that does not pass exactly `count` arguments
pub fn exactly(args: &[Value], operation: &str, count: usize) -> Result<()> {
    if args.len() == count {
        return Ok(());
    }
    let expected = match count {
        0 => "no arguments".to_string(),
        1 => "1 argument".to_string(),
        n => format!("{} arguments", n),
    };
    Err(Error::invalid_argument(format!(
        "'{}' takes {}, got {}",
        operation,
        expected,
        args.len()
    )))
}

/// Decode a non-negative integer argument
///
/// Accepts `Uint` and non-negative `Int`.
pub fn uint(args: &[Value], index: usize, name: &str) -> Result<u64> {
    match args.get(index) {
        Some(Value::Uint(u)) => Ok(*u),
        Some(Value::Int(i)) if *i >= 0 => Ok(*i as u64),
        Some(Value::Int(i)) => Err(Error::invalid_argument(format!(
            "'{}' must be non-negative, got {}",
            name, i
        ))),
        Some(other) => Err(Error::invalid_argument(format!(
            "'{}' must be an integer, got {}",
            name,
            other.type_name()
        ))),
        None => Err(Error::invalid_argument(format!(
            "missing argument '{}' at position {}",
            name, index
        ))),
    }
}

/// Decode a strictly positive amount
///
/// Zero and negative integers fail with `InvalidAmount`; anything that is not
/// an integer fails with `InvalidArgument`.
pub fn amount(args: &[Value], index: usize) -> Result<u64> {
    match args.get(index) {
        Some(Value::Uint(0)) => Err(Error::InvalidAmount),
        Some(Value::Int(i)) if *i <= 0 => Err(Error::InvalidAmount),
        _ => uint(args, index, "amount"),
    }
}
