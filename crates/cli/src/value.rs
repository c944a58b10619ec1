//! Parsing of identities and argument values typed at the prompt.

use upbox_core::{Address, ObjectHandle, Value};

/// Parse an identity: a `0x`-prefixed address, or a label hashed into one
pub fn parse_address(raw: &str) -> Result<Address, String> {
    if raw.starts_with("0x") || raw.starts_with("0X") {
        raw.parse()
            .map_err(|e| format!("invalid address '{}': {}", raw, e))
    } else if raw.is_empty() {
        Err("empty identity".to_string())
    } else {
        Ok(Address::from_label(raw))
    }
}

/// Parse an instance handle
pub fn parse_handle(raw: &str) -> Result<ObjectHandle, String> {
    raw.parse()
        .map_err(|e| format!("invalid handle '{}': {}", raw, e))
}

/// Parse an operation argument
///
/// Integers become `Uint` (or `Int` when negative), `true`/`false` become
/// `Bool`, and `0x` strings become addresses.
pub fn parse_value(raw: &str) -> Result<Value, String> {
    match raw {
        "true" => return Ok(Value::Bool(true)),
        "false" => return Ok(Value::Bool(false)),
        "()" | "unit" => return Ok(Value::Unit),
        _ => {}
    }
    if let Ok(u) = raw.parse::<u64>() {
        return Ok(Value::Uint(u));
    }
    if let Ok(i) = raw.parse::<i64>() {
        return Ok(Value::Int(i));
    }
    if raw.starts_with("0x") {
        return parse_address(raw).map(Value::Address);
    }
    Err(format!("cannot parse argument '{}'", raw))
}
