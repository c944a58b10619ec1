//! Output formatting: human-readable or JSON.

use upbox_executor::{Error, Output};

/// How results are printed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputMode {
    /// Plain text for people
    Human,
    /// One JSON document per result
    Json,
}

fn json<T: serde::Serialize>(value: &T) -> String {
    serde_json::to_string_pretty(value).unwrap_or_else(|e| format!("(error) {}", e))
}

fn hex(bytes: &[u8]) -> String {
    bytes.iter().map(|b| format!("{:02x}", b)).collect()
}

/// Format a successful result.
pub fn format_output(output: &Output, mode: OutputMode) -> String {
    if mode == OutputMode::Json {
        return json(output);
    }
    match output {
        Output::Unit => "OK".to_string(),
        Output::Pong { version } => format!("PONG {}", version),
        Output::Handle(handle) => handle.to_string(),
        Output::Handles(handles) if handles.is_empty() => "(empty)".to_string(),
        Output::Handles(handles) => handles
            .iter()
            .enumerate()
            .map(|(i, h)| format!("{}) {}", i + 1, h))
            .collect::<Vec<_>>()
            .join("\n"),
        Output::Value(value) => value.to_string(),
        Output::MaybeValue(Some(value)) => value.to_string(),
        Output::MaybeValue(None) => "(nil)".to_string(),
        Output::Address(address) => address.to_string(),
        Output::Upgraded(receipt) => {
            let mut lines = vec![
                format!("{} -> {}", receipt.previous, receipt.current),
                format!("storage digest: {}", receipt.storage_digest),
            ];
            for slot in &receipt.appended_slots {
                lines.push(format!("new slot: {}: {}", slot.name, slot.ty.name()));
            }
            lines.join("\n")
        }
        Output::Status(status) => [
            format!("handle:         {}", status.handle),
            format!("implementation: {}", status.implementation),
            format!("owner:          {}", status.owner),
            format!("state:          {}", status.pause_state),
            format!("initialized:    {}", status.initialized_version),
            format!("slots:          {}", status.slots),
            format!("upgrades:       {}", status.upgrades),
            format!("events:         {}", status.events),
            format!("digest:         {}", status.storage_digest),
        ]
        .join("\n"),
        Output::Events(records) if records.is_empty() => "(empty)".to_string(),
        Output::Events(records) => records
            .iter()
            .map(|r| format!("#{} [{}] {}", r.sequence, short_hash(&r.hash), r.event))
            .collect::<Vec<_>>()
            .join("\n"),
        Output::Chain(v) if v.is_valid => format!("valid ({} events)", v.length),
        Output::Chain(v) => format!(
            "INVALID at #{}: {}",
            v.first_invalid.unwrap_or(0),
            v.error.as_deref().unwrap_or("unknown")
        ),
        Output::History(records) => records
            .iter()
            .map(|r| match &r.from {
                Some(from) => format!("{} -> {}", from, r.to),
                None => format!("deployed {}", r.to),
            })
            .collect::<Vec<_>>()
            .join("\n"),
        Output::Operations(ops) => ops
            .iter()
            .map(|op| format!("{} ({}, {})", op.name, op.kind, op.auth))
            .collect::<Vec<_>>()
            .join("\n"),
        Output::Modules(modules) => modules
            .iter()
            .map(|m| format!("{} [{}]: {}", m.name, m.implementation, m.operations.join(", ")))
            .collect::<Vec<_>>()
            .join("\n"),
    }
}

/// Format an error.
pub fn format_error(error: &Error, mode: OutputMode) -> String {
    match mode {
        OutputMode::Json => json(&error.to_wire()),
        OutputMode::Human => format!("(error) {}", error),
    }
}

/// First four bytes of a hash, in hex.
pub fn short_hash(hash: &[u8; 32]) -> String {
    hex(&hash[..4])
}
