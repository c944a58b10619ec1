//! Read-only introspection. None of these go through the pause gate.

use upbox_core::ObjectHandle;
use upbox_engine::Host;
use upbox_modules::Catalog;

use crate::{ModuleInfo, Output, Result};

/// Handle Owner command.
pub(crate) fn owner(host: &Host, handle: ObjectHandle) -> Result<Output> {
    Ok(Output::Address(host.owner(handle)?))
}

/// Handle Status command.
pub(crate) fn status(host: &Host, handle: ObjectHandle) -> Result<Output> {
    Ok(Output::Status(host.status(handle)?))
}

/// Handle Events command.
pub(crate) fn events(host: &Host, handle: ObjectHandle, since: Option<u64>) -> Result<Output> {
    let records = match since {
        Some(from) => host.events_since(handle, from)?,
        None => host.events(handle)?,
    };
    Ok(Output::Events(records))
}

/// Handle VerifyEvents command.
pub(crate) fn verify_events(host: &Host, handle: ObjectHandle) -> Result<Output> {
    Ok(Output::Chain(host.verify_events(handle)?))
}

/// Handle History command.
pub(crate) fn history(host: &Host, handle: ObjectHandle) -> Result<Output> {
    Ok(Output::History(host.history(handle)?))
}

/// Handle Operations command.
pub(crate) fn operations(host: &Host, handle: ObjectHandle) -> Result<Output> {
    let ops = host.with_instance(handle, |proxy| Ok(proxy.operations()))?;
    Ok(Output::Operations(ops))
}

/// Handle Slot command.
pub(crate) fn slot(host: &Host, handle: ObjectHandle, name: &str) -> Result<Output> {
    Ok(Output::MaybeValue(host.slot(handle, name)?))
}

/// Handle Instances command.
pub(crate) fn instances(host: &Host) -> Result<Output> {
    Ok(Output::Handles(host.handles()))
}

/// Handle Modules command.
pub(crate) fn modules(catalog: &Catalog) -> Result<Output> {
    let infos = catalog
        .names()
        .filter_map(|name| {
            catalog.get(name).map(|m| ModuleInfo {
                name: name.to_string(),
                implementation: m.id(),
                operations: m.operations().into_iter().map(|op| op.name).collect(),
            })
        })
        .collect();
    Ok(Output::Modules(infos))
}
