//! Deployment and admin surface: deploy, upgrade, ownership, pause.

use std::sync::Arc;

use upbox_core::{Address, Implementation, ObjectHandle};
use upbox_engine::{Host, InitCall};
use upbox_modules::Catalog;

use crate::{Error, Output, Result};

fn module(catalog: &Catalog, name: &str) -> Result<Arc<dyn Implementation>> {
    catalog.get(name).ok_or_else(|| Error::UnknownModule {
        name: name.to_string(),
    })
}

/// Handle Deploy command.
pub(crate) fn deploy(
    host: &Host,
    catalog: &Catalog,
    owner: Address,
    name: &str,
    init: Option<InitCall>,
) -> Result<Output> {
    let implementation = module(catalog, name)?;
    let handle = host.deploy(owner, implementation, init)?;
    Ok(Output::Handle(handle))
}

/// Handle Upgrade command.
pub(crate) fn upgrade(
    host: &Host,
    catalog: &Catalog,
    handle: ObjectHandle,
    caller: Address,
    name: &str,
) -> Result<Output> {
    let receipt = host.upgrade_with(handle, caller, || module(catalog, name))?;
    Ok(Output::Upgraded(receipt))
}

/// Handle TransferOwnership command.
pub(crate) fn transfer_ownership(
    host: &Host,
    handle: ObjectHandle,
    caller: Address,
    new_owner: Address,
) -> Result<Output> {
    host.transfer_ownership(handle, caller, new_owner)?;
    Ok(Output::Unit)
}

/// Handle Pause command.
pub(crate) fn pause(host: &Host, handle: ObjectHandle, caller: Address) -> Result<Output> {
    host.pause(handle, caller)?;
    Ok(Output::Unit)
}

/// Handle Unpause command.
pub(crate) fn unpause(host: &Host, handle: ObjectHandle, caller: Address) -> Result<Output> {
    host.unpause(handle, caller)?;
    Ok(Output::Unit)
}
