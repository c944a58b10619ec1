//! The command executor

use std::sync::Arc;

use tracing::debug;
use upbox_core::{Address, ObjectHandle};
use upbox_engine::Host;
use upbox_modules::Catalog;

use crate::{handlers, Command, Error, Output, Result};

/// Runs [`Command`]s against a host
///
/// Stateless apart from the shared host; clone it freely.
#[derive(Clone)]
pub struct Executor {
    host: Arc<Host>,
    catalog: Catalog,
}

fn require_handle(handle: Option<ObjectHandle>) -> Result<ObjectHandle> {
    handle.ok_or(Error::NoInstance)
}

fn require_caller(caller: Option<Address>) -> Result<Address> {
    caller.ok_or(Error::NoCaller)
}

impl Executor {
    /// Create an executor over a host and a module catalog
    pub fn new(host: Arc<Host>, catalog: Catalog) -> Self {
        Self { host, catalog }
    }

    /// The underlying host
    pub fn host(&self) -> &Arc<Host> {
        &self.host
    }

    /// Modules available for deploy and upgrade
    pub fn catalog(&self) -> &Catalog {
        &self.catalog
    }

    /// Execute a single command
    pub fn execute(&self, cmd: Command) -> Result<Output> {
        let name = cmd.name();
        debug!(command = name, "Executing command");
        let result = self.route(cmd);
        if let Err(e) = &result {
            debug!(command = name, code = e.code(), error = %e, "Command failed");
        }
        result
    }

    fn route(&self, cmd: Command) -> Result<Output> {
        let host = self.host.as_ref();
        match cmd {
            Command::Ping => Ok(Output::Pong {
                version: env!("CARGO_PKG_VERSION").to_string(),
            }),
            Command::Deploy {
                owner,
                module,
                init,
            } => handlers::deploy(host, &self.catalog, require_caller(owner)?, &module, init),
            Command::Call {
                handle,
                caller,
                operation,
                args,
            } => handlers::call(
                host,
                require_handle(handle)?,
                require_caller(caller)?,
                &operation,
                &args,
            ),
            Command::Upgrade {
                handle,
                caller,
                module,
            } => handlers::upgrade(
                host,
                &self.catalog,
                require_handle(handle)?,
                require_caller(caller)?,
                &module,
            ),
            Command::TransferOwnership {
                handle,
                caller,
                new_owner,
            } => handlers::transfer_ownership(
                host,
                require_handle(handle)?,
                require_caller(caller)?,
                new_owner,
            ),
            Command::Pause { handle, caller } => {
                handlers::pause(host, require_handle(handle)?, require_caller(caller)?)
            }
            Command::Unpause { handle, caller } => {
                handlers::unpause(host, require_handle(handle)?, require_caller(caller)?)
            }
            Command::Owner { handle } => handlers::owner(host, require_handle(handle)?),
            Command::Status { handle } => handlers::status(host, require_handle(handle)?),
            Command::Events { handle, since } => {
                handlers::events(host, require_handle(handle)?, since)
            }
            Command::VerifyEvents { handle } => {
                handlers::verify_events(host, require_handle(handle)?)
            }
            Command::History { handle } => handlers::history(host, require_handle(handle)?),
            Command::Operations { handle } => {
                handlers::operations(host, require_handle(handle)?)
            }
            Command::Slot { handle, name } => handlers::slot(host, require_handle(handle)?, &name),
            Command::Instances => handlers::instances(host),
            Command::Modules => handlers::modules(&self.catalog),
        }
    }
}
