//! Stateful command session
//!
//! A [`Session`] remembers who is calling and which instance is selected,
//! the way a shell remembers its working directory. Commands that leave
//! out a handle or a caller get the session's.

use upbox_core::{Address, ObjectHandle};

use crate::{Command, Error, Executor, Output, Result};

/// Executor plus a current caller and a current instance
pub struct Session {
    executor: Executor,
    caller: Address,
    handle: Option<ObjectHandle>,
}

impl Session {
    /// Start a session acting as `caller`, with no instance selected
    pub fn new(executor: Executor, caller: Address) -> Self {
        Self {
            executor,
            caller,
            handle: None,
        }
    }

    /// The underlying executor
    pub fn executor(&self) -> &Executor {
        &self.executor
    }

    /// Current caller
    pub fn caller(&self) -> Address {
        self.caller
    }

    /// Act as a different caller
    pub fn set_caller(&mut self, caller: Address) {
        self.caller = caller;
    }

    /// Selected instance, if any
    pub fn handle(&self) -> Option<ObjectHandle> {
        self.handle
    }

    /// Select an existing instance
    pub fn select(&mut self, handle: ObjectHandle) -> Result<()> {
        if !self.executor.host().contains(handle) {
            return Err(Error::Box(upbox_core::Error::HandleNotFound { handle }));
        }
        self.handle = Some(handle);
        Ok(())
    }

    /// Execute a command, filling in the session's caller and instance
    ///
    /// A successful `Deploy` selects the new instance.
    pub fn execute(&mut self, cmd: Command) -> Result<Output> {
        let cmd = cmd.with_defaults(self.handle, self.caller);
        let output = self.executor.execute(cmd)?;
        if let Output::Handle(handle) = &output {
            self.handle = Some(*handle);
        }
        Ok(output)
    }
}
