//! Session state for the CLI: the session plus optional snapshot persistence.

use std::path::PathBuf;
use std::sync::Arc;

use tracing::info;
use upbox_core::{Address, ImplementationId, Implementation, ObjectHandle};
use upbox_engine::{Host, HostConfig, HostSnapshot};
use upbox_executor::{Command, Error, Executor, Output, Session};
use upbox_modules::Catalog;

/// Identity used when no `--as` is given
pub const DEFAULT_CALLER: &str = "admin";

/// Mutable state carried across commands.
pub struct SessionState {
    session: Session,
    state_path: Option<PathBuf>,
}

impl SessionState {
    /// Open a host, restoring it from `state_path` if that file exists.
    pub fn open(
        config: HostConfig,
        state_path: Option<PathBuf>,
        caller: Address,
    ) -> Result<Self, Error> {
        let catalog = Catalog::builtin().clone();
        let host = match &state_path {
            Some(path) if path.exists() => {
                let snapshot = HostSnapshot::load(path)?;
                let resolver =
                    |id: &ImplementationId| -> Option<Arc<dyn Implementation>> { catalog.resolve(id) };
                let host = Host::restore(snapshot, &resolver, config)?;
                info!(path = %path.display(), instances = host.len(), "Loaded state");
                host
            }
            _ => Host::with_config(config),
        };

        let mut session = Session::new(Executor::new(Arc::new(host), catalog), caller);
        let handles = session.executor().host().handles();
        if let [only] = handles.as_slice() {
            session.select(*only)?;
        }
        Ok(Self {
            session,
            state_path,
        })
    }

    /// Execute a command and persist the host if a state file is set.
    pub fn execute(&mut self, cmd: Command) -> Result<Output, Error> {
        let output = self.session.execute(cmd)?;
        self.persist()?;
        Ok(output)
    }

    fn persist(&self) -> Result<(), Error> {
        if let Some(path) = &self.state_path {
            self.session.executor().host().snapshot()?.save(path)?;
        }
        Ok(())
    }

    /// Select an instance.
    pub fn use_handle(&mut self, handle: ObjectHandle) -> Result<(), Error> {
        self.session.select(handle)
    }

    /// Act as a different caller.
    pub fn set_caller(&mut self, caller: Address) {
        self.session.set_caller(caller);
    }

    /// Selected instance, if any.
    pub fn handle(&self) -> Option<ObjectHandle> {
        self.session.handle()
    }
}
