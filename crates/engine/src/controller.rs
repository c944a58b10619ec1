//! Upgrade controller
//!
//! A [`BoxProxy`] is one deployed Box: a fixed [`SlotStore`], the registry
//! pointing at the active implementation, and the event log. It is the only
//! place implementation code is invoked from, and every invocation goes
//! through [`BoxProxy::dispatch`]:
//!
//! 1. pause gate
//! 2. operation lookup
//! 3. owner check for owner-only operations
//! 4. initializer policy
//! 5. transition function on a staged [`CallContext`]
//! 6. commit of staged writes and events
//!
//! Steps 1-5 never touch committed state, so a failing call leaves the
//! store and the event log exactly as they were.

use crate::config::{HostConfig, ReinitializerPolicy};
use crate::event_log::EventLog;
use crate::pause::{PauseGate, PauseState};
use crate::registry::{ImplementationRegistry, RegisteredImplementation, UpgradeRecord};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::{debug, info, warn};
use upbox_core::layout::INITIALIZED_SLOT;
use upbox_core::{
    Address, BoxEvent, CallContext, Error, Implementation, ImplementationId, ObjectHandle,
    OperationKind, OperationSpec, Result, SlotDescriptor, SlotLayout, SlotStore, SlotType,
    StorageDigest, Value,
};
use upbox_security::AccessController;

/// Initializer to run as part of deployment
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct InitCall {
    /// Initializer operation name
    pub operation: String,
    /// Arguments
    pub args: Vec<Value>,
}

impl InitCall {
    /// Create an initializer call
    pub fn new(operation: impl Into<String>, args: Vec<Value>) -> Self {
        Self {
            operation: operation.into(),
            args,
        }
    }
}

/// Result of a successful upgrade
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UpgradeReceipt {
    /// Implementation replaced
    pub previous: ImplementationId,
    /// Implementation now active
    pub current: ImplementationId,
    /// Store digest at the time of the swap; the swap writes no slot
    pub storage_digest: StorageDigest,
    /// Slots the new layout adds
    pub appended_slots: Vec<SlotDescriptor>,
}

/// Point-in-time summary of an instance
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct InstanceStatus {
    /// Instance handle
    pub handle: ObjectHandle,
    /// Active implementation
    pub implementation: ImplementationId,
    /// Current owner
    pub owner: Address,
    /// Pause gate state
    pub pause_state: PauseState,
    /// Highest initializer version run (0 if never initialized)
    pub initialized_version: u64,
    /// Slots of the active layout
    pub slots: usize,
    /// Number of upgrades since deployment
    pub upgrades: usize,
    /// Number of committed events
    pub events: usize,
    /// Digest of the store
    pub storage_digest: StorageDigest,
}

/// One deployed Box
#[derive(Debug)]
pub struct BoxProxy {
    handle: ObjectHandle,
    store: SlotStore,
    registry: ImplementationRegistry,
    events: EventLog,
    config: HostConfig,
}

fn now() -> i64 {
    chrono::Utc::now().timestamp_micros()
}

impl BoxProxy {
    /// Deploy a new instance
    ///
    /// Assigns `initial_owner`, installs `implementation` and, if given, runs
    /// the initializer on behalf of the owner. Nothing is returned if any of
    /// these steps fails.
    pub fn deploy(
        handle: ObjectHandle,
        initial_owner: Address,
        implementation: Arc<dyn Implementation>,
        init: Option<InitCall>,
        config: HostConfig,
    ) -> Result<Self> {
        let registered = RegisteredImplementation::new(implementation)?;
        let id = registered.id().clone();
        let mut store = SlotStore::new();
        let ownership = AccessController::initialize_owner(&mut store, initial_owner)?;

        let mut events = EventLog::new();
        events.append_all(vec![
            BoxEvent::Upgraded {
                implementation: id.clone(),
            },
            ownership,
        ])?;

        let mut proxy = Self {
            handle,
            store,
            registry: ImplementationRegistry::new(registered, now()),
            events,
            config,
        };

        if let Some(init) = init {
            let kind = proxy
                .registry
                .active()
                .operation(&init.operation)
                .map(|op| op.kind);
            if kind != Some(OperationKind::Initializer) {
                return Err(Error::invalid_argument(format!(
                    "'{}' is not an initializer of {}",
                    init.operation, id
                )));
            }
            proxy.dispatch(initial_owner, &init.operation, &init.args)?;
        }

        info!(handle = %handle, implementation = %id, owner = %initial_owner, "Deployed instance");
        Ok(proxy)
    }

    /// Rebuild an instance from previously committed parts
    pub(crate) fn from_parts(
        handle: ObjectHandle,
        store: SlotStore,
        registry: ImplementationRegistry,
        events: EventLog,
        config: HostConfig,
    ) -> Self {
        Self {
            handle,
            store,
            registry,
            events,
            config,
        }
    }

    /// Run an implementation operation
    pub fn dispatch(&mut self, caller: Address, operation: &str, args: &[Value]) -> Result<Value> {
        let result = self.dispatch_inner(caller, operation, args);
        if let Err(e) = &result {
            if e.is_serious() {
                warn!(handle = %self.handle, operation, error = %e, "Dispatch failed");
            } else {
                debug!(handle = %self.handle, operation, error = %e, "Dispatch rejected");
            }
        }
        result
    }

    fn dispatch_inner(&mut self, caller: Address, operation: &str, args: &[Value]) -> Result<Value> {
        PauseGate::guard(&self.store)?;

        let active = Arc::clone(self.registry.active());
        let spec = active
            .operation(operation)
            .ok_or_else(|| Error::UnknownOperation {
                operation: operation.to_string(),
            })?;
        AccessController::check(&self.store, caller, spec.auth)?;
        let initialized = self.check_initializer(spec)?;

        let (output, effects) = {
            let mut ctx = CallContext::new(caller, spec, active.layout(), &self.store);
            let output = active.module().execute(operation, &mut ctx, args)?;
            (output, ctx.into_effects())
        };

        let mut events = effects.events;
        if let Some(version) = initialized {
            events.push(BoxEvent::Initialized { version });
        }
        self.events.append_all(events)?;
        self.store.apply(effects.writes);
        if let Some(version) = initialized {
            self.store.write(INITIALIZED_SLOT, Value::Uint(version));
            info!(handle = %self.handle, version, "Initialized");
        }
        Ok(output)
    }

    /// Version an initializer would record, or `AlreadyInitialized`
    fn check_initializer(&self, spec: &OperationSpec) -> Result<Option<u64>> {
        let current = self.initialized_version();
        match spec.kind {
            OperationKind::Initializer if current == 0 => Ok(Some(1)),
            OperationKind::Initializer => Err(Error::AlreadyInitialized),
            OperationKind::Reinitializer(version) => match self.config.reinitializer_policy {
                ReinitializerPolicy::Versioned if current < version => Ok(Some(version)),
                _ => Err(Error::AlreadyInitialized),
            },
            OperationKind::View | OperationKind::Mutating => Ok(None),
        }
    }

    /// Replace the active implementation
    ///
    /// Only the owner may upgrade, and the new layout must extend the current
    /// one. No slot is written and no initializer runs. Permitted while
    /// paused.
    pub fn upgrade(
        &mut self,
        caller: Address,
        implementation: Arc<dyn Implementation>,
    ) -> Result<UpgradeReceipt> {
        AccessController::authorize_upgrade(&self.store, caller)?;
        let next = RegisteredImplementation::new(implementation)?;

        let previous = Arc::clone(self.registry.active());
        next.layout()
            .check_extends(previous.layout())
            .map_err(|violation| {
                warn!(
                    handle = %self.handle,
                    from = %previous.id(),
                    to = %next.id(),
                    %violation,
                    "Upgrade rejected"
                );
                Error::IncompatibleLayout {
                    reason: violation.to_string(),
                }
            })?;
        let appended_slots = next.layout().appended_since(previous.layout()).to_vec();
        let current = next.id().clone();

        if self.config.verify_storage {
            self.store.validate(next.layout()).map_err(|e| {
                warn!(
                    handle = %self.handle,
                    to = %next.id(),
                    error = %e,
                    "Stored values do not fit the new layout"
                );
                Error::IncompatibleLayout {
                    reason: e.to_string(),
                }
            })?;
        }

        let digest = self.store.digest()?;
        self.registry.install(next, now());
        if let Err(e) = self.events.append(BoxEvent::Upgraded {
            implementation: current.clone(),
        }) {
            self.registry.revert(previous);
            return Err(e);
        }

        info!(
            handle = %self.handle,
            from = %previous.id(),
            to = %current,
            appended = appended_slots.len(),
            "Upgraded"
        );
        Ok(UpgradeReceipt {
            previous: previous.id().clone(),
            current,
            storage_digest: digest,
            appended_slots,
        })
    }

    /// Upgrade to an implementation looked up on behalf of `caller`
    ///
    /// `resolve` runs only once `caller` is known to be the owner, so a
    /// non-owner gets `Unauthorized` whatever they asked for.
    pub fn upgrade_with<E, F>(
        &mut self,
        caller: Address,
        resolve: F,
    ) -> std::result::Result<UpgradeReceipt, E>
    where
        E: From<Error>,
        F: FnOnce() -> std::result::Result<Arc<dyn Implementation>, E>,
    {
        AccessController::authorize_upgrade(&self.store, caller)?;
        let implementation = resolve()?;
        Ok(self.upgrade(caller, implementation)?)
    }

    /// Hand ownership to `new_owner`
    pub fn transfer_ownership(&mut self, caller: Address, new_owner: Address) -> Result<()> {
        let mut staged = self.store.clone();
        let event = AccessController::transfer_ownership(&mut staged, caller, new_owner)?;
        self.events.append(event)?;
        self.store = staged;
        info!(handle = %self.handle, previous = %caller, new = %new_owner, "Ownership transferred");
        Ok(())
    }

    /// Close the pause gate
    pub fn pause(&mut self, caller: Address) -> Result<()> {
        let mut staged = self.store.clone();
        let event = PauseGate::pause(&mut staged, caller)?;
        self.events.append(event)?;
        self.store = staged;
        Ok(())
    }

    /// Open the pause gate
    pub fn unpause(&mut self, caller: Address) -> Result<()> {
        let mut staged = self.store.clone();
        let event = PauseGate::unpause(&mut staged, caller)?;
        self.events.append(event)?;
        self.store = staged;
        Ok(())
    }

    // =========================================================================
    // Introspection (not gated)
    // =========================================================================

    /// Instance handle
    pub fn handle(&self) -> ObjectHandle {
        self.handle
    }

    /// Current owner
    pub fn owner(&self) -> Address {
        AccessController::owner(&self.store)
    }

    /// Pause gate state
    pub fn pause_state(&self) -> PauseState {
        PauseGate::state(&self.store)
    }

    /// Whether the pause gate is closed
    pub fn is_paused(&self) -> bool {
        self.pause_state() == PauseState::Paused
    }

    /// Active implementation
    pub fn implementation(&self) -> &ImplementationId {
        self.registry.active().id()
    }

    /// Active layout
    pub fn layout(&self) -> &SlotLayout {
        self.registry.active().layout()
    }

    /// Operations of the active implementation, by name
    pub fn operations(&self) -> Vec<OperationSpec> {
        self.registry.active().operations().cloned().collect()
    }

    /// Upgrade history, deployment first
    pub fn history(&self) -> &[UpgradeRecord] {
        self.registry.history()
    }

    /// Committed events
    pub fn events(&self) -> &EventLog {
        &self.events
    }

    /// Committed storage
    pub fn store(&self) -> &SlotStore {
        &self.store
    }

    /// Raw value of a slot of the active layout
    ///
    /// Reads storage directly; no operation is dispatched, so this works
    /// while paused.
    pub fn slot(&self, name: &str) -> Option<Value> {
        self.layout()
            .position(name)
            .map(|(id, desc)| self.store.read(id, desc.ty))
    }

    /// Highest initializer version run, 0 if never initialized
    pub fn initialized_version(&self) -> u64 {
        self.store
            .read(INITIALIZED_SLOT, SlotType::Uint)
            .as_uint()
            .unwrap_or(0)
    }

    /// Digest of the committed store
    pub fn storage_digest(&self) -> Result<StorageDigest> {
        self.store.digest()
    }

    /// Summary of this instance
    pub fn status(&self) -> Result<InstanceStatus> {
        Ok(InstanceStatus {
            handle: self.handle,
            implementation: self.implementation().clone(),
            owner: self.owner(),
            pause_state: self.pause_state(),
            initialized_version: self.initialized_version(),
            slots: self.layout().len(),
            upgrades: self.registry.upgrade_count(),
            events: self.events.len(),
            storage_digest: self.storage_digest()?,
        })
    }
}
