//! Multi-instance host
//!
//! A [`Host`] owns any number of isolated [`BoxProxy`] instances keyed by
//! [`ObjectHandle`]. Each instance sits behind its own mutex, so calls on
//! one instance are serialized while different instances proceed
//! independently.

use crate::config::HostConfig;
use crate::controller::{BoxProxy, InitCall, InstanceStatus, UpgradeReceipt};
use crate::event_log::{ChainVerification, EventRecord};
use crate::registry::UpgradeRecord;
use dashmap::DashMap;
use parking_lot::Mutex;
use std::sync::Arc;
use tracing::debug;
use upbox_core::{Address, Error, Implementation, ObjectHandle, Result, Value};

/// Container of deployed Boxes
#[derive(Debug)]
pub struct Host {
    instances: DashMap<ObjectHandle, Arc<Mutex<BoxProxy>>>,
    config: HostConfig,
}

impl Default for Host {
    fn default() -> Self {
        Self::new()
    }
}

impl Host {
    /// Host with the default configuration
    pub fn new() -> Self {
        Self::with_config(HostConfig::default())
    }

    /// Host with an explicit configuration
    pub fn with_config(config: HostConfig) -> Self {
        Self {
            instances: DashMap::new(),
            config,
        }
    }

    /// Configuration applied to every instance
    pub fn config(&self) -> &HostConfig {
        &self.config
    }

    /// Deploy a new instance and return its handle
    pub fn deploy(
        &self,
        initial_owner: Address,
        implementation: Arc<dyn Implementation>,
        init: Option<InitCall>,
    ) -> Result<ObjectHandle> {
        let handle = ObjectHandle::new();
        let proxy = BoxProxy::deploy(
            handle,
            initial_owner,
            implementation,
            init,
            self.config.clone(),
        )?;
        self.instances.insert(handle, Arc::new(Mutex::new(proxy)));
        Ok(handle)
    }

    pub(crate) fn insert(&self, proxy: BoxProxy) {
        self.instances
            .insert(proxy.handle(), Arc::new(Mutex::new(proxy)));
    }

    fn instance(&self, handle: ObjectHandle) -> Result<Arc<Mutex<BoxProxy>>> {
        // Clone out of the map so the shard lock is released before locking.
        self.instances
            .get(&handle)
            .map(|entry| Arc::clone(entry.value()))
            .ok_or_else(|| {
                debug!(handle = %handle, "Unknown handle");
                Error::HandleNotFound { handle }
            })
    }

    /// Run `f` with exclusive access to one instance
    pub fn with_instance<R>(
        &self,
        handle: ObjectHandle,
        f: impl FnOnce(&mut BoxProxy) -> Result<R>,
    ) -> Result<R> {
        let instance = self.instance(handle)?;
        let mut proxy = instance.lock();
        f(&mut proxy)
    }

    /// Run an implementation operation on an instance
    pub fn dispatch(
        &self,
        handle: ObjectHandle,
        operation: &str,
        args: &[Value],
        caller: Address,
    ) -> Result<Value> {
        self.with_instance(handle, |proxy| proxy.dispatch(caller, operation, args))
    }

    /// Replace an instance's implementation
    pub fn upgrade(
        &self,
        handle: ObjectHandle,
        caller: Address,
        implementation: Arc<dyn Implementation>,
    ) -> Result<UpgradeReceipt> {
        self.with_instance(handle, |proxy| proxy.upgrade(caller, implementation))
    }

    /// Replace an instance's implementation, resolving it after authorization
    ///
    /// See [`BoxProxy::upgrade_with`].
    pub fn upgrade_with<E, F>(
        &self,
        handle: ObjectHandle,
        caller: Address,
        resolve: F,
    ) -> std::result::Result<UpgradeReceipt, E>
    where
        E: From<Error>,
        F: FnOnce() -> std::result::Result<Arc<dyn Implementation>, E>,
    {
        let instance = self.instance(handle)?;
        let mut proxy = instance.lock();
        proxy.upgrade_with(caller, resolve)
    }

    /// Hand an instance to a new owner
    pub fn transfer_ownership(
        &self,
        handle: ObjectHandle,
        caller: Address,
        new_owner: Address,
    ) -> Result<()> {
        self.with_instance(handle, |proxy| proxy.transfer_ownership(caller, new_owner))
    }

    /// Close an instance's pause gate
    pub fn pause(&self, handle: ObjectHandle, caller: Address) -> Result<()> {
        self.with_instance(handle, |proxy| proxy.pause(caller))
    }

    /// Open an instance's pause gate
    pub fn unpause(&self, handle: ObjectHandle, caller: Address) -> Result<()> {
        self.with_instance(handle, |proxy| proxy.unpause(caller))
    }

    /// Current owner of an instance
    pub fn owner(&self, handle: ObjectHandle) -> Result<Address> {
        self.with_instance(handle, |proxy| Ok(proxy.owner()))
    }

    /// Summary of an instance
    pub fn status(&self, handle: ObjectHandle) -> Result<InstanceStatus> {
        self.with_instance(handle, |proxy| proxy.status())
    }

    /// Upgrade history of an instance
    pub fn history(&self, handle: ObjectHandle) -> Result<Vec<UpgradeRecord>> {
        self.with_instance(handle, |proxy| Ok(proxy.history().to_vec()))
    }

    /// All committed events of an instance
    pub fn events(&self, handle: ObjectHandle) -> Result<Vec<EventRecord>> {
        self.with_instance(handle, |proxy| Ok(proxy.events().records().to_vec()))
    }

    /// Committed events with `sequence >= from`
    pub fn events_since(&self, handle: ObjectHandle, from: u64) -> Result<Vec<EventRecord>> {
        self.with_instance(handle, |proxy| Ok(proxy.events().since(from).to_vec()))
    }

    /// Check an instance's event hash chain
    pub fn verify_events(&self, handle: ObjectHandle) -> Result<ChainVerification> {
        self.with_instance(handle, |proxy| Ok(proxy.events().verify_chain()))
    }

    /// Raw value of a named slot of an instance
    pub fn slot(&self, handle: ObjectHandle, name: &str) -> Result<Option<Value>> {
        self.with_instance(handle, |proxy| Ok(proxy.slot(name)))
    }

    /// Whether a handle names a deployed instance
    pub fn contains(&self, handle: ObjectHandle) -> bool {
        self.instances.contains_key(&handle)
    }

    /// All handles, in sorted order
    pub fn handles(&self) -> Vec<ObjectHandle> {
        let mut handles: Vec<_> = self.instances.iter().map(|e| *e.key()).collect();
        handles.sort();
        handles
    }

    /// Number of deployed instances
    pub fn len(&self) -> usize {
        self.instances.len()
    }

    /// Whether no instance is deployed
    pub fn is_empty(&self) -> bool {
        self.instances.is_empty()
    }
}
