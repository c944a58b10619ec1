//! Main entry point for upbox.
//!
//! This module provides the [`Upbox`] struct: a host of upgradeable Boxes
//! together with the catalog of modules they can be deployed from and
//! upgraded to.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use tracing::debug;
use upbox_core::{Address, Implementation, ImplementationId, ObjectHandle, Value};
use upbox_engine::{Host, HostConfig, HostSnapshot, InitCall, ReinitializerPolicy};
use upbox_modules::Catalog;

use crate::boxes::BoxRef;
use crate::error::{Error, Result};

/// A host of upgradeable Boxes.
///
/// Create one with [`Upbox::new`], [`Upbox::open`] or [`Upbox::builder`].
///
/// # Example
///
/// ```
/// use upbox::prelude::*;
///
/// let upbox = Upbox::new();
/// let admin = Address::from_label("admin");
///
/// let b = upbox.deploy(admin, "box-v1", Some(InitCall::new("set", vec![Value::Uint(200)])))?;
/// assert_eq!(b.increment(admin)?, 199);
///
/// b.upgrade(admin, "box-v2")?;
/// assert_eq!(b.increment(admin)?, 200);
/// # Ok::<(), upbox::Error>(())
/// ```
pub struct Upbox {
    host: Arc<Host>,
    catalog: Catalog,
    state_path: Option<PathBuf>,
}

impl Default for Upbox {
    fn default() -> Self {
        Self::new()
    }
}

impl Upbox {
    /// Create an empty in-memory host with the built-in modules.
    pub fn new() -> Self {
        Self {
            host: Arc::new(Host::new()),
            catalog: Catalog::builtin().clone(),
            state_path: None,
        }
    }

    /// Open a host backed by a snapshot file.
    ///
    /// Restores the file if it exists; otherwise starts empty. Call
    /// [`Upbox::save`] to write the host back.
    pub fn open(path: impl AsRef<Path>) -> Result<Self> {
        Self::builder().state(path).build()
    }

    /// Create a builder for host configuration.
    pub fn builder() -> UpboxBuilder {
        UpboxBuilder::new()
    }

    /// The underlying host.
    pub fn host(&self) -> &Arc<Host> {
        &self.host
    }

    /// Modules available for deploy and upgrade.
    pub fn catalog(&self) -> &Catalog {
        &self.catalog
    }

    pub(crate) fn module(&self, name: &str) -> Result<Arc<dyn Implementation>> {
        self.catalog
            .get(name)
            .ok_or_else(|| Error::UnknownModule(name.to_string()))
    }

    /// Deploy a catalog module, optionally running its initializer.
    pub fn deploy(
        &self,
        owner: Address,
        module: &str,
        init: Option<InitCall>,
    ) -> Result<BoxRef<'_>> {
        let handle = self.host.deploy(owner, self.module(module)?, init)?;
        Ok(BoxRef::new(self, handle))
    }

    /// Deploy a custom implementation.
    pub fn deploy_implementation(
        &self,
        owner: Address,
        implementation: Arc<dyn Implementation>,
        init: Option<InitCall>,
    ) -> Result<BoxRef<'_>> {
        let handle = self.host.deploy(owner, implementation, init)?;
        Ok(BoxRef::new(self, handle))
    }

    /// Deploy `box-v1` initialized with `value`.
    pub fn deploy_box(&self, owner: Address, value: u64) -> Result<BoxRef<'_>> {
        self.deploy(
            owner,
            "box-v1",
            Some(InitCall::new("set", vec![Value::Uint(value)])),
        )
    }

    /// View of an already deployed Box.
    pub fn get(&self, handle: ObjectHandle) -> Result<BoxRef<'_>> {
        if !self.host.contains(handle) {
            return Err(upbox_core::Error::HandleNotFound { handle }.into());
        }
        Ok(BoxRef::new(self, handle))
    }

    /// Handles of all deployed Boxes.
    pub fn handles(&self) -> Vec<ObjectHandle> {
        self.host.handles()
    }

    /// Write the host to its snapshot file.
    ///
    /// Does nothing for a host that was not opened from a file.
    pub fn save(&self) -> Result<()> {
        match &self.state_path {
            Some(path) => self.save_to(path),
            None => Ok(()),
        }
    }

    /// Write the host to a snapshot file.
    pub fn save_to(&self, path: impl AsRef<Path>) -> Result<()> {
        self.host.snapshot()?.save(path)?;
        Ok(())
    }
}

/// Builder for host configuration.
///
/// # Example
///
/// ```
/// use upbox::prelude::*;
///
/// let upbox = Upbox::builder()
///     .reinitializer_policy(ReinitializerPolicy::Versioned)
///     .build()?;
/// assert_eq!(upbox.host().config().reinitializer_policy, ReinitializerPolicy::Versioned);
/// # Ok::<(), upbox::Error>(())
/// ```
pub struct UpboxBuilder {
    config: HostConfig,
    config_file: Option<PathBuf>,
    catalog: Option<Catalog>,
    state_path: Option<PathBuf>,
}

impl Default for UpboxBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl UpboxBuilder {
    /// Start from the default configuration.
    pub fn new() -> Self {
        Self {
            config: HostConfig::default(),
            config_file: None,
            catalog: None,
            state_path: None,
        }
    }

    /// Use an explicit configuration.
    pub fn config(mut self, config: HostConfig) -> Self {
        self.config = config;
        self
    }

    /// Load configuration from a TOML file when building.
    ///
    /// Replaces any configuration set with [`UpboxBuilder::config`].
    pub fn config_file(mut self, path: impl AsRef<Path>) -> Self {
        self.config_file = Some(path.as_ref().to_path_buf());
        self
    }

    /// Set the reinitializer policy.
    pub fn reinitializer_policy(mut self, policy: ReinitializerPolicy) -> Self {
        self.config = self.config.reinitializer_policy(policy);
        self
    }

    /// Enable or disable the pre-upgrade store check.
    pub fn verify_storage(mut self, enabled: bool) -> Self {
        self.config = self.config.verify_storage(enabled);
        self
    }

    /// Use a custom module catalog instead of the built-in one.
    pub fn catalog(mut self, catalog: Catalog) -> Self {
        self.catalog = Some(catalog);
        self
    }

    /// Back the host with a snapshot file.
    pub fn state(mut self, path: impl AsRef<Path>) -> Self {
        self.state_path = Some(path.as_ref().to_path_buf());
        self
    }

    /// Build the host, restoring the snapshot file if one is set and exists.
    pub fn build(self) -> Result<Upbox> {
        let config = match &self.config_file {
            Some(path) => HostConfig::from_file(path)?,
            None => self.config,
        };
        let catalog = self.catalog.unwrap_or_else(|| Catalog::builtin().clone());

        let host = match &self.state_path {
            Some(path) if path.exists() => {
                debug!(path = %path.display(), "Restoring host");
                let snapshot = HostSnapshot::load(path)?;
                let resolver = |id: &ImplementationId| -> Option<Arc<dyn Implementation>> {
                    catalog.resolve(id)
                };
                Host::restore(snapshot, &resolver, config)?
            }
            _ => Host::with_config(config),
        };

        Ok(Upbox {
            host: Arc::new(host),
            catalog,
            state_path: self.state_path,
        })
    }
}
