//! Host snapshots
//!
//! A [`HostSnapshot`] captures every instance of a host: handle, active
//! implementation, upgrade history, store and event log. Implementations are
//! code, so they are stored by id and re-resolved on restore through an
//! [`ImplementationResolver`]. Restoring validates each store against its
//! layout and each event chain before any instance is accepted.
//!
//! Snapshots are encoded with MessagePack (`rmp-serde`, named fields).

use crate::config::HostConfig;
use crate::controller::BoxProxy;
use crate::event_log::{EventLog, EventRecord};
use crate::host::Host;
use crate::registry::{ImplementationRegistry, RegisteredImplementation, UpgradeRecord};
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::sync::Arc;
use tracing::{info, warn};
use upbox_core::{Error, Implementation, ImplementationId, ObjectHandle, Result, SlotStore};

/// Current snapshot encoding version
pub const SNAPSHOT_FORMAT_VERSION: u32 = 1;

/// Resolves stored implementation ids back to code
pub trait ImplementationResolver {
    /// Implementation for `id`, if known
    fn resolve(&self, id: &ImplementationId) -> Option<Arc<dyn Implementation>>;
}

impl<F> ImplementationResolver for F
where
    F: Fn(&ImplementationId) -> Option<Arc<dyn Implementation>>,
{
    fn resolve(&self, id: &ImplementationId) -> Option<Arc<dyn Implementation>> {
        self(id)
    }
}

/// Captured state of one instance
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct InstanceSnapshot {
    /// Instance handle
    pub handle: ObjectHandle,
    /// Active implementation
    pub implementation: ImplementationId,
    /// Upgrade history, deployment first
    pub history: Vec<UpgradeRecord>,
    /// Committed storage
    pub store: SlotStore,
    /// Committed events
    pub events: Vec<EventRecord>,
}

impl InstanceSnapshot {
    /// Capture an instance
    pub fn capture(proxy: &BoxProxy) -> Self {
        Self {
            handle: proxy.handle(),
            implementation: proxy.implementation().clone(),
            history: proxy.history().to_vec(),
            store: proxy.store().clone(),
            events: proxy.events().records().to_vec(),
        }
    }

    fn restore(
        self,
        resolver: &dyn ImplementationResolver,
        config: &HostConfig,
    ) -> Result<BoxProxy> {
        let handle = self.handle;
        let corrupt = |reason: String| Error::Snapshot {
            reason: format!("instance {}: {}", handle, reason),
        };

        let module = resolver
            .resolve(&self.implementation)
            .ok_or_else(|| corrupt(format!("unknown implementation {}", self.implementation)))?;
        let registered = RegisteredImplementation::new(module)?;
        if registered.id() != &self.implementation {
            return Err(corrupt(format!(
                "resolver returned {} for {}",
                registered.id(),
                self.implementation
            )));
        }
        self.store.validate(registered.layout())?;

        let events = EventLog::from_records(self.events);
        let verification = events.verify_chain();
        if !verification.is_valid {
            return Err(corrupt(format!(
                "event chain invalid at sequence {}: {}",
                verification.first_invalid.unwrap_or(0),
                verification.error.unwrap_or_default()
            )));
        }

        let registry = ImplementationRegistry::from_parts(registered, self.history).map_err(corrupt)?;
        Ok(BoxProxy::from_parts(
            handle,
            self.store,
            registry,
            events,
            config.clone(),
        ))
    }
}

/// Captured state of a whole host
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HostSnapshot {
    /// Encoding version
    pub format_version: u32,
    /// Microseconds since the Unix epoch
    pub created_at: i64,
    /// Instances, sorted by handle
    pub instances: Vec<InstanceSnapshot>,
}

impl HostSnapshot {
    /// Encode as MessagePack
    pub fn to_bytes(&self) -> Result<Vec<u8>> {
        rmp_serde::to_vec_named(self).map_err(|e| Error::Snapshot {
            reason: format!("failed to encode snapshot: {}", e),
        })
    }

    /// Decode from MessagePack
    pub fn from_bytes(bytes: &[u8]) -> Result<Self> {
        let snapshot: Self = rmp_serde::from_slice(bytes).map_err(|e| Error::Snapshot {
            reason: format!("failed to decode snapshot: {}", e),
        })?;
        if snapshot.format_version != SNAPSHOT_FORMAT_VERSION {
            return Err(Error::Snapshot {
                reason: format!(
                    "unsupported snapshot format {} (expected {})",
                    snapshot.format_version, SNAPSHOT_FORMAT_VERSION
                ),
            });
        }
        Ok(snapshot)
    }

    /// Write to `path`, replacing any previous file
    ///
    /// The bytes go to a sibling temporary file first and are renamed into
    /// place, so a crash never leaves a truncated snapshot behind.
    pub fn save(&self, path: impl AsRef<Path>) -> Result<()> {
        let path = path.as_ref();
        let bytes = self.to_bytes()?;
        let tmp = path.with_extension("tmp");
        let io = |e: std::io::Error| Error::Snapshot {
            reason: format!("failed to write {}: {}", path.display(), e),
        };
        std::fs::write(&tmp, &bytes).map_err(io)?;
        std::fs::rename(&tmp, path).map_err(io)?;
        info!(path = %path.display(), instances = self.instances.len(), "Saved snapshot");
        Ok(())
    }

    /// Read from `path`
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let bytes = std::fs::read(path).map_err(|e| Error::Snapshot {
            reason: format!("failed to read {}: {}", path.display(), e),
        })?;
        Self::from_bytes(&bytes)
    }
}

impl Host {
    /// Capture every instance
    pub fn snapshot(&self) -> Result<HostSnapshot> {
        let mut instances = Vec::with_capacity(self.len());
        for handle in self.handles() {
            instances.push(self.with_instance(handle, |proxy| Ok(InstanceSnapshot::capture(proxy)))?);
        }
        Ok(HostSnapshot {
            format_version: SNAPSHOT_FORMAT_VERSION,
            created_at: chrono::Utc::now().timestamp_micros(),
            instances,
        })
    }

    /// Rebuild a host from a snapshot
    ///
    /// Fails without returning a partial host if any instance cannot be
    /// restored.
    pub fn restore(
        snapshot: HostSnapshot,
        resolver: &dyn ImplementationResolver,
        config: HostConfig,
    ) -> Result<Host> {
        let host = Host::with_config(config);
        for instance in snapshot.instances {
            let handle = instance.handle;
            let proxy = instance.restore(resolver, host.config()).map_err(|e| {
                warn!(handle = %handle, error = %e, "Failed to restore instance");
                e
            })?;
            host.insert(proxy);
        }
        info!(instances = host.len(), "Restored host");
        Ok(host)
    }
}
