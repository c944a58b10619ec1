//! Upgrade engine for upbox
//!
//! This crate runs deployed Boxes:
//! - [`controller`]: [`BoxProxy`], the single dispatch entry point and the
//!   upgrade, pause and ownership admin surface
//! - [`registry`]: the active implementation and upgrade history
//! - [`pause`]: the pause gate over the `paused` slot
//! - [`event_log`]: the hash-chained per-instance event log
//! - [`host`]: many isolated instances keyed by handle
//! - [`snapshot`]: capture and restore of a whole host
//! - [`config`]: host configuration
//!
//! # Example
//!
//! ```
//! use std::sync::Arc;
//! use upbox_core::{Address, Value};
//! use upbox_engine::{Host, InitCall};
//! use upbox_modules::{BoxV1, BoxV2};
//!
//! let host = Host::new();
//! let admin = Address::from_label("admin");
//! let handle = host
//!     .deploy(admin, Arc::new(BoxV1), Some(InitCall::new("set", vec![Value::Uint(200)])))
//!     .unwrap();
//!
//! host.upgrade(handle, admin, Arc::new(BoxV2)).unwrap();
//! assert_eq!(host.dispatch(handle, "get", &[], admin).unwrap(), Value::Uint(200));
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod config;
pub mod controller;
pub mod event_log;
pub mod host;
pub mod pause;
pub mod registry;
pub mod snapshot;

pub use config::{ConfigError, HostConfig, ReinitializerPolicy};
pub use controller::{BoxProxy, InitCall, InstanceStatus, UpgradeReceipt};
pub use event_log::{ChainVerification, EventLog, EventRecord, GENESIS_HASH};
pub use host::Host;
pub use pause::{PauseGate, PauseState};
pub use registry::{ImplementationRegistry, RegisteredImplementation, UpgradeRecord};
pub use snapshot::{HostSnapshot, ImplementationResolver, InstanceSnapshot};
