//! # Upbox
//!
//! Upgradeable state machines: each Box keeps one fixed storage while the
//! implementation interpreting it is swapped over time.
//!
//! ## Quick Start
//!
//! ```
//! use upbox::prelude::*;
//!
//! let upbox = Upbox::new();
//! let admin = Address::from_label("admin");
//!
//! // Deploy box-v1 and initialize the counter
//! let b = upbox.deploy_box(admin, 200)?;
//! assert_eq!(b.get(admin)?, 200);
//!
//! // Upgrade in place; storage is untouched
//! b.upgrade(admin, "box-v2")?;
//! assert_eq!(b.get(admin)?, 200);
//!
//! // New operations become available
//! b.stake(admin, 5)?;
//! assert_eq!(b.read_staked_amount(admin)?, 5);
//! # Ok::<(), upbox::Error>(())
//! ```
//!
//! ## Layers
//!
//! - [`Upbox`] - host of Boxes plus the module catalog
//! - [`BoxRef`] - typed handle to one Box
//! - [`upbox_engine`] - controller, pause gate, event log, snapshots
//! - [`upbox_modules`] - the built-in `box-v1`, `box-v2` and `box-v3`

#![warn(missing_docs)]

mod boxes;
mod error;
mod types;
mod upbox;

pub mod prelude;

// Re-export main entry points
pub use boxes::BoxRef;
pub use error::{Error, Result};
pub use upbox::{Upbox, UpboxBuilder};

// Re-export types
pub use types::*;
