//! Convenient imports for upbox.
//!
//! ```
//! use upbox::prelude::*;
//!
//! let upbox = Upbox::new();
//! let b = upbox.deploy_box(Address::from_label("admin"), 1)?;
//! # Ok::<(), upbox::Error>(())
//! ```

// Main entry point
pub use crate::boxes::BoxRef;
pub use crate::upbox::{Upbox, UpboxBuilder};

// Error handling
pub use crate::error::{Error, Result};

// Core types
pub use crate::types::{Address, BoxEvent, ErrorCode, ImplementationId, ObjectHandle, Value};

// Configuration
pub use crate::types::{HostConfig, InitCall, ReinitializerPolicy};
