//! Command execution layer for upbox
//!
//! Every interaction with a host can be expressed as a serializable
//! [`Command`] and answered with an [`Output`]. The [`Executor`] runs
//! commands against a [`Host`](upbox_engine::Host) and a
//! [`Catalog`](upbox_modules::Catalog) of deployable modules; a [`Session`]
//! adds a current caller and a current instance so commands can leave them
//! out.
//!
//! # Example
//!
//! ```
//! use std::sync::Arc;
//! use upbox_core::{Address, Value};
//! use upbox_engine::Host;
//! use upbox_executor::{Command, Executor, Output, Session};
//! use upbox_modules::Catalog;
//!
//! let executor = Executor::new(Arc::new(Host::new()), Catalog::builtin().clone());
//! let mut session = Session::new(executor, Address::from_label("admin"));
//!
//! session.execute(Command::Deploy {
//!     owner: None,
//!     module: "box-v1".into(),
//!     init: None,
//! }).unwrap();
//! let out = session.execute(Command::Call {
//!     handle: None,
//!     caller: None,
//!     operation: "get".into(),
//!     args: vec![],
//! }).unwrap();
//! assert_eq!(out, Output::Value(Value::Uint(0)));
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]

mod command;
mod error;
mod executor;
mod handlers;
mod output;
mod session;

pub use command::Command;
pub use error::{Error, Result, WireError};
pub use executor::Executor;
pub use output::{ModuleInfo, Output};
pub use session::Session;
