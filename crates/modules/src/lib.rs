//! Built-in Box implementations
//!
//! Three versions of the same module, each extending the previous layout:
//!
//! | Version | Adds |
//! |---------|------|
//! | [`BoxV1`] | `counter`; `set`, `get`, `increment` (decrements) |
//! | [`BoxV2`] | `staked`; fixed `increment`, `stake`, `read_staked_amount` |
//! | [`BoxV3`] | `deposited`; `deposit`, `read_deposited_amount` |
//!
//! [`Catalog`] maps names and ids to these implementations.

#![warn(missing_docs)]
#![warn(clippy::all)]

mod box_v1;
mod box_v2;
mod box_v3;
mod catalog;
mod ops;

pub use box_v1::BoxV1;
pub use box_v2::BoxV2;
pub use box_v3::BoxV3;
pub use catalog::Catalog;

/// Module name shared by every Box version
pub const BOX: &str = "box";

/// Slot holding the counter
pub const COUNTER: &str = "counter";
/// Slot holding per-account staked balances
pub const STAKED: &str = "staked";
/// Slot holding per-account deposited balances
pub const DEPOSITED: &str = "deposited";
