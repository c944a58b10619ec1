//! Upgradeability Integration Tests
//!
//! End-to-end lifecycle of a Box through `box-v1`, `box-v2` and `box-v3`:
//! initialization, pausing, upgrades, ownership and staking.
//!
//! ## Running Tests
//!
//! ```bash
//! cargo test --test upgradeability
//! cargo test --test upgradeability properties::
//! ```

#[path = "../common/mod.rs"]
mod common;

mod lifecycle;
mod properties;
mod scenarios;
