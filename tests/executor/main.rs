//! Executor Integration Tests
//!
//! Tests that the Executor routes every Command variant, that sessions fill
//! in their defaults, and that commands and errors survive JSON encoding.

#[path = "../common/mod.rs"]
mod common;

mod command_dispatch;
mod session_flow;
