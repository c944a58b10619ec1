//! Shared test utilities for the upbox integration suites.

#![allow(dead_code)]

use std::sync::Arc;

use upbox::prelude::*;
use upbox_engine::Host;
use upbox_executor::Executor;
use upbox_modules::Catalog;

/// Account that deploys every fixture Box
pub fn admin() -> Address {
    Address::from_label("admin")
}

/// Second administrator used by ownership tests
pub fn new_admin() -> Address {
    Address::from_label("new-admin")
}

/// Unprivileged account
pub fn other() -> Address {
    Address::from_label("other")
}

/// Fresh in-memory facade
pub fn create_upbox() -> Upbox {
    Upbox::new()
}

/// Fresh facade with the given reinitializer policy
pub fn create_upbox_with(policy: ReinitializerPolicy) -> Upbox {
    Upbox::builder()
        .reinitializer_policy(policy)
        .build()
        .unwrap()
}

/// Fresh executor over an empty host and the built-in catalog
pub fn create_executor() -> Executor {
    Executor::new(Arc::new(Host::new()), Catalog::builtin().clone())
}

/// `box-v1` with the counter initialized to `value`
pub fn deploy_counter(upbox: &Upbox, value: u64) -> ObjectHandle {
    upbox.deploy_box(admin(), value).unwrap().handle()
}

/// Init call for `set(value)`
pub fn set_call(value: u64) -> InitCall {
    InitCall::new("set", vec![Value::Uint(value)])
}

/// Error code of a failed facade call
pub fn code_of<T: std::fmt::Debug>(result: upbox::Result<T>) -> ErrorCode {
    result
        .unwrap_err()
        .code()
        .expect("expected a Box error")
}
