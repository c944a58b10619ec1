//! Host isolation and concurrency
//!
//! Instances share nothing: upgrades, pauses and ownership of one never
//! show through another, including under concurrent use.

use std::sync::Arc;
use std::thread;

use crate::common::*;
use upbox_core::{Error, ObjectHandle, Value};
use upbox_engine::{Host, HostConfig, ReinitializerPolicy};
use upbox_modules::{BoxV1, BoxV2};

#[test]
fn instances_are_independent() {
    let host = Host::new();
    let a = host.deploy(admin(), Arc::new(BoxV1), Some(set_call(10))).unwrap();
    let b = host.deploy(new_admin(), Arc::new(BoxV1), Some(set_call(20))).unwrap();

    host.upgrade(a, admin(), Arc::new(BoxV2)).unwrap();
    host.pause(b, new_admin()).unwrap();

    assert_eq!(host.dispatch(a, "increment", &[], other()), Ok(Value::Uint(11)));
    assert_eq!(host.dispatch(b, "get", &[], other()), Err(Error::Paused));
    assert_eq!(host.status(b).unwrap().implementation.version, 1);

    // Owner of one instance has no authority over the other.
    assert_eq!(host.pause(a, new_admin()), Err(Error::NotOwner));
    assert_eq!(
        host.upgrade(b, admin(), Arc::new(BoxV2)).unwrap_err(),
        Error::Unauthorized
    );
}

#[test]
fn unknown_handle() {
    let host = Host::new();
    let missing = ObjectHandle::new();
    assert!(matches!(
        host.dispatch(missing, "get", &[], admin()),
        Err(Error::HandleNotFound { .. })
    ));
    assert_eq!(
        host.owner(missing),
        Err(Error::HandleNotFound { handle: missing })
    );
    assert!(!host.contains(missing));
}

#[test]
fn handles_are_sorted() {
    let host = Host::new();
    for i in 0..5 {
        host.deploy(admin(), Arc::new(BoxV1), Some(set_call(i))).unwrap();
    }
    let handles = host.handles();
    assert_eq!(handles.len(), 5);
    assert!(handles.windows(2).all(|w| w[0] < w[1]));
}

#[test]
fn concurrent_calls_across_instances() {
    let host = Arc::new(Host::new());
    let handles: Vec<ObjectHandle> = (0..4)
        .map(|_| {
            let h = host.deploy(admin(), Arc::new(BoxV1), Some(set_call(0))).unwrap();
            host.upgrade(h, admin(), Arc::new(BoxV2)).unwrap();
            h
        })
        .collect();

    let workers: Vec<_> = (0..8)
        .map(|i| {
            let host = Arc::clone(&host);
            let handle = handles[i % handles.len()];
            thread::spawn(move || {
                for _ in 0..100 {
                    host.dispatch(handle, "increment", &[], other()).unwrap();
                }
            })
        })
        .collect();
    for worker in workers {
        worker.join().unwrap();
    }

    for handle in handles {
        assert_eq!(host.dispatch(handle, "get", &[], other()), Ok(Value::Uint(200)));
        assert!(host.verify_events(handle).unwrap().is_valid);
    }
}

#[test]
fn config_applies_to_every_instance() {
    let config = HostConfig::default().reinitializer_policy(ReinitializerPolicy::Versioned);
    let host = Host::with_config(config);
    assert_eq!(
        host.config().reinitializer_policy,
        ReinitializerPolicy::Versioned
    );
    let handle = host.deploy(admin(), Arc::new(BoxV1), None).unwrap();
    assert_eq!(host.status(handle).unwrap().initialized_version, 0);
}
