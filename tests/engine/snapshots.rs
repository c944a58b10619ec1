//! Snapshot and restore
//!
//! A restored host is indistinguishable from the one captured: same digest,
//! owner, pause state, implementation and event chain. Corrupt snapshots are
//! rejected whole.

use std::sync::Arc;

use crate::common::*;
use upbox::prelude::*;
use upbox_core::{Error, Implementation};
use upbox_engine::{Host, HostSnapshot, PauseState};
use upbox_modules::Catalog;

fn resolver() -> impl Fn(&ImplementationId) -> Option<Arc<dyn Implementation>> {
    |id: &ImplementationId| Catalog::builtin().resolve(id)
}

fn populated(upbox: &Upbox) -> ObjectHandle {
    let b = upbox.deploy_box(admin(), 200).unwrap();
    b.upgrade(admin(), "box-v3").unwrap();
    b.stake(other(), 3).unwrap();
    b.deposit(other(), 4).unwrap();
    b.transfer_ownership(admin(), new_admin()).unwrap();
    b.pause(new_admin()).unwrap();
    b.handle()
}

#[test]
fn file_round_trip_preserves_instances() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("host.upbox");

    let upbox = Upbox::open(&path).unwrap();
    let handle = populated(&upbox);
    let second = deploy_counter(&upbox, 9);
    let before = upbox.get(handle).unwrap().status().unwrap();
    let events = upbox.get(handle).unwrap().events().unwrap();
    upbox.save().unwrap();
    drop(upbox);

    let reopened = Upbox::open(&path).unwrap();
    assert_eq!(reopened.handles().len(), 2);

    let b = reopened.get(handle).unwrap();
    let after = b.status().unwrap();
    assert_eq!(after.storage_digest, before.storage_digest);
    assert_eq!(after.owner, new_admin());
    assert_eq!(after.pause_state, PauseState::Paused);
    assert_eq!(after.implementation, before.implementation);
    assert_eq!(b.events().unwrap(), events);
    assert!(b.verify_events().unwrap().is_valid);
    assert_eq!(b.history().unwrap().len(), 2);

    b.unpause(new_admin()).unwrap();
    assert_eq!(b.read_staked_amount(other()).unwrap(), 3);
    assert_eq!(b.read_deposited_amount(other()).unwrap(), 4);
    assert_eq!(reopened.get(second).unwrap().get(admin()).unwrap(), 9);
}

#[test]
fn restored_instance_keeps_initializer_state() {
    let upbox = create_upbox();
    let handle = deploy_counter(&upbox, 1);
    let snapshot = upbox.host().snapshot().unwrap();

    let host = Host::restore(snapshot, &resolver(), HostConfig::default()).unwrap();
    assert_eq!(
        host.dispatch(handle, "set", &[Value::Uint(2)], admin()),
        Err(Error::AlreadyInitialized)
    );
}

#[test]
fn tampered_event_is_rejected() {
    let upbox = create_upbox();
    populated(&upbox);
    let mut snapshot = upbox.host().snapshot().unwrap();
    snapshot.instances[0].events[4].event = BoxEvent::Staked {
        caller: other(),
        amount: 1_000,
    };

    let err = Host::restore(snapshot, &resolver(), HostConfig::default()).unwrap_err();
    assert!(matches!(err, Error::Snapshot { .. }), "{:?}", err);
}

#[test]
fn unknown_implementation_is_rejected() {
    let upbox = create_upbox();
    populated(&upbox);
    let snapshot = upbox.host().snapshot().unwrap();

    let nothing = |_: &ImplementationId| -> Option<Arc<dyn Implementation>> { None };
    let err = Host::restore(snapshot, &nothing, HostConfig::default()).unwrap_err();
    assert!(err.to_string().contains("unknown implementation"));
}

#[test]
fn store_that_does_not_fit_layout_is_rejected() {
    let upbox = create_upbox();
    populated(&upbox);
    let mut snapshot = upbox.host().snapshot().unwrap();
    // Claim the instance still runs v1, whose layout has no staking slots.
    snapshot.instances[0].implementation = ImplementationId::new("box", 1);

    assert!(Host::restore(snapshot, &resolver(), HostConfig::default()).is_err());
}

#[test]
fn unsupported_format_version_is_rejected() {
    let upbox = create_upbox();
    populated(&upbox);
    let mut snapshot = upbox.host().snapshot().unwrap();
    snapshot.format_version += 1;
    let bytes = snapshot.to_bytes().unwrap();

    assert!(matches!(
        HostSnapshot::from_bytes(&bytes),
        Err(Error::Snapshot { .. })
    ));
}

#[test]
fn garbage_bytes_are_rejected() {
    assert!(matches!(
        HostSnapshot::from_bytes(b"not a snapshot"),
        Err(Error::Snapshot { .. })
    ));
}
