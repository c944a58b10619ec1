//! Full lifecycle walk
//!
//! One Box through every version, two administrators and several pauses,
//! checking the event log at the end.

use crate::common::*;
use upbox::prelude::*;

#[test]
fn full_lifecycle() {
    let upbox = create_upbox();
    let b = upbox.deploy_box(admin(), 200).unwrap();

    // Only the first initializer call succeeds, whoever calls it.
    assert_eq!(code_of(b.set(new_admin(), 200)), ErrorCode::AlreadyInitialized);

    // Non-owners can neither upgrade nor pause.
    assert_eq!(code_of(b.upgrade(new_admin(), "box-v2")), ErrorCode::Unauthorized);
    assert_eq!(code_of(b.pause(new_admin())), ErrorCode::NotOwner);

    b.pause(admin()).unwrap();
    assert_eq!(code_of(b.get(admin())), ErrorCode::Paused);
    b.unpause(admin()).unwrap();

    assert_eq!(b.increment(admin()).unwrap(), 199);
    b.upgrade(admin(), "box-v2").unwrap();
    assert_eq!(b.get(admin()).unwrap(), 199);
    assert_eq!(b.increment(admin()).unwrap(), 200);

    b.transfer_ownership(admin(), new_admin()).unwrap();
    assert_eq!(b.owner().unwrap(), new_admin());
    assert_eq!(code_of(b.pause(admin())), ErrorCode::NotOwner);

    b.pause(new_admin()).unwrap();
    assert_eq!(code_of(b.get(admin())), ErrorCode::Paused);
    assert_eq!(code_of(b.get(new_admin())), ErrorCode::Paused);
    b.unpause(new_admin()).unwrap();
    assert_eq!(b.get(admin()).unwrap(), 200);

    b.upgrade(new_admin(), "box-v3").unwrap();
    assert_eq!(b.get(admin()).unwrap(), 200);
    assert_eq!(code_of(b.stake(other(), 0)), ErrorCode::InvalidAmount);
    b.stake(other(), 1).unwrap();
    assert_eq!(b.read_staked_amount(other()).unwrap(), 1);

    b.pause(new_admin()).unwrap();
    assert_eq!(code_of(b.stake(other(), 1)), ErrorCode::Paused);
    b.unpause(new_admin()).unwrap();
    assert_eq!(code_of(b.stake(other(), 0)), ErrorCode::InvalidAmount);

    let kinds: Vec<&str> = b
        .events()
        .unwrap()
        .iter()
        .map(|r| r.event.kind())
        .collect();
    assert_eq!(
        kinds,
        vec![
            "Upgraded",
            "OwnershipTransferred",
            "Initialized",
            "Paused",
            "Unpaused",
            "Upgraded",
            "OwnershipTransferred",
            "Paused",
            "Unpaused",
            "Upgraded",
            "Staked",
            "Paused",
            "Unpaused",
        ]
    );
    assert!(b.verify_events().unwrap().is_valid);

    let history: Vec<u32> = b
        .history()
        .unwrap()
        .iter()
        .map(|r| r.to.version)
        .collect();
    assert_eq!(history, vec![1, 2, 3]);
}

#[test]
fn unknown_handle_is_reported_with_its_value() {
    let upbox = create_upbox();
    upbox.deploy_box(admin(), 1).unwrap();
    let missing = ObjectHandle::new();

    let err = upbox.get(missing).unwrap_err();
    assert_eq!(err.code(), Some(ErrorCode::HandleNotFound));
    assert!(err.to_string().contains(&missing.to_string()));
}
