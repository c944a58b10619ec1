//! Layout compatibility on upgrade
//!
//! A new layout must keep every existing slot at its position with its name
//! and type, and may only append.

use std::sync::Arc;

use crate::common::*;
use crate::LayoutOnly;
use upbox_core::{Error, SlotDescriptor, SlotLayout, SlotType};
use upbox_engine::Host;
use upbox_modules::{BoxV1, BoxV2, BoxV3, COUNTER, DEPOSITED, STAKED};

fn deployed_v2() -> (Host, upbox_core::ObjectHandle) {
    let host = Host::new();
    let handle = host
        .deploy(admin(), Arc::new(BoxV1), Some(set_call(200)))
        .unwrap();
    host.upgrade(handle, admin(), Arc::new(BoxV2)).unwrap();
    (host, handle)
}

fn assert_rejected(host: &Host, handle: upbox_core::ObjectHandle, layout: SlotLayout) {
    let digest = host.status(handle).unwrap().storage_digest;
    let err = host
        .upgrade(handle, admin(), Arc::new(LayoutOnly::new("bad", layout)))
        .unwrap_err();
    assert!(matches!(err, Error::IncompatibleLayout { .. }), "{:?}", err);

    let status = host.status(handle).unwrap();
    assert_eq!(status.implementation.version, 2);
    assert_eq!(status.storage_digest, digest);
    assert_eq!(host.history(handle).unwrap().len(), 2);
}

#[test]
fn removing_a_slot_is_rejected() {
    let (host, handle) = deployed_v2();
    assert_rejected(
        &host,
        handle,
        SlotLayout::framework().with_slot(COUNTER, SlotType::Uint),
    );
}

#[test]
fn retyping_a_slot_is_rejected() {
    let (host, handle) = deployed_v2();
    assert_rejected(
        &host,
        handle,
        SlotLayout::framework()
            .with_slot(COUNTER, SlotType::Int)
            .with_slot(STAKED, SlotType::Balances),
    );
}

#[test]
fn reordering_slots_is_rejected() {
    let (host, handle) = deployed_v2();
    assert_rejected(
        &host,
        handle,
        SlotLayout::framework()
            .with_slot(STAKED, SlotType::Balances)
            .with_slot(COUNTER, SlotType::Uint),
    );
}

#[test]
fn inserting_before_existing_slots_is_rejected() {
    let (host, handle) = deployed_v2();
    assert_rejected(
        &host,
        handle,
        SlotLayout::framework()
            .with_slot(COUNTER, SlotType::Uint)
            .with_slot(DEPOSITED, SlotType::Balances)
            .with_slot(STAKED, SlotType::Balances),
    );
}

#[test]
fn layout_without_framework_prefix_is_invalid() {
    let (host, handle) = deployed_v2();
    let bare = SlotLayout::from_slots(vec![SlotDescriptor::new(COUNTER, SlotType::Uint)]);
    let err = host
        .upgrade(handle, admin(), Arc::new(LayoutOnly::new("bare", bare)))
        .unwrap_err();
    assert!(matches!(err, Error::InvalidImplementation { .. }));
}

#[test]
fn appending_slots_is_accepted() {
    let (host, handle) = deployed_v2();
    let receipt = host.upgrade(handle, admin(), Arc::new(BoxV3)).unwrap();
    let appended: Vec<&str> = receipt
        .appended_slots
        .iter()
        .map(|s| s.name.as_str())
        .collect();
    assert_eq!(appended, vec![DEPOSITED]);
}

#[test]
fn identical_layout_is_accepted() {
    let (host, handle) = deployed_v2();
    let receipt = host.upgrade(handle, admin(), Arc::new(BoxV2)).unwrap();
    assert!(receipt.appended_slots.is_empty());
    assert_eq!(host.history(handle).unwrap().len(), 3);
}
