//! Scenario tests
//!
//! Each test walks one documented lifecycle step from a fresh deployment.

use crate::common::*;
use upbox::prelude::*;

#[test]
fn deploy_then_set_once() {
    let upbox = create_upbox();
    let b = upbox.deploy(admin(), "box-v1", Some(set_call(200))).unwrap();

    assert_eq!(b.get(admin()).unwrap(), 200);
    assert_eq!(code_of(b.set(admin(), 200)), ErrorCode::AlreadyInitialized);
    assert_eq!(b.get(admin()).unwrap(), 200);
}

#[test]
fn pause_blocks_reads_until_unpaused() {
    let upbox = create_upbox();
    let b = upbox.deploy_box(admin(), 200).unwrap();

    b.pause(admin()).unwrap();
    assert_eq!(code_of(b.get(admin())), ErrorCode::Paused);

    b.unpause(admin()).unwrap();
    assert_eq!(b.get(admin()).unwrap(), 200);
}

#[test]
fn upgrade_fixes_increment_and_keeps_counter() {
    let upbox = create_upbox();
    let b = upbox.deploy_box(admin(), 200).unwrap();

    assert_eq!(b.increment(admin()).unwrap(), 199);

    b.upgrade(admin(), "box-v2").unwrap();
    assert_eq!(b.get(admin()).unwrap(), 199);

    assert_eq!(b.increment(admin()).unwrap(), 200);
    assert_eq!(b.increment(admin()).unwrap(), 201);
}

#[test]
fn stake_rejects_zero_and_records_positive() {
    let upbox = create_upbox();
    let b = upbox.deploy_box(admin(), 200).unwrap();
    b.upgrade(admin(), "box-v2").unwrap();

    assert_eq!(b.read_staked_amount(other()).unwrap(), 0);
    assert_eq!(code_of(b.stake(other(), 0)), ErrorCode::InvalidAmount);

    let before = b.events().unwrap().len();
    b.stake(other(), 1).unwrap();
    let events = b.events().unwrap();
    assert_eq!(events.len(), before + 1);
    assert_eq!(
        events.last().unwrap().event,
        BoxEvent::Staked {
            caller: other(),
            amount: 1
        }
    );
    assert_eq!(b.read_staked_amount(other()).unwrap(), 1);
}

#[test]
fn v3_keeps_stake_and_counter_and_adds_deposit() {
    let upbox = create_upbox();
    let b = upbox.deploy_box(admin(), 200).unwrap();
    b.upgrade(admin(), "box-v2").unwrap();
    b.stake(other(), 1).unwrap();

    b.upgrade(admin(), "box-v3").unwrap();
    assert_eq!(b.get(admin()).unwrap(), 200);
    assert_eq!(b.read_staked_amount(other()).unwrap(), 1);

    let before = b.events().unwrap().len();
    b.deposit(other(), 1).unwrap();
    let events = b.events().unwrap();
    assert_eq!(events.len(), before + 1);
    assert_eq!(
        events.last().unwrap().event,
        BoxEvent::Deposited {
            caller: other(),
            amount: 1
        }
    );
    assert_eq!(b.read_deposited_amount(other()).unwrap(), 1);
    assert_eq!(b.read_staked_amount(other()).unwrap(), 1);

    assert_eq!(code_of(b.deposit(other(), 0)), ErrorCode::InvalidAmount);
    assert_eq!(b.events().unwrap().len(), before + 1);
}
