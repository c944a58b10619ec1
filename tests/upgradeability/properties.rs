//! Property tests
//!
//! Randomized callers, amounts and upgrade paths over the built-in modules.

use crate::common::*;
use proptest::prelude::*;
use upbox::prelude::*;
use upbox_modules::{COUNTER, DEPOSITED, STAKED};

fn non_admin() -> impl Strategy<Value = Address> {
    "[a-z]{1,12}"
        .prop_filter("must not be the admin", |label| label != "admin")
        .prop_map(|label| Address::from_label(&label))
}

/// Non-decreasing upgrade path starting after v1
fn upgrade_path() -> impl Strategy<Value = Vec<u32>> {
    prop::collection::vec(1u32..=3, 0..6).prop_map(|mut path| {
        path.sort_unstable();
        path
    })
}

fn module(version: u32) -> String {
    format!("box-v{}", version)
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(32))]

    /// Every slot written before an upgrade reads the same after it
    #[test]
    fn prop_upgrades_preserve_storage(
        initial in 10u64..1_000_000,
        amount in 1u64..1_000,
        path in upgrade_path(),
    ) {
        let upbox = create_upbox();
        let b = upbox.deploy_box(admin(), initial).unwrap();
        let mut version = 1;

        for next in path {
            b.increment(admin()).unwrap();
            if version >= 2 {
                b.stake(other(), amount).unwrap();
            }
            if version >= 3 {
                b.deposit(other(), amount).unwrap();
            }

            let before: Vec<Option<Value>> =
                [COUNTER, STAKED, DEPOSITED].iter().map(|s| b.slot(s).unwrap()).collect();
            let digest = b.status().unwrap().storage_digest;

            let receipt = b.upgrade(admin(), &module(next)).unwrap();
            prop_assert_eq!(receipt.storage_digest, digest);
            prop_assert_eq!(b.status().unwrap().storage_digest, digest);

            for (slot, old) in [COUNTER, STAKED, DEPOSITED].iter().zip(before) {
                if let Some(old) = old {
                    prop_assert_eq!(b.slot(slot).unwrap(), Some(old));
                }
            }
            version = next;
        }
    }

    /// A second initializer call fails for every caller
    #[test]
    fn prop_second_initialize_always_fails(caller in non_admin(), value in any::<u64>()) {
        let upbox = create_upbox();
        let b = upbox.deploy_box(admin(), 200).unwrap();

        prop_assert_eq!(code_of(b.set(caller, value)), ErrorCode::AlreadyInitialized);
        prop_assert_eq!(code_of(b.set(admin(), value)), ErrorCode::AlreadyInitialized);
        prop_assert_eq!(b.get(admin()).unwrap(), 200);
    }

    /// While paused every operation fails; afterwards state is as before
    #[test]
    fn prop_pause_blocks_everything(caller in non_admin(), amount in 1u64..1_000) {
        let upbox = create_upbox();
        let b = upbox.deploy_box(admin(), 200).unwrap();
        b.upgrade(admin(), "box-v3").unwrap();
        b.stake(caller, amount).unwrap();

        b.pause(admin()).unwrap();
        let digest = b.status().unwrap().storage_digest;
        let events = b.events().unwrap().len();
        prop_assert_eq!(code_of(b.get(caller)), ErrorCode::Paused);
        prop_assert_eq!(code_of(b.increment(caller)), ErrorCode::Paused);
        prop_assert_eq!(code_of(b.stake(caller, amount)), ErrorCode::Paused);
        prop_assert_eq!(code_of(b.deposit(caller, amount)), ErrorCode::Paused);
        prop_assert_eq!(b.status().unwrap().storage_digest, digest);
        prop_assert_eq!(b.events().unwrap().len(), events);

        b.unpause(admin()).unwrap();
        prop_assert_eq!(b.get(caller).unwrap(), 200);
        prop_assert_eq!(b.read_staked_amount(caller).unwrap(), amount);
        prop_assert_eq!(b.increment(caller).unwrap(), 201);
        b.stake(caller, amount).unwrap();
        b.deposit(caller, amount).unwrap();
    }

    /// Administrative calls by anyone but the owner are rejected
    #[test]
    fn prop_non_owner_is_rejected(caller in non_admin(), target in non_admin()) {
        let upbox = create_upbox();
        let b = upbox.deploy_box(admin(), 1).unwrap();

        prop_assert_eq!(code_of(b.upgrade(caller, "box-v2")), ErrorCode::Unauthorized);
        prop_assert_eq!(code_of(b.pause(caller)), ErrorCode::NotOwner);
        prop_assert_eq!(code_of(b.transfer_ownership(caller, target)), ErrorCode::NotOwner);

        b.pause(admin()).unwrap();
        prop_assert_eq!(code_of(b.unpause(caller)), ErrorCode::NotOwner);

        prop_assert_eq!(b.owner().unwrap(), admin());
        prop_assert_eq!(b.status().unwrap().implementation.version, 1);
    }

    /// Ownership moves completely and is announced once
    #[test]
    fn prop_transfer_is_atomic(successor in non_admin()) {
        let upbox = create_upbox();
        let b = upbox.deploy_box(admin(), 1).unwrap();
        let from = b.events().unwrap().len() as u64;

        b.transfer_ownership(admin(), successor).unwrap();

        prop_assert_eq!(code_of(b.pause(admin())), ErrorCode::NotOwner);
        prop_assert_eq!(code_of(b.upgrade(admin(), "box-v2")), ErrorCode::Unauthorized);
        b.pause(successor).unwrap();
        b.unpause(successor).unwrap();
        b.upgrade(successor, "box-v2").unwrap();

        let transfers: Vec<BoxEvent> = b
            .events_since(from)
            .unwrap()
            .into_iter()
            .map(|r| r.event)
            .filter(|e| e.kind() == "OwnershipTransferred")
            .collect();
        prop_assert_eq!(
            transfers,
            vec![BoxEvent::OwnershipTransferred { previous: admin(), new: successor }]
        );
    }
}
