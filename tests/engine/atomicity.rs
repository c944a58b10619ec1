//! Call atomicity
//!
//! A failed call leaves the store digest and the event log exactly as they
//! were, even when the implementation staged writes or events first.

use std::sync::Arc;

use crate::common::*;
use upbox_core::{
    BoxEvent, CallContext, Error, Implementation, ImplementationId, OperationSpec, Result,
    SlotLayout, Value,
};
use upbox_engine::{Host, InitCall};
use upbox_modules::{BoxV1, BoxV2, COUNTER, STAKED};

/// `box-v2` layout with operations that misbehave after staging effects
struct Faulty;

impl Implementation for Faulty {
    fn id(&self) -> ImplementationId {
        ImplementationId::new("faulty", 1)
    }

    fn layout(&self) -> SlotLayout {
        BoxV2.layout()
    }

    fn operations(&self) -> Vec<OperationSpec> {
        vec![
            OperationSpec::mutating("write_then_fail").writes(&[COUNTER, STAKED]),
            OperationSpec::mutating("write_undeclared").writes(&[COUNTER]),
            OperationSpec::mutating("emit_then_fail").writes(&[STAKED]),
        ]
    }

    fn execute(&self, operation: &str, ctx: &mut CallContext<'_>, _: &[Value]) -> Result<Value> {
        match operation {
            "write_then_fail" => {
                ctx.write_uint(COUNTER, 42)?;
                ctx.credit(STAKED, ctx.caller(), 5)?;
                Err(Error::invalid_argument("rejected after writing"))
            }
            "write_undeclared" => {
                ctx.write_uint(COUNTER, 42)?;
                ctx.credit(STAKED, ctx.caller(), 5)?;
                Ok(Value::Unit)
            }
            "emit_then_fail" => {
                let caller = ctx.caller();
                ctx.credit(STAKED, caller, 1)?;
                ctx.emit(BoxEvent::Staked { caller, amount: 1 })?;
                Err(Error::Overflow)
            }
            other => Err(Error::UnknownOperation {
                operation: other.to_string(),
            }),
        }
    }
}

fn deploy_faulty(host: &Host) -> upbox_core::ObjectHandle {
    let handle = host
        .deploy(admin(), Arc::new(BoxV1), Some(set_call(200)))
        .unwrap();
    host.upgrade(handle, admin(), Arc::new(Faulty)).unwrap();
    handle
}

fn assert_untouched(host: &Host, handle: upbox_core::ObjectHandle, operation: &str) {
    let before = host.status(handle).unwrap();
    assert!(host.dispatch(handle, operation, &[], other()).is_err());
    let after = host.status(handle).unwrap();

    assert_eq!(after.storage_digest, before.storage_digest);
    assert_eq!(after.events, before.events);
    assert_eq!(host.slot(handle, COUNTER).unwrap(), Some(Value::Uint(200)));
}

#[test]
fn error_after_writes_discards_them() {
    let host = Host::new();
    let handle = deploy_faulty(&host);
    assert_untouched(&host, handle, "write_then_fail");
}

#[test]
fn undeclared_write_discards_earlier_writes() {
    let host = Host::new();
    let handle = deploy_faulty(&host);
    let err = host
        .dispatch(handle, "write_undeclared", &[], other())
        .unwrap_err();
    assert!(matches!(err, Error::UndeclaredSlot { .. }));
    assert_untouched(&host, handle, "write_undeclared");
}

#[test]
fn error_after_emit_discards_event() {
    let host = Host::new();
    let handle = deploy_faulty(&host);
    assert_untouched(&host, handle, "emit_then_fail");
    assert_eq!(host.events(handle).unwrap().len(), 4);
}

#[test]
fn overflow_leaves_counter() {
    let host = Host::new();
    let handle = host
        .deploy(admin(), Arc::new(BoxV1), Some(set_call(0)))
        .unwrap();
    let before = host.status(handle).unwrap();

    assert_eq!(
        host.dispatch(handle, "increment", &[], admin()),
        Err(Error::Overflow)
    );
    assert_eq!(host.status(handle).unwrap().storage_digest, before.storage_digest);
    assert_eq!(host.status(handle).unwrap().events, before.events);
}

#[test]
fn failed_initializer_aborts_deploy() {
    let host = Host::new();
    let err = host
        .deploy(
            admin(),
            Arc::new(BoxV1),
            Some(InitCall::new("set", vec![Value::Bool(true)])),
        )
        .unwrap_err();
    assert!(matches!(err, Error::InvalidArgument { .. }));
    assert!(host.is_empty());
}

#[test]
fn rejected_admin_calls_leave_no_events() {
    let host = Host::new();
    let handle = host
        .deploy(admin(), Arc::new(BoxV1), Some(set_call(1)))
        .unwrap();
    let before = host.status(handle).unwrap();

    assert!(host.pause(handle, other()).is_err());
    assert!(host.unpause(handle, admin()).is_err());
    assert!(host.transfer_ownership(handle, admin(), upbox_core::Address::ZERO).is_err());
    assert!(host.upgrade(handle, other(), Arc::new(BoxV2)).is_err());

    let after = host.status(handle).unwrap();
    assert_eq!(after.events, before.events);
    assert_eq!(after.storage_digest, before.storage_digest);
    assert_eq!(after.owner, admin());
}
