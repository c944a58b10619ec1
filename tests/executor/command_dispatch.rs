//! Command Dispatch Tests

use crate::common::*;
use upbox_core::{ObjectHandle, Value};
use upbox_engine::PauseState;
use upbox_executor::{Command, Error, Executor, Output};

fn deploy(executor: &Executor, module: &str, value: u64) -> ObjectHandle {
    match executor
        .execute(Command::Deploy {
            owner: Some(admin()),
            module: module.into(),
            init: Some(set_call(value)),
        })
        .unwrap()
    {
        Output::Handle(handle) => handle,
        other => panic!("Expected Handle output, got {:?}", other),
    }
}

fn call(handle: ObjectHandle, operation: &str, args: Vec<Value>) -> Command {
    Command::Call {
        handle: Some(handle),
        caller: Some(other()),
        operation: operation.into(),
        args,
    }
}

// ============================================================================
// Host Commands
// ============================================================================

#[test]
fn ping_returns_version_string() {
    let executor = create_executor();
    match executor.execute(Command::Ping).unwrap() {
        Output::Pong { version } => assert!(!version.is_empty()),
        other => panic!("Expected Pong output, got {:?}", other),
    }
}

#[test]
fn modules_lists_builtin_catalog() {
    let executor = create_executor();
    match executor.execute(Command::Modules).unwrap() {
        Output::Modules(modules) => {
            let names: Vec<&str> = modules.iter().map(|m| m.name.as_str()).collect();
            assert_eq!(names, vec!["box-v1", "box-v2", "box-v3"]);
            let v3 = &modules[2];
            assert!(v3.operations.iter().any(|op| op == "deposit"));
        }
        other => panic!("Expected Modules output, got {:?}", other),
    }
}

#[test]
fn instances_lists_deployed_handles() {
    let executor = create_executor();
    let a = deploy(&executor, "box-v1", 1);
    let b = deploy(&executor, "box-v2", 2);

    let mut expected = vec![a, b];
    expected.sort();
    assert_eq!(
        executor.execute(Command::Instances).unwrap(),
        Output::Handles(expected)
    );
}

// ============================================================================
// Box Commands
// ============================================================================

#[test]
fn call_returns_operation_value() {
    let executor = create_executor();
    let handle = deploy(&executor, "box-v1", 200);

    assert_eq!(
        executor.execute(call(handle, "get", vec![])).unwrap(),
        Output::Value(Value::Uint(200))
    );
    assert_eq!(
        executor.execute(call(handle, "increment", vec![])).unwrap(),
        Output::Value(Value::Uint(199))
    );
}

#[test]
fn upgrade_returns_receipt() {
    let executor = create_executor();
    let handle = deploy(&executor, "box-v1", 200);

    match executor
        .execute(Command::Upgrade {
            handle: Some(handle),
            caller: Some(admin()),
            module: "box-v2".into(),
        })
        .unwrap()
    {
        Output::Upgraded(receipt) => {
            assert_eq!(receipt.previous.version, 1);
            assert_eq!(receipt.current.version, 2);
            assert_eq!(receipt.appended_slots.len(), 1);
        }
        other => panic!("Expected Upgraded output, got {:?}", other),
    }
}

#[test]
fn admin_commands_return_unit() {
    let executor = create_executor();
    let handle = deploy(&executor, "box-v1", 1);

    let pause = Command::Pause {
        handle: Some(handle),
        caller: Some(admin()),
    };
    assert_eq!(executor.execute(pause).unwrap(), Output::Unit);

    match executor.execute(Command::Status { handle: Some(handle) }).unwrap() {
        Output::Status(status) => assert_eq!(status.pause_state, PauseState::Paused),
        other => panic!("Expected Status output, got {:?}", other),
    }

    let unpause = Command::Unpause {
        handle: Some(handle),
        caller: Some(admin()),
    };
    assert_eq!(executor.execute(unpause).unwrap(), Output::Unit);

    let transfer = Command::TransferOwnership {
        handle: Some(handle),
        caller: Some(admin()),
        new_owner: new_admin(),
    };
    assert_eq!(executor.execute(transfer).unwrap(), Output::Unit);
    assert_eq!(
        executor.execute(Command::Owner { handle: Some(handle) }).unwrap(),
        Output::Address(new_admin())
    );
}

#[test]
fn inspection_commands() {
    let executor = create_executor();
    let handle = deploy(&executor, "box-v1", 5);

    match executor
        .execute(Command::Events {
            handle: Some(handle),
            since: Some(2),
        })
        .unwrap()
    {
        Output::Events(records) => {
            assert_eq!(records.len(), 1);
            assert_eq!(records[0].event.kind(), "Initialized");
        }
        other => panic!("Expected Events output, got {:?}", other),
    }

    match executor
        .execute(Command::VerifyEvents { handle: Some(handle) })
        .unwrap()
    {
        Output::Chain(chain) => {
            assert!(chain.is_valid);
            assert_eq!(chain.length, 3);
        }
        other => panic!("Expected Chain output, got {:?}", other),
    }

    match executor.execute(Command::History { handle: Some(handle) }).unwrap() {
        Output::History(history) => {
            assert_eq!(history.len(), 1);
            assert!(history[0].from.is_none());
        }
        other => panic!("Expected History output, got {:?}", other),
    }

    match executor
        .execute(Command::Operations { handle: Some(handle) })
        .unwrap()
    {
        Output::Operations(ops) => {
            let names: Vec<&str> = ops.iter().map(|op| op.name.as_str()).collect();
            assert!(names.contains(&"set"));
            assert!(!names.contains(&"stake"));
        }
        other => panic!("Expected Operations output, got {:?}", other),
    }

    assert_eq!(
        executor
            .execute(Command::Slot {
                handle: Some(handle),
                name: "counter".into(),
            })
            .unwrap(),
        Output::MaybeValue(Some(Value::Uint(5)))
    );
    assert_eq!(
        executor
            .execute(Command::Slot {
                handle: Some(handle),
                name: "staked".into(),
            })
            .unwrap(),
        Output::MaybeValue(None)
    );
}

// ============================================================================
// Errors
// ============================================================================

#[test]
fn missing_handle_and_caller() {
    let executor = create_executor();
    assert_eq!(
        executor.execute(Command::Status { handle: None }).unwrap_err(),
        Error::NoInstance
    );

    let handle = deploy(&executor, "box-v1", 1);
    let anonymous = Command::Call {
        handle: Some(handle),
        caller: None,
        operation: "get".into(),
        args: vec![],
    };
    assert_eq!(executor.execute(anonymous).unwrap_err(), Error::NoCaller);
}

#[test]
fn unknown_module() {
    let executor = create_executor();
    let err = executor
        .execute(Command::Deploy {
            owner: Some(admin()),
            module: "box-v7".into(),
            init: None,
        })
        .unwrap_err();
    assert_eq!(err.code(), "UnknownModule");
    assert!(executor.host().is_empty());
}

#[test]
fn upgrade_by_non_owner_is_unauthorized_for_any_module() {
    let executor = create_executor();
    let handle = deploy(&executor, "box-v1", 1);

    for module in ["box-v2", "box-v7"] {
        let err = executor
            .execute(Command::Upgrade {
                handle: Some(handle),
                caller: Some(other()),
                module: module.into(),
            })
            .unwrap_err();
        assert_eq!(err.code(), "Unauthorized");
    }

    let err = executor
        .execute(Command::Upgrade {
            handle: Some(handle),
            caller: Some(admin()),
            module: "box-v7".into(),
        })
        .unwrap_err();
    assert_eq!(err.code(), "UnknownModule");
}

#[test]
fn box_errors_keep_their_codes() {
    let executor = create_executor();
    let handle = deploy(&executor, "box-v2", 1);

    let codes: Vec<&str> = vec![
        call(handle, "stake", vec![Value::Uint(0)]),
        call(handle, "set", vec![Value::Uint(1)]),
        call(handle, "deposit", vec![Value::Uint(1)]),
        call(handle, "stake", vec![Value::Uint(1), Value::Uint(2)]),
        Command::Pause {
            handle: Some(handle),
            caller: Some(other()),
        },
        Command::Upgrade {
            handle: Some(handle),
            caller: Some(other()),
            module: "box-v3".into(),
        },
    ]
    .into_iter()
    .map(|cmd| executor.execute(cmd).unwrap_err().code())
    .collect();

    assert_eq!(
        codes,
        vec![
            "InvalidAmount",
            "AlreadyInitialized",
            "UnknownOperation",
            "InvalidArgument",
            "NotOwner",
            "Unauthorized"
        ]
    );
}
