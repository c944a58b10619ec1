//! Session Flow Tests
//!
//! A session carries a caller and a selected instance between commands.

use crate::common::*;
use upbox_core::{ObjectHandle, Value};
use upbox_executor::{Command, Error, Output, Session};

fn call(operation: &str, args: Vec<Value>) -> Command {
    Command::Call {
        handle: None,
        caller: None,
        operation: operation.into(),
        args,
    }
}

#[test]
fn deploy_selects_new_instance() {
    let mut session = Session::new(create_executor(), admin());
    assert_eq!(session.handle(), None);
    assert_eq!(
        session.execute(call("get", vec![])).unwrap_err(),
        Error::NoInstance
    );

    let output = session
        .execute(Command::Deploy {
            owner: None,
            module: "box-v1".into(),
            init: Some(set_call(200)),
        })
        .unwrap();
    let handle = match output {
        Output::Handle(h) => h,
        other => panic!("Expected Handle output, got {:?}", other),
    };
    assert_eq!(session.handle(), Some(handle));

    assert_eq!(
        session.execute(Command::Owner { handle: None }).unwrap(),
        Output::Address(admin())
    );
    assert_eq!(
        session.execute(call("get", vec![])).unwrap(),
        Output::Value(Value::Uint(200))
    );
}

#[test]
fn switching_caller_changes_authority() {
    let mut session = Session::new(create_executor(), admin());
    session
        .execute(Command::Deploy {
            owner: None,
            module: "box-v1".into(),
            init: Some(set_call(1)),
        })
        .unwrap();

    session.set_caller(other());
    let err = session
        .execute(Command::Pause {
            handle: None,
            caller: None,
        })
        .unwrap_err();
    assert_eq!(err.code(), "NotOwner");

    session.set_caller(admin());
    session
        .execute(Command::Pause {
            handle: None,
            caller: None,
        })
        .unwrap();
}

#[test]
fn explicit_fields_override_defaults() {
    let mut session = Session::new(create_executor(), admin());
    let first = match session
        .execute(Command::Deploy {
            owner: None,
            module: "box-v1".into(),
            init: Some(set_call(1)),
        })
        .unwrap()
    {
        Output::Handle(h) => h,
        other => panic!("Expected Handle output, got {:?}", other),
    };
    session
        .execute(Command::Deploy {
            owner: Some(new_admin()),
            module: "box-v1".into(),
            init: Some(set_call(2)),
        })
        .unwrap();

    assert_eq!(
        session
            .execute(Command::Call {
                handle: Some(first),
                caller: None,
                operation: "get".into(),
                args: vec![],
            })
            .unwrap(),
        Output::Value(Value::Uint(1))
    );
    assert_eq!(
        session.execute(Command::Owner { handle: None }).unwrap(),
        Output::Address(new_admin())
    );
}

#[test]
fn select_rejects_unknown_handle() {
    let mut session = Session::new(create_executor(), admin());
    let missing = ObjectHandle::new();
    let err = session.select(missing).unwrap_err();
    assert_eq!(err.code(), "HandleNotFound");
    assert_eq!(
        err,
        Error::Box(upbox_core::Error::HandleNotFound { handle: missing })
    );
    assert_eq!(session.handle(), None);
}
