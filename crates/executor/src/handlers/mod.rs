//! Command handlers
//!
//! One function per command; [`Executor::execute`](crate::Executor::execute)
//! resolves handles and callers and routes here.

mod admin;
mod call;
mod inspect;

pub(crate) use admin::{deploy, pause, transfer_ownership, unpause, upgrade};
pub(crate) use call::call;
pub(crate) use inspect::{
    events, history, instances, modules, operations, owner, slot, status, verify_events,
};
