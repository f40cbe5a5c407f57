//! Position-level and handler-level permission predicate.
//!
//! Every mutating entry point of the manager builds a [`Capability`] and asks
//! [`is_permitted`] before touching storage or calling the ledger engine.

use odra::prelude::*;

/// What the caller wants to act on.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Capability {
    /// Act on one position; `owner` is its current owner (`None` if the id is unknown).
    Position {
        owner: Option<Address>,
        position_id: u64,
        caller: Address,
    },
    /// Move value into or out of a handler.
    Handler { handler: Address, caller: Address },
}

/// Read side of the delegation tables.
pub trait DelegationLookup {
    /// `owner` allowed `delegate` to act on `position_id`.
    fn position_delegated(&self, owner: &Address, position_id: u64, delegate: &Address) -> bool;
    /// `handler` allowed `delegate` to move value in and out of it.
    fn handler_delegated(&self, handler: &Address, delegate: &Address) -> bool;
}

pub fn is_permitted<T: DelegationLookup + ?Sized>(capability: &Capability, table: &T) -> bool {
    match capability {
        Capability::Position { owner: None, .. } => false,
        Capability::Position { owner: Some(owner), position_id, caller } => {
            caller == owner || table.position_delegated(owner, *position_id, caller)
        }
        Capability::Handler { handler, caller } => {
            caller == handler || table.handler_delegated(handler, caller)
        }
    }
}
