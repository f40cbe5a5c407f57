//! Per-owner doubly linked position lists.
//!
//! Positions are nodes in an id-keyed arena; id 0 is the terminator. Each
//! owner keeps `first`, `last` and `count`. Appending and splicing out a
//! position are O(1), so ownership transfers never walk the list.

use odra::prelude::*;
use crate::errors::ManagerError;
use crate::math::{checked_add, checked_sub};
use crate::types::{ListNode, OwnerIndex, NO_POSITION};

/// Storage the list algorithms run against.
pub trait ListStore {
    fn node(&self, id: u64) -> ListNode;
    fn set_node(&mut self, id: u64, node: ListNode);
    fn index(&self, owner: &Address) -> OwnerIndex;
    fn set_index(&mut self, owner: &Address, index: OwnerIndex);
}

/// Append `id` at the tail of `owner`'s list.
pub fn append<S: ListStore>(store: &mut S, owner: &Address, id: u64) -> Result<(), ManagerError> {
    let mut index = store.index(owner);
    let count = checked_add(index.count, 1)?;

    let node = ListNode { prev: index.last, next: NO_POSITION };
    if index.last != NO_POSITION {
        let mut tail = store.node(index.last);
        tail.next = id;
        store.set_node(index.last, tail);
    }
    if index.first == NO_POSITION {
        index.first = id;
    }
    index.last = id;
    index.count = count;

    store.set_node(id, node);
    store.set_index(owner, index);
    Ok(())
}

/// Splice `id` out of `owner`'s list, relinking its neighbours.
pub fn remove<S: ListStore>(store: &mut S, owner: &Address, id: u64) -> Result<(), ManagerError> {
    let mut index = store.index(owner);
    let count = checked_sub(index.count, 1)?;
    let node = store.node(id);

    if node.prev != NO_POSITION {
        let mut prev = store.node(node.prev);
        prev.next = node.next;
        store.set_node(node.prev, prev);
    }
    if node.next != NO_POSITION {
        let mut next = store.node(node.next);
        next.prev = node.prev;
        store.set_node(node.next, next);
    } else {
        index.last = node.prev;
    }
    if index.first == id {
        index.first = node.next;
    }
    index.count = count;

    store.set_node(id, ListNode::default());
    store.set_index(owner, index);
    Ok(())
}

/// Move `id` out of `from`'s list and onto the tail of `to`'s.
pub fn transfer<S: ListStore>(
    store: &mut S,
    from: &Address,
    to: &Address,
    id: u64,
) -> Result<(), ManagerError> {
    remove(store, from, id)?;
    append(store, to, id)
}

/// Ids in `owner`'s list from head to tail, at most `max_count` of them.
pub fn collect<S: ListStore>(store: &S, owner: &Address, max_count: u64) -> Vec<u64> {
    let index = store.index(owner);
    let mut ids = Vec::new();
    let mut current = index.first;
    while current != NO_POSITION && (ids.len() as u64) < max_count {
        ids.push(current);
        current = store.node(current).next;
    }
    ids
}

/// Verify the list shape for one owner: mutual links, terminal pointers and count.
///
/// Walks at most `count + 1` nodes so a cycle cannot hang the check.
pub fn check_integrity<S: ListStore>(store: &S, owner: &Address) -> bool {
    let index = store.index(owner);
    if index.first == NO_POSITION || index.last == NO_POSITION {
        return index.first == NO_POSITION && index.last == NO_POSITION && index.count == 0;
    }
    if store.node(index.first).prev != NO_POSITION || store.node(index.last).next != NO_POSITION {
        return false;
    }

    let mut seen = 0u64;
    let mut prev = NO_POSITION;
    let mut current = index.first;
    while current != NO_POSITION {
        if seen > index.count {
            return false;
        }
        let node = store.node(current);
        if node.prev != prev {
            return false;
        }
        seen += 1;
        prev = current;
        current = node.next;
    }
    prev == index.last && seen == index.count
}
