//! Delegated event handling.
//!
//! Elements carry their handler payload per event name; a single
//! document-level listener per registered name finds the nearest payload on
//! the path from the event target to the root.

use std::cell::RefCell;
use std::collections::HashSet;

use kiln_dom::{Document, Event, Value};
use tracing::trace;

use crate::config;

thread_local! {
    static DELEGATED: RefCell<HashSet<String>> = RefCell::new(HashSet::new());
}

/// Registers the document-level listener for `name`. Registering twice is a no-op.
pub fn setup_delegated_event(name: &str) {
    DELEGATED.with(|d| {
        let mut d = d.borrow_mut();
        if !d.contains(name) {
            trace!("delegating `{}` events", name);
            d.insert(name.to_string());
        }
    });
}

pub fn is_delegated(name: &str) -> bool {
    DELEGATED.with(|d| d.borrow().contains(name))
}

/// Delivers `event` to the nearest element on the target's ancestor path
/// holding a payload for it. Returns whether one was found.
pub fn dispatch(dom: &Document, event: &Event) -> bool {
    if !is_delegated(&event.name) {
        return false;
    }
    let mut current = Some(event.target);
    while let Some(node) = current {
        match dom.handler(node, &event.name) {
            Some(payload) if !matches!(payload, Value::Null) => {
                trace!("dispatching `{}` at {}", event.name, node);
                let payload = payload.clone();
                let handler = config::event_handler();
                handler(&payload, event);
                return true;
            }
            _ => current = dom.parent(node),
        }
    }
    false
}
