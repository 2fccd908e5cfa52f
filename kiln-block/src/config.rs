//! Per-thread engine configuration.

use std::cell::RefCell;
use std::rc::Rc;

use kiln_dom::{Event, Value};

/// Resolves a delegated handler payload into a call.
pub type EventHandler = Rc<dyn Fn(&Value, &Event)>;

#[derive(Clone)]
pub struct Config {
    /// Drop whitespace-only text nodes from templates (`<pre>` content excepted).
    pub normalize_whitespace: bool,
    pub event_handler: EventHandler,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            normalize_whitespace: true,
            event_handler: Rc::new(default_event_handler),
        }
    }
}

/// `Handler(f)` is called with a `Null` argument, `[Handler(f), arg]` with `arg`.
pub fn default_event_handler(payload: &Value, event: &Event) {
    match payload {
        Value::Handler(f) => f(&Value::Null, event),
        Value::List(items) => match &items[..] {
            [Value::Handler(f)] => f(&Value::Null, event),
            [Value::Handler(f), arg, ..] => f(arg, event),
            _ => tracing::warn!("`{}` payload is not a [handler, argument] pair", event.name),
        },
        other => tracing::warn!("`{}` payload {:?} is not callable", event.name, other),
    }
}

thread_local! {
    static CONFIG: RefCell<Config> = RefCell::new(Config::default());
}

/// Mutates the configuration of the current thread. `f` works on a copy, so
/// it may read the current settings through this module.
pub fn configure(f: impl FnOnce(&mut Config)) {
    let mut next = CONFIG.with(|c| c.borrow().clone());
    f(&mut next);
    CONFIG.with(|c| *c.borrow_mut() = next);
}

/// Restores the defaults.
pub fn reset() {
    CONFIG.with(|c| *c.borrow_mut() = Config::default());
}

pub fn normalize_whitespace() -> bool {
    CONFIG.with(|c| c.borrow().normalize_whitespace)
}

pub fn event_handler() -> EventHandler {
    CONFIG.with(|c| Rc::clone(&c.borrow().event_handler))
}
