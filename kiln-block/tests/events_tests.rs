use std::cell::RefCell;
use std::rc::Rc;

use kiln_block::events::{dispatch, is_delegated, setup_delegated_event};
use kiln_block::{compile, config, mount, patch};
use kiln_dom::{Document, Event, Value};

type Log = Rc<RefCell<Vec<String>>>;

fn recorder(log: &Log, label: &'static str) -> Value {
    let log = Rc::clone(log);
    Value::handler(move |arg, ev| {
        log.borrow_mut()
            .push(format!("{label}:{}:{}", ev.name, arg.to_text()))
    })
}

#[test]
fn registration_is_idempotent() {
    assert!(!is_delegated("custom-event"));
    setup_delegated_event("custom-event");
    setup_delegated_event("custom-event");
    assert!(is_delegated("custom-event"));
}

#[test]
fn dispatch_reaches_the_nearest_handler() {
    let block = compile(
        "<div block-handler-0=\"click\"><button block-handler-1=\"click\"><span>x</span></button><em>y</em></div>",
    )
    .unwrap();
    let log: Log = Rc::default();
    let mut dom = Document::new();
    let root = dom.create_element("body");
    let mut node = block.create([recorder(&log, "outer"), recorder(&log, "button")], vec![]);
    mount(&mut dom, &mut node, root);

    let div = dom.first_child(root).unwrap();
    let button = dom.first_child(div).unwrap();
    let span = dom.first_child(button).unwrap();
    let em = dom.next_sibling(button).unwrap();

    assert!(dispatch(&dom, &Event::new("click", span)));
    assert!(dispatch(&dom, &Event::new("click", em)));
    assert_eq!(*log.borrow(), ["button:click:", "outer:click:"]);

    // no payload on the path from the root container
    assert!(!dispatch(&dom, &Event::new("click", root)));
    // never registered
    assert!(!dispatch(&dom, &Event::new("keydown", span)));
}

#[test]
fn handlers_follow_patches() {
    let block = compile("<button block-handler-0=\"click\">go</button>").unwrap();
    let log: Log = Rc::default();
    let mut dom = Document::new();
    let root = dom.create_element("body");
    let mut node = block.create([recorder(&log, "first")], vec![]);
    mount(&mut dom, &mut node, root);
    let button = dom.first_child(root).unwrap();

    patch(&mut dom, &mut node, block.create([recorder(&log, "second")], vec![]));
    dispatch(&dom, &Event::new("click", button));

    // a [handler, argument] pair
    let pair = Value::list([recorder(&log, "pair"), Value::from(7)]);
    patch(&mut dom, &mut node, block.create([pair], vec![]));
    dispatch(&dom, &Event::new("click", button));

    // null clears it
    patch(&mut dom, &mut node, block.create([Value::Null], vec![]));
    assert!(!dispatch(&dom, &Event::new("click", button)));

    assert_eq!(*log.borrow(), ["second:click:", "pair:click:7"]);
}

#[test]
fn the_main_handler_is_configurable() {
    let block = compile("<a block-handler-0=\"focus\">x</a>").unwrap();
    let seen: Log = Rc::default();
    let sink = Rc::clone(&seen);
    config::configure(|c| {
        c.event_handler = Rc::new(move |payload: &Value, ev: &Event| {
            sink.borrow_mut().push(format!("{}={}", ev.name, payload.to_text()))
        })
    });

    let mut dom = Document::new();
    let root = dom.create_element("body");
    let mut node = block.create([Value::from("plain-data")], vec![]);
    mount(&mut dom, &mut node, root);
    let a = dom.first_child(root).unwrap();
    assert!(dispatch(&dom, &Event::new("focus", a)));
    config::reset();

    assert_eq!(*seen.borrow(), ["focus=plain-data"]);
}
