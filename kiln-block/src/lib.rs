//! Block-based virtual DOM.
//!
//! Templates with marker tags and attributes are compiled once into a
//! [`CompiledBlock`]. Each render creates lightweight [`VNode`]s from data;
//! the first render mounts them into a [`Document`], later renders patch the
//! mounted nodes with the new ones.
//!
//! ```
//! use kiln_block::{compile, mount, patch};
//! use kiln_dom::{Document, Value};
//!
//! let hello = compile("<p>Hello <block-text-0/></p>").unwrap();
//! let mut dom = Document::new();
//! let root = dom.create_element("div");
//!
//! let mut node = hello.create([Value::from("world")], vec![]);
//! mount(&mut dom, &mut node, root);
//! patch(&mut dom, &mut node, hello.create([Value::from("kiln")], vec![]));
//! assert_eq!(dom.inner_html(root), "<p>Hello kiln</p>");
//! ```

use std::any::Any;

pub use kiln_dom::{Document, Event, NodeId, Value};
use tracing::trace;

pub mod attributes;
mod block;
pub mod compiler;
pub mod config;
pub mod events;
mod html;
mod key;
mod list;
mod multi;
mod text;
mod toggler;

pub use block::{Block, CompiledBlock};
pub use compiler::{CompileError, compile};
pub use html::VHtml;
pub use key::Key;
pub use list::{ListItem, VList};
pub use multi::VMulti;
pub use text::VText;
pub use toggler::VToggler;

/// Node kind supplied from outside the engine, e.g. a component wrapper.
///
/// It follows the same protocol as the built-in kinds. `patch` receives the
/// node of the next render, which is expected to be of the implementing type.
pub trait CustomNode {
    fn mount(&mut self, dom: &mut Document, parent: NodeId, anchor: Option<NodeId>);
    fn patch(&mut self, dom: &mut Document, new: Box<dyn CustomNode>);
    fn move_before(&mut self, dom: &mut Document, target: Option<NodeId>);
    /// Runs before `remove`, while the whole subtree is still attached.
    fn before_remove(&mut self, _dom: &mut Document) {}
    fn remove(&mut self, dom: &mut Document);
    fn first_node(&self) -> Option<NodeId>;
    fn to_html(&self, dom: &Document) -> String;
    fn into_any(self: Box<Self>) -> Box<dyn Any>;
}

pub enum VNode {
    Block(Block),
    Text(VText),
    Html(VHtml),
    List(VList),
    Multi(VMulti),
    Toggler(VToggler),
    Custom(Box<dyn CustomNode>),
}

impl VNode {
    pub fn kind(&self) -> &'static str {
        match self {
            VNode::Block(_) => "block",
            VNode::Text(_) => "text",
            VNode::Html(_) => "html",
            VNode::List(_) => "list",
            VNode::Multi(_) => "multi",
            VNode::Toggler(_) => "toggler",
            VNode::Custom(_) => "custom",
        }
    }

    /// Inserts the node's DOM into `parent` before `anchor` (at the end for `None`).
    pub fn mount(&mut self, dom: &mut Document, parent: NodeId, anchor: Option<NodeId>) {
        match self {
            VNode::Block(b) => b.mount(dom, parent, anchor),
            VNode::Text(t) => t.mount(dom, parent, anchor),
            VNode::Html(h) => h.mount(dom, parent, anchor),
            VNode::List(l) => l.mount(dom, parent, anchor),
            VNode::Multi(m) => m.mount(dom, parent, anchor),
            VNode::Toggler(t) => t.mount(dom, parent, anchor),
            VNode::Custom(c) => c.mount(dom, parent, anchor),
        }
    }

    /// Brings the mounted DOM of `self` in line with `new`, which `self` then
    /// stands for. Nodes of different kinds are replaced.
    pub fn patch(&mut self, dom: &mut Document, new: VNode) {
        match (self, new) {
            (VNode::Block(a), VNode::Block(b)) => a.patch(dom, b),
            (VNode::Text(a), VNode::Text(b)) => a.patch(dom, b),
            (VNode::Html(a), VNode::Html(b)) => a.patch(dom, b),
            (VNode::List(a), VNode::List(b)) => a.patch(dom, b),
            (VNode::Multi(a), VNode::Multi(b)) => a.patch(dom, b),
            (VNode::Toggler(a), VNode::Toggler(b)) => a.patch(dom, b),
            (VNode::Custom(a), VNode::Custom(b)) => a.patch(dom, b),
            (this, new) => this.replace(dom, new),
        }
    }

    fn replace(&mut self, dom: &mut Document, mut new: VNode) {
        trace!("replacing {} node with {} node", self.kind(), new.kind());
        let first = self.first_node();
        if let Some(parent) = self.parent(dom) {
            // `new` shares the parent from here on: the old node may not clear it
            let only = self.is_only_child();
            self.set_only_child(false);
            if only {
                new.set_only_child(true);
            }
            new.mount(dom, parent, first);
            self.before_remove(dom);
            self.remove(dom);
        }
        *self = new;
    }

    /// Moves the node's DOM before `target` (to the end for `None`).
    pub fn move_before(&mut self, dom: &mut Document, target: Option<NodeId>) {
        match self {
            VNode::Block(b) => b.move_before(dom, target),
            VNode::Text(t) => t.move_before(dom, target),
            VNode::Html(h) => h.move_before(dom, target),
            VNode::List(l) => l.move_before(dom, target),
            VNode::Multi(m) => m.move_before(dom, target),
            VNode::Toggler(t) => t.move_before(dom, target),
            VNode::Custom(c) => c.move_before(dom, target),
        }
    }

    /// Teardown hook, called top-down over a subtree before any `remove` in it.
    pub fn before_remove(&mut self, dom: &mut Document) {
        match self {
            VNode::Block(b) => b.before_remove(dom),
            VNode::List(l) => l.before_remove(dom),
            VNode::Multi(m) => m.before_remove(dom),
            VNode::Toggler(t) => t.before_remove(dom),
            VNode::Custom(c) => c.before_remove(dom),
            VNode::Text(_) | VNode::Html(_) => {}
        }
    }

    pub fn remove(&mut self, dom: &mut Document) {
        match self {
            VNode::Block(b) => b.remove(dom),
            VNode::Text(t) => t.remove(dom),
            VNode::Html(h) => h.remove(dom),
            VNode::List(l) => l.remove(dom),
            VNode::Multi(m) => m.remove(dom),
            VNode::Toggler(t) => t.remove(dom),
            VNode::Custom(c) => c.remove(dom),
        }
    }

    /// First DOM node owned by this node, used as an insertion point.
    pub fn first_node(&self) -> Option<NodeId> {
        match self {
            VNode::Block(b) => b.first_node(),
            VNode::Text(t) => t.first_node(),
            VNode::Html(h) => h.first_node(),
            VNode::List(l) => l.first_node(),
            VNode::Multi(m) => m.first_node(),
            VNode::Toggler(t) => t.first_node(),
            VNode::Custom(c) => c.first_node(),
        }
    }

    fn parent(&self, dom: &Document) -> Option<NodeId> {
        match self {
            VNode::Text(t) => t.parent(),
            VNode::Html(h) => h.parent(),
            VNode::List(l) => l.parent(),
            VNode::Multi(m) => m.parent(),
            VNode::Toggler(t) => t.parent(),
            VNode::Block(_) | VNode::Custom(_) => self.first_node().and_then(|n| dom.parent(n)),
        }
    }

    /// Serializes the DOM this node currently owns.
    pub fn to_html(&self, dom: &Document) -> String {
        match self {
            VNode::Block(b) => b.to_html(dom),
            VNode::Text(t) => t.to_html(dom),
            VNode::Html(h) => h.to_html(dom),
            VNode::List(l) => l.to_html(dom),
            VNode::Multi(m) => m.to_html(dom),
            VNode::Toggler(t) => t.to_html(dom),
            VNode::Custom(c) => c.to_html(dom),
        }
    }

    /// Set by a block before mounting into a slot that is its parent's only content.
    pub(crate) fn set_only_child(&mut self, only: bool) {
        match self {
            VNode::List(l) => l.set_only_child(only),
            VNode::Multi(m) => m.set_only_child(only),
            _ => {}
        }
    }

    fn is_only_child(&self) -> bool {
        match self {
            VNode::List(l) => l.is_only_child(),
            VNode::Multi(m) => m.is_only_child(),
            _ => false,
        }
    }
}

pub fn text(value: impl Into<Value>) -> VNode {
    VNode::Text(VText::new(value))
}

pub fn html(markup: impl Into<String>) -> VNode {
    VNode::Html(VHtml::new(markup))
}

pub fn list<K: Into<Key>>(items: impl IntoIterator<Item = (K, VNode)>) -> VNode {
    VNode::List(VList::new(
        items
            .into_iter()
            .map(|(key, node)| ListItem {
                key: key.into(),
                node,
            })
            .collect(),
    ))
}

pub fn multi(children: Vec<Option<VNode>>) -> VNode {
    VNode::Multi(VMulti::new(children))
}

pub fn toggler(key: impl Into<Key>, child: VNode) -> VNode {
    VNode::Toggler(VToggler::new(key, child))
}

/// Mounts `node` as the last content of `container`.
pub fn mount(dom: &mut Document, node: &mut VNode, container: NodeId) {
    node.mount(dom, container, None);
}

pub fn patch(dom: &mut Document, old: &mut VNode, new: VNode) {
    old.patch(dom, new);
}

/// Tears `node` down: `before_remove` over the whole subtree, then `remove`.
pub fn remove(dom: &mut Document, node: &mut VNode) {
    node.before_remove(dom);
    node.remove(dom);
}

/// Renders `node` into a scratch document and returns its markup.
pub fn render_to_string(mut node: VNode) -> String {
    let mut dom = Document::new();
    let root = dom.create_element("div");
    node.mount(&mut dom, root, None);
    dom.inner_html(root)
}
