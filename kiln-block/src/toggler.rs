use kiln_dom::{Document, NodeId};

use crate::{Key, VNode};

/// One child tagged with a key. A new key replaces the child instead of
/// patching it.
pub struct VToggler {
    key: Key,
    child: Box<VNode>,
    parent: Option<NodeId>,
}

impl VToggler {
    pub fn new(key: impl Into<Key>, child: VNode) -> Self {
        Self {
            key: key.into(),
            child: Box::new(child),
            parent: None,
        }
    }

    pub fn key(&self) -> &Key {
        &self.key
    }

    pub(crate) fn mount(&mut self, dom: &mut Document, parent: NodeId, anchor: Option<NodeId>) {
        self.parent = Some(parent);
        self.child.mount(dom, parent, anchor);
    }

    pub(crate) fn patch(&mut self, dom: &mut Document, new: VToggler) {
        if self.key == new.key {
            self.child.patch(dom, *new.child);
            return;
        }
        let Some(parent) = self.parent else {
            *self = new;
            return;
        };
        let mut next = new.child;
        next.mount(dom, parent, self.child.first_node());
        self.child.before_remove(dom);
        self.child.remove(dom);
        self.child = next;
        self.key = new.key;
    }

    pub(crate) fn move_before(&mut self, dom: &mut Document, target: Option<NodeId>) {
        self.child.move_before(dom, target);
    }

    pub(crate) fn before_remove(&mut self, dom: &mut Document) {
        self.child.before_remove(dom);
    }

    pub(crate) fn remove(&mut self, dom: &mut Document) {
        self.child.remove(dom);
    }

    pub(crate) fn first_node(&self) -> Option<NodeId> {
        self.child.first_node()
    }

    pub(crate) fn parent(&self) -> Option<NodeId> {
        self.parent
    }

    pub(crate) fn to_html(&self, dom: &Document) -> String {
        self.child.to_html(dom)
    }
}
