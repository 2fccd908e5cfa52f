use kiln_dom::{Document, NodeId};

use crate::VNode;

/// A fixed number of optional children, matched by position.
///
/// Every absent child is stood in for by an empty text node so a child that
/// later appears is mounted exactly where it belongs.
pub struct VMulti {
    children: Vec<Option<VNode>>,
    placeholders: Vec<Option<NodeId>>,
    parent: Option<NodeId>,
    is_only_child: bool,
}

impl VMulti {
    pub fn new(children: Vec<Option<VNode>>) -> Self {
        Self {
            placeholders: Vec::new(),
            children,
            parent: None,
            is_only_child: false,
        }
    }

    pub fn len(&self) -> usize {
        self.children.len()
    }

    pub fn is_empty(&self) -> bool {
        self.children.is_empty()
    }

    pub(crate) fn set_only_child(&mut self, only: bool) {
        self.is_only_child = only;
    }

    pub(crate) fn mount(&mut self, dom: &mut Document, parent: NodeId, anchor: Option<NodeId>) {
        self.placeholders = self
            .children
            .iter_mut()
            .map(|child| match child {
                Some(child) => {
                    child.mount(dom, parent, anchor);
                    None
                }
                None => {
                    let placeholder = dom.create_text("");
                    dom.insert_before(parent, placeholder, anchor);
                    Some(placeholder)
                }
            })
            .collect();
        self.parent = Some(parent);
    }

    pub(crate) fn patch(&mut self, dom: &mut Document, new: VMulti) {
        let Some(parent) = self.parent else {
            self.children = new.children;
            return;
        };
        debug_assert_eq!(self.children.len(), new.children.len(), "multi arity changed");
        let incoming = new.children.into_iter().chain(std::iter::repeat_with(|| None));
        for ((slot, placeholder), new_child) in self
            .children
            .iter_mut()
            .zip(self.placeholders.iter_mut())
            .zip(incoming)
        {
            match (slot.as_mut(), new_child) {
                (Some(child), Some(new_child)) => child.patch(dom, new_child),
                (Some(child), None) => {
                    let stand_in = dom.create_text("");
                    if let Some(first) = child.first_node() {
                        dom.insert_before(parent, stand_in, Some(first));
                    } else {
                        dom.append_child(parent, stand_in);
                    }
                    *placeholder = Some(stand_in);
                    child.before_remove(dom);
                    child.remove(dom);
                    *slot = None;
                }
                (None, Some(mut new_child)) => {
                    new_child.mount(dom, parent, *placeholder);
                    if let Some(stand_in) = placeholder.take() {
                        dom.discard(stand_in);
                    }
                    *slot = Some(new_child);
                }
                (None, None) => {}
            }
        }
    }

    pub(crate) fn move_before(&mut self, dom: &mut Document, target: Option<NodeId>) {
        let Some(parent) = self.parent else { return };
        for (child, placeholder) in self.children.iter_mut().zip(&self.placeholders) {
            match (child, placeholder) {
                (Some(child), _) => child.move_before(dom, target),
                (None, Some(stand_in)) => dom.insert_before(parent, *stand_in, target),
                (None, None) => {}
            }
        }
    }

    pub(crate) fn before_remove(&mut self, dom: &mut Document) {
        for child in self.children.iter_mut().flatten() {
            child.before_remove(dom);
        }
    }

    pub(crate) fn remove(&mut self, dom: &mut Document) {
        let Some(parent) = self.parent.take() else { return };
        if self.is_only_child {
            dom.discard_children(parent);
            return;
        }
        for (child, placeholder) in self.children.iter_mut().zip(self.placeholders.drain(..)) {
            match (child, placeholder) {
                (Some(child), _) => child.remove(dom),
                (None, Some(stand_in)) => dom.discard(stand_in),
                (None, None) => {}
            }
        }
    }

    pub(crate) fn is_only_child(&self) -> bool {
        self.is_only_child
    }

    pub(crate) fn first_node(&self) -> Option<NodeId> {
        match self.children.first()? {
            Some(child) => child.first_node(),
            None => self.placeholders.first().copied().flatten(),
        }
    }

    pub(crate) fn parent(&self) -> Option<NodeId> {
        self.parent
    }

    pub(crate) fn to_html(&self, dom: &Document) -> String {
        self.children
            .iter()
            .flatten()
            .map(|child| child.to_html(dom))
            .collect()
    }
}
