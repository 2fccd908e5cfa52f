//! Keyed lists.
//!
//! A list owns its items plus a trailing empty text node, the anchor, which
//! keeps a stable end position even while the list is empty.

use std::collections::HashMap;

use kiln_dom::{Document, NodeId};
use tracing::{trace, warn};

use crate::{Key, VNode};

pub struct ListItem {
    pub key: Key,
    pub node: VNode,
}

pub struct VList {
    children: Vec<ListItem>,
    anchor: Option<NodeId>,
    parent: Option<NodeId>,
    is_only_child: bool,
}

impl VList {
    pub fn new(children: Vec<ListItem>) -> Self {
        Self {
            children,
            anchor: None,
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

    pub fn keys(&self) -> impl Iterator<Item = &Key> + '_ {
        self.children.iter().map(|item| &item.key)
    }

    pub(crate) fn set_only_child(&mut self, only: bool) {
        self.is_only_child = only;
    }

    pub(crate) fn mount(&mut self, dom: &mut Document, parent: NodeId, anchor: Option<NodeId>) {
        let end = dom.create_text("");
        dom.insert_before(parent, end, anchor);
        for item in &mut self.children {
            item.node.mount(dom, parent, Some(end));
        }
        self.anchor = Some(end);
        self.parent = Some(parent);
    }

    pub(crate) fn patch(&mut self, dom: &mut Document, new: VList) {
        let (Some(parent), Some(anchor)) = (self.parent, self.anchor) else {
            self.children = new.children;
            return;
        };
        if self.children.is_empty() && new.children.is_empty() {
            return;
        }

        if new.children.is_empty() && self.is_only_child {
            trace!("clearing {} list item(s) at once", self.children.len());
            for item in &mut self.children {
                item.node.before_remove(dom);
            }
            dom.remove(anchor);
            dom.discard_children(parent);
            dom.append_child(parent, anchor);
            self.children.clear();
            return;
        }

        let mut old: Vec<Option<ListItem>> = self.children.drain(..).map(Some).collect();
        let mut new: Vec<Option<ListItem>> = new.children.into_iter().map(Some).collect();
        let mut out: Vec<Option<ListItem>> = Vec::with_capacity(new.len());
        out.resize_with(new.len(), || None);

        // end cursors are exclusive
        let (mut old_start, mut old_end) = (0, old.len());
        let (mut new_start, mut new_end) = (0, new.len());
        let mut key_map: Option<HashMap<Key, usize>> = None;

        while old_start < old_end && new_start < new_end {
            let Some(start_old) = &old[old_start] else {
                old_start += 1;
                continue;
            };
            let Some(end_old) = &old[old_end - 1] else {
                old_end -= 1;
                continue;
            };
            let start_new = &new[new_start].as_ref().expect("new cursor points at unclaimed item").key;
            let end_new = &new[new_end - 1].as_ref().expect("new cursor points at unclaimed item").key;

            if start_old.key == *start_new {
                let placed = patch_item(dom, &mut old[old_start], &mut new[new_start]);
                out[new_start] = Some(placed);
                old_start += 1;
                new_start += 1;
            } else if end_old.key == *end_new {
                let placed = patch_item(dom, &mut old[old_end - 1], &mut new[new_end - 1]);
                out[new_end - 1] = Some(placed);
                old_end -= 1;
                new_end -= 1;
            } else if start_old.key == *end_new {
                // moved right
                let mut placed = patch_item(dom, &mut old[old_start], &mut new[new_end - 1]);
                let target = first_node_of(&out, new_end).or(Some(anchor));
                placed.node.move_before(dom, target);
                out[new_end - 1] = Some(placed);
                old_start += 1;
                new_end -= 1;
            } else if end_old.key == *start_new {
                // moved left
                let target = start_old.node.first_node();
                let mut placed = patch_item(dom, &mut old[old_end - 1], &mut new[new_start]);
                placed.node.move_before(dom, target);
                out[new_start] = Some(placed);
                old_end -= 1;
                new_start += 1;
            } else {
                let target = start_old.node.first_node();
                let map = key_map.get_or_insert_with(|| build_key_map(&old, old_start, old_end));
                let claimed = map.get(start_new).and_then(|&i| old[i].take());
                let mut incoming = new[new_start].take().expect("new cursor points at unclaimed item");
                match claimed {
                    Some(mut moved) => {
                        moved.node.move_before(dom, target);
                        moved.node.patch(dom, incoming.node);
                        out[new_start] = Some(moved);
                    }
                    None => {
                        incoming.node.mount(dom, parent, target);
                        out[new_start] = Some(incoming);
                    }
                }
                new_start += 1;
            }
        }

        if new_start < new_end {
            let target = first_node_of(&out, new_end).or(Some(anchor));
            for i in new_start..new_end {
                if let Some(mut item) = new[i].take() {
                    item.node.mount(dom, parent, target);
                    out[i] = Some(item);
                }
            }
        } else if old_start < old_end {
            for item in old[old_start..old_end].iter_mut().flatten() {
                item.node.before_remove(dom);
                item.node.remove(dom);
            }
        }

        self.children = out.into_iter().flatten().collect();
    }

    pub(crate) fn move_before(&mut self, dom: &mut Document, target: Option<NodeId>) {
        let (Some(parent), Some(anchor)) = (self.parent, self.anchor) else {
            return;
        };
        for item in &mut self.children {
            item.node.move_before(dom, target);
        }
        dom.insert_before(parent, anchor, target);
    }

    pub(crate) fn before_remove(&mut self, dom: &mut Document) {
        for item in &mut self.children {
            item.node.before_remove(dom);
        }
    }

    pub(crate) fn remove(&mut self, dom: &mut Document) {
        let (Some(parent), Some(anchor)) = (self.parent, self.anchor.take()) else {
            return;
        };
        if self.is_only_child {
            dom.discard_children(parent);
        } else {
            for item in &mut self.children {
                item.node.remove(dom);
            }
            dom.discard(anchor);
        }
    }

    pub(crate) fn is_only_child(&self) -> bool {
        self.is_only_child
    }

    /// The first item's first node, or the anchor when empty.
    pub(crate) fn first_node(&self) -> Option<NodeId> {
        match self.children.first() {
            Some(item) => item.node.first_node(),
            None => self.anchor,
        }
    }

    pub(crate) fn parent(&self) -> Option<NodeId> {
        self.parent
    }

    pub(crate) fn to_html(&self, dom: &Document) -> String {
        self.children.iter().map(|item| item.node.to_html(dom)).collect()
    }
}

/// Patches the old item at `old` with the new one at `new`, leaving both
/// slots empty, and returns the patched old item.
fn patch_item(dom: &mut Document, old: &mut Option<ListItem>, new: &mut Option<ListItem>) -> ListItem {
    let mut placed = old.take().expect("old cursor skips holes");
    let incoming = new.take().expect("new cursor points at unclaimed item");
    placed.node.patch(dom, incoming.node);
    placed
}

fn first_node_of(out: &[Option<ListItem>], index: usize) -> Option<NodeId> {
    out.get(index)
        .and_then(Option::as_ref)
        .and_then(|item| item.node.first_node())
}

fn build_key_map(old: &[Option<ListItem>], start: usize, end: usize) -> HashMap<Key, usize> {
    let mut map = HashMap::with_capacity(end - start);
    for (i, item) in old.iter().enumerate().take(end).skip(start) {
        if let Some(item) = item {
            if map.insert(item.key.clone(), i).is_some() {
                warn!("duplicate list key {}; the last occurrence wins", item.key);
            }
        }
    }
    map
}
