use std::collections::HashMap;

use crate::{NodeId, Value};

#[derive(Debug, Clone)]
pub enum NodeData {
    Element(Element),
    Text(String),
    Comment(String),
}

#[derive(Debug, Clone, Default)]
pub struct Element {
    pub tag: String,
    /// Ordered like the DOM: first set, first serialized.
    pub attributes: Vec<(String, String)>,
    pub properties: HashMap<String, Value>,
    /// Delegated handler payloads keyed by event name.
    pub handlers: HashMap<String, Value>,
}

impl Element {
    fn new(tag: &str) -> Self {
        Self {
            tag: tag.to_string(),
            ..Self::default()
        }
    }
}

#[derive(Debug, Clone)]
struct Node {
    parent: Option<NodeId>,
    first_child: Option<NodeId>,
    last_child: Option<NodeId>,
    prev_sibling: Option<NodeId>,
    next_sibling: Option<NodeId>,
    data: NodeData,
}

impl Node {
    fn new(data: NodeData) -> Self {
        Self {
            parent: None,
            first_child: None,
            last_child: None,
            prev_sibling: None,
            next_sibling: None,
            data,
        }
    }
}

/// Counters of the mutations applied to a [`Document`].
///
/// `inserted` counts detached nodes put into the tree, `moved` counts
/// `insert_before` calls on nodes that were already attached.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct MutationStats {
    pub created: usize,
    pub inserted: usize,
    pub moved: usize,
    pub removed: usize,
    pub attribute_writes: usize,
    pub property_writes: usize,
    pub text_writes: usize,
}

impl MutationStats {
    /// Whether anything observable happened to the tree.
    pub fn is_clean(&self) -> bool {
        *self == MutationStats::default()
    }
}

/// Arena slot. The generation is bumped each time the slot is freed.
#[derive(Debug)]
struct Slot {
    generation: u32,
    node: Option<Node>,
}

/// Arena-backed DOM document.
///
/// Detaching a node (`remove`) keeps it alive for reinsertion; `discard`
/// releases it with its subtree and recycles the slots.
#[derive(Debug, Default)]
pub struct Document {
    slots: Vec<Slot>,
    free: Vec<u32>,
    stats: MutationStats,
}

impl Document {
    pub fn new() -> Self {
        Self::default()
    }

    fn push(&mut self, data: NodeData) -> NodeId {
        self.stats.created += 1;
        if let Some(index) = self.free.pop() {
            let slot = &mut self.slots[index as usize];
            slot.node = Some(Node::new(data));
            return NodeId::new(index, slot.generation);
        }
        let index = u32::try_from(self.slots.len()).expect("document is limited to u32::MAX nodes");
        self.slots.push(Slot {
            generation: 0,
            node: Some(Node::new(data)),
        });
        NodeId::new(index, 0)
    }

    #[inline]
    fn node(&self, id: NodeId) -> &Node {
        match self.slots.get(id.index()) {
            Some(Slot {
                generation,
                node: Some(node),
            }) if *generation == id.generation() => node,
            _ => panic!("{id} is not a live node"),
        }
    }

    #[inline]
    fn node_mut(&mut self, id: NodeId) -> &mut Node {
        match self.slots.get_mut(id.index()) {
            Some(Slot {
                generation,
                node: Some(node),
            }) if *generation == id.generation() => node,
            _ => panic!("{id} is not a live node"),
        }
    }

    /// Whether `id` still refers to a node of this document.
    pub fn contains(&self, id: NodeId) -> bool {
        matches!(
            self.slots.get(id.index()),
            Some(Slot { generation, node: Some(_) }) if *generation == id.generation()
        )
    }

    pub fn create_element(&mut self, tag: &str) -> NodeId {
        self.push(NodeData::Element(Element::new(tag)))
    }

    pub fn create_text(&mut self, data: &str) -> NodeId {
        self.push(NodeData::Text(data.to_string()))
    }

    pub fn create_comment(&mut self, data: &str) -> NodeId {
        self.push(NodeData::Comment(data.to_string()))
    }

    /// Number of live nodes, attached or not.
    pub fn len(&self) -> usize {
        self.slots.len() - self.free.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Arena size: live nodes plus slots waiting for reuse.
    pub fn capacity(&self) -> usize {
        self.slots.len()
    }

    pub fn stats(&self) -> MutationStats {
        self.stats
    }

    pub fn reset_stats(&mut self) {
        self.stats = MutationStats::default();
    }

    // ------------------------------------------------------------------
    // navigation

    pub fn data(&self, id: NodeId) -> &NodeData {
        &self.node(id).data
    }

    pub fn parent(&self, id: NodeId) -> Option<NodeId> {
        self.node(id).parent
    }

    pub fn first_child(&self, id: NodeId) -> Option<NodeId> {
        self.node(id).first_child
    }

    pub fn last_child(&self, id: NodeId) -> Option<NodeId> {
        self.node(id).last_child
    }

    pub fn next_sibling(&self, id: NodeId) -> Option<NodeId> {
        self.node(id).next_sibling
    }

    pub fn prev_sibling(&self, id: NodeId) -> Option<NodeId> {
        self.node(id).prev_sibling
    }

    pub fn children(&self, id: NodeId) -> impl Iterator<Item = NodeId> + '_ {
        std::iter::successors(self.first_child(id), move |&c| self.next_sibling(c))
    }

    pub fn is_element(&self, id: NodeId) -> bool {
        matches!(self.node(id).data, NodeData::Element(_))
    }

    pub fn element(&self, id: NodeId) -> Option<&Element> {
        match &self.node(id).data {
            NodeData::Element(e) => Some(e),
            _ => None,
        }
    }

    fn element_mut(&mut self, id: NodeId) -> Option<&mut Element> {
        match &mut self.node_mut(id).data {
            NodeData::Element(e) => Some(e),
            _ => None,
        }
    }

    pub fn tag(&self, id: NodeId) -> Option<&str> {
        self.element(id).map(|e| e.tag.as_str())
    }

    // ------------------------------------------------------------------
    // tree mutation

    fn unlink(&mut self, id: NodeId) -> bool {
        let Node {
            parent,
            prev_sibling,
            next_sibling,
            ..
        } = *self.node(id);
        let Some(parent) = parent else {
            return false;
        };
        match prev_sibling {
            Some(prev) => self.node_mut(prev).next_sibling = next_sibling,
            None => self.node_mut(parent).first_child = next_sibling,
        }
        match next_sibling {
            Some(next) => self.node_mut(next).prev_sibling = prev_sibling,
            None => self.node_mut(parent).last_child = prev_sibling,
        }
        let node = self.node_mut(id);
        node.parent = None;
        node.prev_sibling = None;
        node.next_sibling = None;
        true
    }

    fn link_before(&mut self, parent: NodeId, id: NodeId, before: Option<NodeId>) {
        let prev = match before {
            Some(next) => {
                debug_assert_eq!(
                    self.node(next).parent,
                    Some(parent),
                    "reference node {next} is not a child of {parent}"
                );
                self.node(next).prev_sibling
            }
            None => self.node(parent).last_child,
        };
        {
            let node = self.node_mut(id);
            node.parent = Some(parent);
            node.prev_sibling = prev;
            node.next_sibling = before;
        }
        match prev {
            Some(prev) => self.node_mut(prev).next_sibling = Some(id),
            None => self.node_mut(parent).first_child = Some(id),
        }
        match before {
            Some(next) => self.node_mut(next).prev_sibling = Some(id),
            None => self.node_mut(parent).last_child = Some(id),
        }
    }

    /// Inserts `id` into `parent` before `before`, or last when `before` is `None`.
    /// An attached node is moved, keeping its identity.
    pub fn insert_before(&mut self, parent: NodeId, id: NodeId, before: Option<NodeId>) {
        if before == Some(id) {
            return;
        }
        if self.unlink(id) {
            self.stats.moved += 1;
        } else {
            self.stats.inserted += 1;
        }
        self.link_before(parent, id, before);
    }

    pub fn append_child(&mut self, parent: NodeId, id: NodeId) {
        self.insert_before(parent, id, None);
    }

    /// Detaches `id` from its parent, if any.
    pub fn remove(&mut self, id: NodeId) {
        if self.unlink(id) {
            self.stats.removed += 1;
        }
    }

    /// Detaches `id` and frees it along with its whole subtree. Ids into the
    /// freed subtree stop resolving.
    pub fn discard(&mut self, id: NodeId) {
        self.remove(id);
        let mut pending = vec![id];
        while let Some(node) = pending.pop() {
            pending.extend(self.children(node));
            let slot = &mut self.slots[node.index()];
            slot.node = None;
            slot.generation = slot.generation.wrapping_add(1);
            self.free.push(node.index);
        }
    }

    /// Frees every child of `parent` (`textContent = ""`).
    pub fn discard_children(&mut self, parent: NodeId) {
        while let Some(child) = self.first_child(parent) {
            self.discard(child);
        }
    }

    /// Deep-copies `id` from `src` into this document. The copy is detached.
    pub fn import_node(&mut self, src: &Document, id: NodeId) -> NodeId {
        let copy = self.push(src.data(id).clone());
        let mut child = src.first_child(id);
        while let Some(c) = child {
            let c_copy = self.import_node(src, c);
            self.link_before(copy, c_copy, None);
            child = src.next_sibling(c);
        }
        copy
    }

    // ------------------------------------------------------------------
    // character data

    pub fn text(&self, id: NodeId) -> Option<&str> {
        match &self.node(id).data {
            NodeData::Text(t) | NodeData::Comment(t) => Some(t),
            NodeData::Element(_) => None,
        }
    }

    /// Sets the data of a text or comment node. Elements are left untouched.
    pub fn set_text(&mut self, id: NodeId, data: &str) {
        match &mut self.node_mut(id).data {
            NodeData::Text(t) | NodeData::Comment(t) => {
                t.clear();
                t.push_str(data);
            }
            NodeData::Element(_) => return,
        }
        self.stats.text_writes += 1;
    }

    pub fn text_content(&self, id: NodeId) -> String {
        match &self.node(id).data {
            NodeData::Text(t) | NodeData::Comment(t) => t.clone(),
            NodeData::Element(_) => {
                let mut out = String::new();
                for c in self.children(id) {
                    if !matches!(self.data(c), NodeData::Comment(_)) {
                        out.push_str(&self.text_content(c));
                    }
                }
                out
            }
        }
    }

    // ------------------------------------------------------------------
    // attributes

    pub fn attribute(&self, id: NodeId, name: &str) -> Option<&str> {
        self.element(id)?
            .attributes
            .iter()
            .find(|(k, _)| k == name)
            .map(|(_, v)| v.as_str())
    }

    pub fn has_attribute(&self, id: NodeId, name: &str) -> bool {
        self.attribute(id, name).is_some()
    }

    pub fn set_attribute(&mut self, id: NodeId, name: &str, value: impl Into<String>) {
        let Some(el) = self.element_mut(id) else {
            return;
        };
        let value = value.into();
        match el.attributes.iter_mut().find(|(k, _)| k == name) {
            Some((_, v)) => *v = value,
            None => el.attributes.push((name.to_string(), value)),
        }
        self.stats.attribute_writes += 1;
    }

    pub fn remove_attribute(&mut self, id: NodeId, name: &str) {
        let Some(el) = self.element_mut(id) else {
            return;
        };
        let before = el.attributes.len();
        el.attributes.retain(|(k, _)| k != name);
        if el.attributes.len() != before {
            self.stats.attribute_writes += 1;
        }
    }

    pub fn class_list(&self, id: NodeId) -> Vec<&str> {
        self.attribute(id, "class")
            .map(|c| c.split_whitespace().collect())
            .unwrap_or_default()
    }

    pub fn has_class(&self, id: NodeId, token: &str) -> bool {
        self.class_list(id).contains(&token)
    }

    pub fn add_class(&mut self, id: NodeId, token: &str) {
        if self.has_class(id, token) {
            return;
        }
        let mut tokens: Vec<&str> = self.class_list(id);
        tokens.push(token);
        let joined = tokens.join(" ");
        self.set_attribute(id, "class", joined);
    }

    /// Removes a class token; like `classList.remove`, an emptied list leaves `class=""`.
    pub fn remove_class(&mut self, id: NodeId, token: &str) {
        if !self.has_class(id, token) {
            return;
        }
        let joined = self
            .class_list(id)
            .into_iter()
            .filter(|t| *t != token)
            .collect::<Vec<_>>()
            .join(" ");
        self.set_attribute(id, "class", joined);
    }

    // ------------------------------------------------------------------
    // properties and delegated handlers

    pub fn property(&self, id: NodeId, name: &str) -> Option<&Value> {
        self.element(id)?.properties.get(name)
    }

    pub fn set_property(&mut self, id: NodeId, name: &str, value: Value) {
        if let Some(el) = self.element_mut(id) {
            el.properties.insert(name.to_string(), value);
            self.stats.property_writes += 1;
        }
    }

    pub fn handler(&self, id: NodeId, event: &str) -> Option<&Value> {
        self.element(id)?.handlers.get(event)
    }

    pub fn set_handler(&mut self, id: NodeId, event: &str, payload: Value) {
        if let Some(el) = self.element_mut(id) {
            el.handlers.insert(event.to_string(), payload);
        }
    }
}
