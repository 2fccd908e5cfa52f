//! Block context: the flat instructions a mounted block runs to capture its
//! dynamic nodes and to apply data to them.

use super::tree::{DynamicInfo, IntermediateTree};
use crate::attributes::Binding;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Traversal {
    FirstChild,
    NextSibling,
}

/// `refs[target] = traversal(refs[source])`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Collector {
    pub target: usize,
    pub source: usize,
    pub traversal: Traversal,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Location {
    pub data_index: usize,
    pub ref_index: usize,
    pub binding: Binding,
}

/// Mount point of a child node.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Slot {
    /// Position in the block's children.
    pub index: usize,
    pub parent_ref: usize,
    /// The child is inserted before this node; `None` for an only child.
    pub anchor_ref: Option<usize>,
    pub is_only_child: bool,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BlockContext {
    pub ref_count: usize,
    pub collectors: Vec<Collector>,
    pub locations: Vec<Location>,
    pub slots: Vec<Slot>,
    /// Data indices holding ref callbacks, called with `None` on removal.
    pub ref_callbacks: Vec<usize>,
}

impl BlockContext {
    pub(crate) fn build(tree: &mut IntermediateTree) -> Self {
        let mut ctx = Self::default();
        if !tree.nodes.is_empty() {
            ctx.visit(tree, 0);
        }
        ctx
    }

    /// Number of entries a block's children need.
    pub fn child_capacity(&self) -> usize {
        self.slots.iter().map(|s| s.index + 1).max().unwrap_or(0)
    }

    fn visit(&mut self, tree: &mut IntermediateTree, id: usize) {
        let node = &tree.nodes[id];
        if !node.is_active {
            return;
        }
        let initial = self.ref_count;
        let is_ref = node.force_ref || !node.info.is_empty();
        let first_child = node.first_child.filter(|&c| tree.nodes[c].is_active);
        let next_sibling = node.next_sibling.filter(|&s| tree.nodes[s].is_active);
        if is_ref || (first_child.is_some() && next_sibling.is_some()) {
            self.ref_count += 1;
        }

        if is_ref {
            tree.nodes[id].ref_index = Some(initial);
            self.emit(tree, id, initial);
        }

        // a node without a ref of its own passes `initial` on: the
        // collector rewrites that slot in place
        if let Some(child) = first_child {
            self.collectors.push(Collector {
                target: self.ref_count,
                source: initial,
                traversal: Traversal::FirstChild,
            });
            self.visit(tree, child);
        }
        if let Some(sibling) = next_sibling {
            self.collectors.push(Collector {
                target: self.ref_count,
                source: initial,
                traversal: Traversal::NextSibling,
            });
            self.visit(tree, sibling);
        }
    }

    fn emit(&mut self, tree: &IntermediateTree, id: usize, ref_index: usize) {
        for info in &tree.nodes[id].info {
            let (data_index, binding) = match info {
                DynamicInfo::Text { index } => (*index, Binding::Text),
                DynamicInfo::Child {
                    index,
                    is_only_child: true,
                } => {
                    self.slots.push(Slot {
                        index: *index,
                        parent_ref: ref_index,
                        anchor_ref: None,
                        is_only_child: true,
                    });
                    continue;
                }
                DynamicInfo::Child { index, .. } => {
                    let parent_ref = tree
                        .dom_parent(id)
                        .and_then(|p| tree.nodes[p].ref_index)
                        .expect("parent of a child marker is always referenced");
                    self.slots.push(Slot {
                        index: *index,
                        parent_ref,
                        anchor_ref: Some(ref_index),
                        is_only_child: false,
                    });
                    continue;
                }
                DynamicInfo::Handler { index, event } => (*index, Binding::Handler(event.clone())),
                DynamicInfo::Attribute { index, name, tag } => {
                    (*index, Binding::for_attribute(tag, name))
                }
                DynamicInfo::Attributes { index } => (*index, Binding::Attrs),
                DynamicInfo::Ref { index } => {
                    self.ref_callbacks.push(*index);
                    (*index, Binding::Ref)
                }
            };
            self.locations.push(Location {
                data_index,
                ref_index,
                binding,
            });
        }
    }
}
