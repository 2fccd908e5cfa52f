//! Intermediate tree: a binary encoding of the template (first child / next
//! sibling) annotated with the dynamic points found while copying it into
//! the template document.

use kiln_dom::{Document, NodeId};
use kiln_template::{AttrMarker, Node, TagMarker, attr_marker, tag_marker};

use super::CompileError;
use crate::events;

#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) enum DynamicInfo {
    Text { index: usize },
    Child { index: usize, is_only_child: bool },
    Handler { index: usize, event: String },
    Attribute { index: usize, name: String, tag: String },
    Attributes { index: usize },
    Ref { index: usize },
}

#[derive(Debug)]
pub(crate) struct TreeNode {
    /// Copy of the template node in the template document.
    pub el: NodeId,
    /// For a first child its DOM parent; for any other node its left sibling.
    pub parent: Option<usize>,
    pub first_child: Option<usize>,
    pub next_sibling: Option<usize>,
    pub info: Vec<DynamicInfo>,
    pub force_ref: bool,
    pub is_active: bool,
    pub ref_index: Option<usize>,
}

#[derive(Debug, Default)]
pub(crate) struct IntermediateTree {
    pub nodes: Vec<TreeNode>,
    pub template: Document,
}

impl IntermediateTree {
    /// Builds the tree for `root`; the root is always node 0.
    pub fn build(root: &Node) -> Result<Self, CompileError> {
        if let Node::Element { tag, .. } = root {
            if let Some(TagMarker::Child(_)) = tag_marker(tag)? {
                return Err(CompileError::MarkerAtRoot(tag.clone()));
            }
        }
        let mut tree = Self::default();
        tree.build_node(root, None, None)?;
        Ok(tree)
    }

    pub fn root_el(&self) -> NodeId {
        self.nodes[0].el
    }

    fn push(&mut self, el: NodeId, parent: Option<usize>, info: Vec<DynamicInfo>, is_active: bool) -> usize {
        self.nodes.push(TreeNode {
            el,
            parent,
            first_child: None,
            next_sibling: None,
            info,
            force_ref: false,
            is_active,
            ref_index: None,
        });
        self.nodes.len() - 1
    }

    fn build_node(
        &mut self,
        node: &Node,
        parent: Option<usize>,
        dom_parent: Option<usize>,
    ) -> Result<usize, CompileError> {
        let (tag, attrs, children) = match node {
            Node::Element {
                tag,
                attrs,
                children,
                ..
            } => (tag, attrs, children),
            Node::Text(text) => {
                let el = self.template.create_text(text);
                return Ok(self.push(el, parent, Vec::new(), false));
            }
            Node::Comment(text) => {
                let el = self.template.create_comment(text);
                return Ok(self.push(el, parent, Vec::new(), false));
            }
            other => return Err(CompileError::UnsupportedNode(other.kind())),
        };

        if let Some(marker) = tag_marker(tag)? {
            if !attrs.is_empty() || !children.is_empty() {
                return Err(CompileError::MarkerWithContent(tag.clone()));
            }
            let info = match marker {
                TagMarker::Text(index) => DynamicInfo::Text { index },
                TagMarker::Child(index) => {
                    let dom_parent = dom_parent.ok_or_else(|| CompileError::MarkerAtRoot(tag.clone()))?;
                    self.nodes[dom_parent].force_ref = true;
                    DynamicInfo::Child {
                        index,
                        is_only_child: false,
                    }
                }
            };
            let el = self.template.create_text("");
            let id = self.push(el, parent, vec![info], true);
            self.activate_ancestors(id);
            return Ok(id);
        }

        let el = self.template.create_element(tag);
        let mut info = Vec::new();
        for attr in attrs {
            match attr_marker(&attr.name, &attr.value)? {
                AttrMarker::Static => self.template.set_attribute(el, &attr.name, attr.value.as_str()),
                AttrMarker::Handler { index, event } => {
                    events::setup_delegated_event(&event);
                    info.push(DynamicInfo::Handler { index, event });
                }
                AttrMarker::Attribute { index, name } => info.push(DynamicInfo::Attribute {
                    index,
                    name,
                    tag: tag.clone(),
                }),
                AttrMarker::Attributes(index) => info.push(DynamicInfo::Attributes { index }),
                AttrMarker::Ref(index) => info.push(DynamicInfo::Ref { index }),
            }
        }
        let is_active = !info.is_empty();
        let id = self.push(el, parent, info, is_active);

        if let [Node::Element { tag: child_tag, attrs: child_attrs, children: grandchildren, .. }] =
            children.as_slice()
        {
            if let Some(TagMarker::Child(index)) = tag_marker(child_tag)? {
                if !child_attrs.is_empty() || !grandchildren.is_empty() {
                    return Err(CompileError::MarkerWithContent(child_tag.clone()));
                }
                self.nodes[id].info.push(DynamicInfo::Child {
                    index,
                    is_only_child: true,
                });
                self.nodes[id].is_active = true;
                self.activate_ancestors(id);
                return Ok(id);
            }
        }

        let mut prev: Option<usize> = None;
        for child in children {
            let link = prev.unwrap_or(id);
            let child_id = self.build_node(child, Some(link), Some(id))?;
            let child_el = self.nodes[child_id].el;
            self.template.append_child(el, child_el);
            match prev {
                None => self.nodes[id].first_child = Some(child_id),
                Some(p) => self.nodes[p].next_sibling = Some(child_id),
            }
            prev = Some(child_id);
        }

        if is_active {
            self.activate_ancestors(id);
        }
        Ok(id)
    }

    /// Marks the parent chain active up to the first node that already is.
    fn activate_ancestors(&mut self, id: usize) {
        let mut current = self.nodes[id].parent;
        while let Some(p) = current {
            if self.nodes[p].is_active {
                break;
            }
            self.nodes[p].is_active = true;
            current = self.nodes[p].parent;
        }
    }

    /// The DOM parent of `id`: climbs past left siblings.
    pub fn dom_parent(&self, mut id: usize) -> Option<usize> {
        let mut parent = self.nodes[id].parent;
        while let Some(p) = parent {
            if self.nodes[p].next_sibling != Some(id) {
                break;
            }
            id = p;
            parent = self.nodes[p].parent;
        }
        parent
    }
}
