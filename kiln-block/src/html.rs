use kiln_dom::{Document, NodeId};
use kiln_template::{Node, parse_markup};
use tracing::warn;

/// Raw markup inserted as-is. Patching with different markup replaces all of it.
pub struct VHtml {
    html: String,
    content: Vec<NodeId>,
    parent: Option<NodeId>,
}

impl VHtml {
    pub fn new(html: impl Into<String>) -> Self {
        Self {
            html: html.into(),
            content: Vec::new(),
            parent: None,
        }
    }

    pub fn markup(&self) -> &str {
        &self.html
    }

    pub(crate) fn mount(&mut self, dom: &mut Document, parent: NodeId, anchor: Option<NodeId>) {
        self.content = instantiate(dom, &self.html);
        for &node in &self.content {
            dom.insert_before(parent, node, anchor);
        }
        self.parent = Some(parent);
    }

    pub(crate) fn patch(&mut self, dom: &mut Document, new: VHtml) {
        if self.html == new.html {
            return;
        }
        let Some(parent) = self.parent else {
            self.html = new.html;
            return;
        };
        let anchor = self.content.first().copied();
        let content = instantiate(dom, &new.html);
        for &node in &content {
            dom.insert_before(parent, node, anchor);
        }
        self.remove(dom);
        self.content = content;
        self.html = new.html;
    }

    pub(crate) fn move_before(&mut self, dom: &mut Document, target: Option<NodeId>) {
        if let Some(parent) = self.parent {
            for &node in &self.content {
                dom.insert_before(parent, node, target);
            }
        }
    }

    pub(crate) fn remove(&mut self, dom: &mut Document) {
        for node in self.content.drain(..) {
            dom.discard(node);
        }
    }

    pub(crate) fn first_node(&self) -> Option<NodeId> {
        self.content.first().copied()
    }

    pub(crate) fn parent(&self) -> Option<NodeId> {
        self.parent
    }

    pub(crate) fn to_html(&self, dom: &Document) -> String {
        self.content.iter().map(|&n| dom.outer_html(n)).collect()
    }
}

/// Creates detached nodes for `html`. Never empty: markup without nodes
/// yields one empty text node, unparseable markup one literal text node.
fn instantiate(dom: &mut Document, html: &str) -> Vec<NodeId> {
    let mut nodes = match parse_markup(html) {
        Ok(parsed) => parsed.iter().filter_map(|n| build(dom, n)).collect(),
        Err(err) => {
            warn!("inserting unparseable markup as text: {}", err);
            vec![dom.create_text(html)]
        }
    };
    if nodes.is_empty() {
        nodes.push(dom.create_text(""));
    }
    nodes
}

fn build(dom: &mut Document, node: &Node) -> Option<NodeId> {
    let id = match node {
        Node::Element {
            tag,
            attrs,
            children,
            ..
        } => {
            let el = dom.create_element(tag);
            for attr in attrs {
                dom.set_attribute(el, &attr.name, attr.value.as_str());
            }
            for child in children {
                if let Some(c) = build(dom, child) {
                    dom.append_child(el, c);
                }
            }
            el
        }
        Node::Text(t) | Node::CData(t) => dom.create_text(t),
        Node::Comment(c) => dom.create_comment(c),
        Node::Doctype(_) | Node::ProcessingInstruction(_) => return None,
    };
    Some(id)
}
