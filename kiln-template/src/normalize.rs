use crate::template_ast::Node;

/// Tags whose text content is kept verbatim.
const PRESERVE_WHITESPACE: &[&str] = &["pre"];

/// Drops whitespace-only text nodes, recursively, except below a
/// whitespace-preserving element.
pub fn normalize_whitespace(nodes: &mut Vec<Node>) {
    nodes.retain(|n| !n.is_whitespace_text());
    for node in nodes.iter_mut() {
        if let Node::Element { tag, children, .. } = node {
            if PRESERVE_WHITESPACE.iter().any(|p| p.eq_ignore_ascii_case(tag)) {
                continue;
            }
            normalize_whitespace(children);
        }
    }
}
