#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TemplateAttr {
    pub name: String,
    /// Boolean attributes (`<input disabled>`) carry an empty value.
    pub value: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Node {
    Element {
        tag: String,
        attrs: Vec<TemplateAttr>,
        children: Vec<Node>,
    },
    Text(String),
    Comment(String),
    CData(String),
    Doctype(String),
    ProcessingInstruction(String),
}

impl Node {
    /// Short name of the node kind, for diagnostics.
    pub fn kind(&self) -> &'static str {
        match self {
            Node::Element { .. } => "element",
            Node::Text(_) => "text",
            Node::Comment(_) => "comment",
            Node::CData(_) => "CDATA",
            Node::Doctype(_) => "doctype",
            Node::ProcessingInstruction(_) => "processing instruction",
        }
    }

    pub fn tag(&self) -> Option<&str> {
        match self {
            Node::Element { tag, .. } => Some(tag),
            _ => None,
        }
    }

    pub fn is_whitespace_text(&self) -> bool {
        matches!(self, Node::Text(t) if is_all_ws(t))
    }
}

pub(crate) fn is_all_ws(s: &str) -> bool {
    s.chars().all(|c| c.is_whitespace())
}
