use kiln_dom::{Document, NodeId, Value};

/// A single text node showing a value's text form.
pub struct VText {
    value: Value,
    el: Option<NodeId>,
    parent: Option<NodeId>,
}

impl VText {
    pub fn new(value: impl Into<Value>) -> Self {
        Self {
            value: value.into(),
            el: None,
            parent: None,
        }
    }

    pub fn value(&self) -> &Value {
        &self.value
    }

    pub(crate) fn mount(&mut self, dom: &mut Document, parent: NodeId, anchor: Option<NodeId>) {
        let node = dom.create_text(&self.value.to_text());
        dom.insert_before(parent, node, anchor);
        self.el = Some(node);
        self.parent = Some(parent);
    }

    pub(crate) fn patch(&mut self, dom: &mut Document, new: VText) {
        if self.value.same(&new.value) {
            return;
        }
        if let Some(el) = self.el {
            dom.set_text(el, &new.value.to_text());
        }
        self.value = new.value;
    }

    pub(crate) fn move_before(&mut self, dom: &mut Document, target: Option<NodeId>) {
        if let (Some(parent), Some(el)) = (self.parent, self.el) {
            dom.insert_before(parent, el, target);
        }
    }

    pub(crate) fn remove(&mut self, dom: &mut Document) {
        if let Some(el) = self.el.take() {
            dom.discard(el);
        }
    }

    pub(crate) fn first_node(&self) -> Option<NodeId> {
        self.el
    }

    pub(crate) fn parent(&self) -> Option<NodeId> {
        self.parent
    }

    pub(crate) fn to_html(&self, dom: &Document) -> String {
        self.el.map(|el| dom.outer_html(el)).unwrap_or_default()
    }
}
