use std::fmt;
use std::rc::Rc;

use kiln_dom::{Document, NodeId, Value};

use crate::VNode;
use crate::compiler::{BlockContext, Traversal};

/// A compiled template: the factory for [`Block`] nodes.
pub struct CompiledBlock {
    template: Document,
    root: NodeId,
    ctx: BlockContext,
}

impl CompiledBlock {
    pub(crate) fn new(template: Document, root: NodeId, ctx: BlockContext) -> Self {
        Self {
            template,
            root,
            ctx,
        }
    }

    pub fn context(&self) -> &BlockContext {
        &self.ctx
    }

    /// Static markup of the template, dynamic points left empty.
    pub fn template_html(&self) -> String {
        self.template.outer_html(self.root)
    }

    /// A new, unmounted block node. `children[i]` fills child slot `i`.
    pub fn create(self: &Rc<Self>, data: impl Into<Rc<[Value]>>, children: Vec<Option<VNode>>) -> VNode {
        let mut children = children;
        let capacity = self.ctx.child_capacity();
        if children.len() < capacity {
            children.resize_with(capacity, || None);
        }
        VNode::Block(Block {
            ty: Rc::clone(self),
            data: data.into(),
            children,
            refs: Vec::new(),
            el: None,
        })
    }
}

impl fmt::Debug for CompiledBlock {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CompiledBlock")
            .field("template", &self.template_html())
            .field("ctx", &self.ctx)
            .finish()
    }
}

/// A mounted (or mountable) instance of a compiled template.
pub struct Block {
    ty: Rc<CompiledBlock>,
    data: Rc<[Value]>,
    children: Vec<Option<VNode>>,
    refs: Vec<NodeId>,
    el: Option<NodeId>,
}

fn value_at(data: &[Value], index: usize) -> Value {
    data.get(index).cloned().unwrap_or_default()
}

impl Block {
    pub fn compiled(&self) -> &Rc<CompiledBlock> {
        &self.ty
    }

    pub fn data(&self) -> &[Value] {
        &self.data
    }

    pub fn children(&self) -> &[Option<VNode>] {
        &self.children
    }

    pub(crate) fn mount(&mut self, dom: &mut Document, parent: NodeId, anchor: Option<NodeId>) {
        let ty = Rc::clone(&self.ty);
        let ctx = &ty.ctx;
        let el = dom.import_node(&ty.template, ty.root);
        dom.insert_before(parent, el, anchor);
        self.el = Some(el);
        if ctx.ref_count == 0 {
            return;
        }

        let mut refs = vec![el; ctx.ref_count];
        for c in &ctx.collectors {
            let source = refs[c.source];
            let found = match c.traversal {
                Traversal::FirstChild => dom.first_child(source),
                Traversal::NextSibling => dom.next_sibling(source),
            };
            refs[c.target] = found.expect("collector steps follow the template shape");
        }

        for loc in &ctx.locations {
            let value = value_at(&self.data, loc.data_index);
            loc.binding.set(dom, refs[loc.ref_index], &value);
        }

        for slot in &ctx.slots {
            if let Some(child) = self.children.get_mut(slot.index).and_then(Option::as_mut) {
                child.set_only_child(slot.is_only_child);
                child.mount(dom, refs[slot.parent_ref], slot.anchor_ref.map(|r| refs[r]));
            }
        }
        self.refs = refs;
    }

    pub(crate) fn patch(&mut self, dom: &mut Document, new: Block) {
        debug_assert!(
            Rc::ptr_eq(&self.ty, &new.ty),
            "patching a block with a block of another template"
        );
        if self.el.is_none() {
            *self = new;
            return;
        }
        let ty = Rc::clone(&self.ty);
        let ctx = &ty.ctx;

        // same data allocation: nothing to compare
        if !Rc::ptr_eq(&self.data, &new.data) {
            for loc in &ctx.locations {
                let old = value_at(&self.data, loc.data_index);
                let value = value_at(&new.data, loc.data_index);
                if !old.same(&value) {
                    loc.binding.update(dom, self.refs[loc.ref_index], &value, &old);
                }
            }
            self.data = new.data;
        }

        let mut incoming = new.children;
        for slot in &ctx.slots {
            let next = incoming.get_mut(slot.index).and_then(Option::take);
            let current = &mut self.children[slot.index];
            match (current.as_mut(), next) {
                (Some(child), Some(mut next)) => {
                    next.set_only_child(slot.is_only_child);
                    child.patch(dom, next);
                }
                (Some(child), None) => {
                    child.before_remove(dom);
                    child.remove(dom);
                    *current = None;
                }
                (None, Some(mut next)) => {
                    next.set_only_child(slot.is_only_child);
                    next.mount(
                        dom,
                        self.refs[slot.parent_ref],
                        slot.anchor_ref.map(|r| self.refs[r]),
                    );
                    *current = Some(next);
                }
                (None, None) => {}
            }
        }
    }

    pub(crate) fn move_before(&mut self, dom: &mut Document, target: Option<NodeId>) {
        if let Some(el) = self.el {
            if let Some(parent) = dom.parent(el) {
                dom.insert_before(parent, el, target);
            }
        }
    }

    pub(crate) fn before_remove(&mut self, dom: &mut Document) {
        for child in self.children.iter_mut().flatten() {
            child.before_remove(dom);
        }
    }

    pub(crate) fn remove(&mut self, dom: &mut Document) {
        let Some(el) = self.el.take() else { return };
        dom.discard(el);
        for &index in &self.ty.ctx.ref_callbacks {
            if let Some(Value::Ref(f)) = self.data.get(index) {
                f(None);
            }
        }
    }

    pub(crate) fn first_node(&self) -> Option<NodeId> {
        self.el
    }

    pub(crate) fn to_html(&self, dom: &Document) -> String {
        self.el.map(|el| dom.outer_html(el)).unwrap_or_default()
    }
}
