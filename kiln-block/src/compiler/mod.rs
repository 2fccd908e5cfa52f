//! Template compiler.
//!
//! A template is parsed once, copied into its own template document and
//! reduced to a [`BlockContext`]: collectors that capture the dynamic nodes
//! of a fresh copy by plain `first_child`/`next_sibling` steps, locations
//! that bind data to those nodes, and slots for child nodes.

mod context;
mod tree;

use std::cell::RefCell;
use std::collections::HashMap;
use std::rc::Rc;

use kiln_template::{MarkerError, Node, ParseError, normalize_whitespace, parse_markup};
use thiserror::Error;
use tracing::debug;

pub use context::{BlockContext, Collector, Location, Slot, Traversal};

use crate::block::CompiledBlock;
use crate::config;
use tree::IntermediateTree;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CompileError {
    #[error(transparent)]
    Parse(#[from] ParseError),
    #[error(transparent)]
    Marker(#[from] MarkerError),
    #[error("a template needs exactly one root node, found {0}")]
    RootCount(usize),
    #[error("unsupported {0} node in template")]
    UnsupportedNode(&'static str),
    #[error("`{0}` cannot be the template root")]
    MarkerAtRoot(String),
    #[error("marker element `{0}` cannot have attributes or children")]
    MarkerWithContent(String),
}

thread_local! {
    static CACHE: RefCell<HashMap<String, Rc<CompiledBlock>>> = RefCell::new(HashMap::new());
}

/// Compiles `template`, or returns the block compiled earlier from the same string.
pub fn compile(template: &str) -> Result<Rc<CompiledBlock>, CompileError> {
    if let Some(hit) = CACHE.with(|c| c.borrow().get(template).cloned()) {
        debug!("template cache hit");
        return Ok(hit);
    }
    let block = Rc::new(compile_uncached(template)?);
    CACHE.with(|c| c.borrow_mut().insert(template.to_string(), Rc::clone(&block)));
    Ok(block)
}

/// Number of templates compiled on this thread.
pub fn cache_len() -> usize {
    CACHE.with(|c| c.borrow().len())
}

fn compile_uncached(template: &str) -> Result<CompiledBlock, CompileError> {
    let mut nodes = parse_markup(template)?;
    nodes.retain(|n| !n.is_whitespace_text());
    if config::normalize_whitespace() {
        normalize_whitespace(&mut nodes);
    }
    let root: &Node = match nodes.as_slice() {
        [root] => root,
        other => return Err(CompileError::RootCount(other.len())),
    };

    let mut tree = IntermediateTree::build(root)?;
    let ctx = BlockContext::build(&mut tree);
    debug!(
        refs = ctx.ref_count,
        collectors = ctx.collectors.len(),
        locations = ctx.locations.len(),
        slots = ctx.slots.len(),
        "compiled block template"
    );
    let root = tree.root_el();
    Ok(CompiledBlock::new(tree.template, root, ctx))
}
