//! In-memory host document for the block engine.
//!
//! Nodes live in a single arena owned by [`Document`] and are addressed by
//! [`NodeId`]. A node keeps its id while it is moved around the tree. Slots of
//! discarded nodes are reused under a new generation, so a stale id never
//! resolves to another node.

pub mod document;
mod serialize;
pub mod value;

pub use document::{Document, Element, MutationStats, NodeData};
pub use value::{Event, HandlerFn, RefFn, Value};

use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodeId {
    index: u32,
    generation: u32,
}

impl NodeId {
    #[inline]
    pub(crate) fn new(index: u32, generation: u32) -> Self {
        Self { index, generation }
    }

    #[inline]
    pub(crate) fn index(self) -> usize {
        self.index as usize
    }

    #[inline]
    pub(crate) fn generation(self) -> u32 {
        self.generation
    }
}

impl fmt::Display for NodeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.index)?;
        if self.generation > 0 {
            write!(f, "v{}", self.generation)?;
        }
        Ok(())
    }
}
