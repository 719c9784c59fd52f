//! Node identity within one expression tree.

use std::fmt;

/// Identity of a node, unique within the tree it belongs to.
///
/// Errors, quick fixes and check-time annotations are all keyed by node id,
/// so two structurally equal subtrees at different positions stay distinct.
#[derive(Copy, Clone, Eq, PartialEq, Ord, PartialOrd, Hash)]
#[repr(transparent)]
pub struct NodeId(u32);

impl NodeId {
    /// Id carried by nodes built outside a tree (quick-fix replacements).
    /// [`crate::replace_node`] renumbers them when they are spliced in.
    pub const PLACEHOLDER: NodeId = NodeId(u32::MAX);

    #[inline]
    pub const fn from_raw(raw: u32) -> Self {
        NodeId(raw)
    }

    #[inline]
    pub const fn raw(self) -> u32 {
        self.0
    }

    #[inline]
    pub const fn is_placeholder(self) -> bool {
        self.0 == u32::MAX
    }
}

impl fmt::Debug for NodeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_placeholder() {
            write!(f, "#?")
        } else {
            write!(f, "#{}", self.0)
        }
    }
}

/// Sequential id source used by parsers and tree builders.
#[derive(Clone, Debug, Default)]
pub struct NodeIdGen {
    next: u32,
}

impl NodeIdGen {
    pub fn new() -> Self {
        Self::default()
    }

    /// Continue numbering after `last` (used when extending an existing tree).
    pub fn starting_after(last: Option<NodeId>) -> Self {
        NodeIdGen {
            next: last.map_or(0, |id| id.raw().saturating_add(1)),
        }
    }

    pub fn fresh(&mut self) -> NodeId {
        let id = NodeId(self.next);
        self.next = self.next.saturating_add(1);
        id
    }
}
