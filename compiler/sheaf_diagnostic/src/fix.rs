use std::fmt;
use std::sync::Arc;

use sheaf_ir::{Expr, NodeId};

/// A suggested edit offered alongside a diagnostic.
///
/// The replacement is built lazily: checking only records the thunk, and the
/// tree is not touched until [`QuickFix::apply`] is called.
#[derive(Clone)]
pub struct QuickFix {
    title: String,
    target: NodeId,
    replacement: Arc<dyn Fn() -> Expr + Send + Sync>,
}

impl QuickFix {
    pub fn new(
        title: impl Into<String>,
        target: NodeId,
        replacement: impl Fn() -> Expr + Send + Sync + 'static,
    ) -> Self {
        QuickFix {
            title: title.into(),
            target,
            replacement: Arc::new(replacement),
        }
    }

    pub fn title(&self) -> &str {
        &self.title
    }

    /// Node the fix replaces.
    pub fn target(&self) -> NodeId {
        self.target
    }

    /// Build the replacement subtree.
    pub fn replacement(&self) -> Expr {
        (self.replacement)()
    }

    /// Apply the fix to `root`, returning the edited tree.
    ///
    /// Returns `None` if the target node is no longer in `root`.
    pub fn apply(&self, root: &Expr) -> Option<Expr> {
        root.replace(self.target, self.replacement())
    }
}

// Fixes compare by what they say, not by the closure they carry.
impl PartialEq for QuickFix {
    fn eq(&self, other: &Self) -> bool {
        self.title == other.title && self.target == other.target
    }
}

impl Eq for QuickFix {}

impl fmt::Debug for QuickFix {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("QuickFix")
            .field("title", &self.title)
            .field("target", &self.target)
            .finish_non_exhaustive()
    }
}
