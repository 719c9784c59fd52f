//! Expression tree for the sheaf formula language.
//!
//! Formulas are owned trees: every [`Expr`] owns its children by value and
//! carries a [`NodeId`] that is unique within its tree. Checking and
//! evaluation never mutate a tree; anything they learn about a node is
//! keyed by its id and kept outside the tree.
//!
//! The tree is produced by an external editor or by `sheaf_parse`, and
//! rendered back to text by `sheaf_fmt`.

mod chain;
mod children;
mod edit;
mod expr;
mod node_id;
mod operators;
mod span;
mod type_expr;
mod units;

pub use chain::OPERATOR_SYMBOLS;
pub use children::for_each_child;
pub use edit::{
    collect_ids, find_node, has_unique_ids, map_children, max_node_id, renumber, replace_node,
    same_structure,
};
pub use expr::{ClausePattern, ColumnRef, Definition, Expr, ExprKind, MatchClause};
pub use node_id::{NodeId, NodeIdGen};
pub use operators::{AddOp, CompareDirection, CompareOp};
pub use span::Span;
pub use type_expr::{TemporalKind, TypeArgExpr, TypeExpr};
pub use units::UnitExpr;

/// Prefix marking a variable name as discardable: such names may be bound
/// more than once in one pattern.
pub const WILDCARD_PREFIX: char = '_';

/// Whether `name` is a discardable (`_`-prefixed) variable name.
#[inline]
pub fn is_wildcard_name(name: &str) -> bool {
    name.starts_with(WILDCARD_PREFIX)
}
