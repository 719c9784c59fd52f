//! Tree queries and persistent edits.
//!
//! Trees are never mutated in place: [`replace_node`] builds a new tree,
//! sharing nothing with the old one, with fresh ids on the inserted nodes.

use rustc_hash::FxHashSet;
use sheaf_stack::ensure_sufficient_stack;

use crate::children::for_each_child;
use crate::{ClausePattern, Definition, Expr, ExprKind, MatchClause, NodeId, NodeIdGen, Span};

/// Find the node with identity `id`.
pub fn find_node(root: &Expr, id: NodeId) -> Option<&Expr> {
    if root.id == id {
        return Some(root);
    }
    let mut found = None;
    for_each_child(root, |child| {
        if found.is_none() {
            found = find_node(child, id);
        }
    });
    found
}

/// Largest id in the tree, ignoring placeholder ids.
pub fn max_node_id(root: &Expr) -> Option<NodeId> {
    let mut max = (!root.id.is_placeholder()).then_some(root.id);
    for_each_child(root, |child| {
        if let Some(id) = max_node_id(child) {
            max = Some(max.map_or(id, |m| m.max(id)));
        }
    });
    max
}

/// All ids in the tree, in pre-order. Duplicates indicate a malformed tree.
pub fn collect_ids(root: &Expr) -> Vec<NodeId> {
    let mut ids = Vec::new();
    collect_ids_into(root, &mut ids);
    ids
}

fn collect_ids_into(expr: &Expr, ids: &mut Vec<NodeId>) {
    ids.push(expr.id);
    for_each_child(expr, |child| collect_ids_into(child, ids));
}

/// Whether every node of the tree has a distinct, non-placeholder id.
pub fn has_unique_ids(root: &Expr) -> bool {
    let mut seen = FxHashSet::default();
    collect_ids(root)
        .into_iter()
        .all(|id| !id.is_placeholder() && seen.insert(id))
}

/// Return a copy of `root` in which the node `target` is replaced by
/// `replacement`. The replacement's nodes get fresh ids numbered after the
/// largest id in `root`; the replaced node's span is kept on the new root of
/// the replacement so diagnostics still point at the edited text.
///
/// Returns `None` if `target` is not in the tree.
pub fn replace_node(root: &Expr, target: NodeId, replacement: Expr) -> Option<Expr> {
    find_node(root, target)?;
    let mut ids = NodeIdGen::starting_after(max_node_id(root));
    let mut replacement = Some(renumber(replacement, &mut ids));
    Some(replace_in(root.clone(), target, &mut replacement))
}

fn replace_in(expr: Expr, target: NodeId, replacement: &mut Option<Expr>) -> Expr {
    if expr.id == target {
        if let Some(mut new) = replacement.take() {
            new.span = expr.span;
            return new;
        }
        return expr;
    }
    map_children(expr, &mut |child| replace_in(child, target, replacement))
}

impl Expr {
    /// See [`replace_node`].
    pub fn replace(&self, target: NodeId, replacement: Expr) -> Option<Expr> {
        replace_node(self, target, replacement)
    }
}

/// Give every node of `expr` a fresh id from `ids`.
pub fn renumber(expr: Expr, ids: &mut NodeIdGen) -> Expr {
    let id = ids.fresh();
    let mut expr = map_children(expr, &mut |child| renumber(child, ids));
    expr.id = id;
    expr
}

/// Structural equality ignoring ids and spans.
pub fn same_structure(a: &Expr, b: &Expr) -> bool {
    strip(a.clone()) == strip(b.clone())
}

fn strip(expr: Expr) -> Expr {
    let mut expr = map_children(expr, &mut strip);
    expr.id = NodeId::PLACEHOLDER;
    expr.span = Span::DUMMY;
    expr
}

/// Rebuild `expr` with every direct child passed through `f`.
pub fn map_children(expr: Expr, f: &mut dyn FnMut(Expr) -> Expr) -> Expr {
    ensure_sufficient_stack(move || map_children_inner(expr, f))
}

fn map_children_inner(expr: Expr, f: &mut dyn FnMut(Expr) -> Expr) -> Expr {
    let Expr { id, span, kind } = expr;
    let mut boxed = |e: Box<Expr>| Box::new(f(*e));
    let kind = match kind {
        kind @ (ExprKind::Boolean(_)
        | ExprKind::Number { .. }
        | ExprKind::Text(_)
        | ExprKind::Temporal { .. }
        | ExprKind::UnitLiteral(_)
        | ExprKind::TypeLiteral(_)
        | ExprKind::Ident(_)
        | ExprKind::Wildcard
        | ExprKind::ImplicitArg
        | ExprKind::Column(_)
        | ExprKind::EntireColumn(_)
        | ExprKind::Table(_)
        | ExprKind::Constructor { .. }
        | ExprKind::InvalidIdent(_)
        | ExprKind::Missing) => kind,

        ExprKind::AddSubtract { operands, ops } => ExprKind::AddSubtract {
            operands: map_all(operands, &mut boxed),
            ops,
        },
        ExprKind::Comparison { operands, ops } => ExprKind::Comparison {
            operands: map_all(operands, &mut boxed),
            ops,
        },
        ExprKind::InvalidOperators {
            operands,
            operators,
        } => ExprKind::InvalidOperators {
            operands: map_all(operands, &mut boxed),
            operators,
        },
        ExprKind::Times(items) => ExprKind::Times(map_all(items, &mut boxed)),
        ExprKind::Concat(items) => ExprKind::Concat(map_all(items, &mut boxed)),
        ExprKind::And(items) => ExprKind::And(map_all(items, &mut boxed)),
        ExprKind::Or(items) => ExprKind::Or(map_all(items, &mut boxed)),
        ExprKind::Equal(items) => ExprKind::Equal(map_all(items, &mut boxed)),
        ExprKind::Tuple(items) => ExprKind::Tuple(map_all(items, &mut boxed)),
        ExprKind::Array(items) => ExprKind::Array(map_all(items, &mut boxed)),
        ExprKind::Invalid(items) => ExprKind::Invalid(map_all(items, &mut boxed)),

        ExprKind::Divide {
            numerator,
            denominator,
        } => ExprKind::Divide {
            numerator: boxed(numerator),
            denominator: boxed(denominator),
        },
        ExprKind::Raise { base, exponent } => ExprKind::Raise {
            base: boxed(base),
            exponent: boxed(exponent),
        },
        ExprKind::NotEqual { left, right } => ExprKind::NotEqual {
            left: boxed(left),
            right: boxed(right),
        },
        ExprKind::Matches { value, pattern } => ExprKind::Matches {
            value: boxed(value),
            pattern: boxed(pattern),
        },
        ExprKind::PlusMinus { value, tolerance } => ExprKind::PlusMinus {
            value: boxed(value),
            tolerance: boxed(tolerance),
        },
        ExprKind::Call { function, args } => ExprKind::Call {
            function: boxed(function),
            args: map_all(args, &mut boxed),
        },
        ExprKind::FieldAccess { record, field } => ExprKind::FieldAccess {
            record: boxed(record),
            field,
        },
        ExprKind::Record(fields) => ExprKind::Record(
            fields
                .into_iter()
                .map(|(name, value)| (name, *boxed(Box::new(value))))
                .collect(),
        ),
        ExprKind::Lambda { params, body } => ExprKind::Lambda {
            params: map_all(params, &mut boxed),
            body: boxed(body),
        },
        ExprKind::If {
            condition,
            then_branch,
            else_branch,
        } => ExprKind::If {
            condition: boxed(condition),
            then_branch: boxed(then_branch),
            else_branch: boxed(else_branch),
        },
        ExprKind::Match { scrutinee, clauses } => {
            let scrutinee = boxed(scrutinee);
            let clauses = clauses
                .into_iter()
                .map(|clause| MatchClause {
                    patterns: clause
                        .patterns
                        .into_iter()
                        .map(|p| ClausePattern {
                            pattern: *boxed(Box::new(p.pattern)),
                            guard: p.guard.map(|g| *boxed(Box::new(g))),
                        })
                        .collect(),
                    outcome: *boxed(Box::new(clause.outcome)),
                })
                .collect();
            ExprKind::Match { scrutinee, clauses }
        }
        ExprKind::Define { definitions, body } => {
            let definitions = definitions
                .into_iter()
                .map(|definition| match definition {
                    Definition::Equal { pattern, value } => Definition::Equal {
                        pattern: *boxed(Box::new(pattern)),
                        value: *boxed(Box::new(value)),
                    },
                    Definition::Annotation { variable, ty } => Definition::Annotation {
                        variable: *boxed(Box::new(variable)),
                        ty: *boxed(Box::new(ty)),
                    },
                })
                .collect();
            ExprKind::Define {
                definitions,
                body: boxed(body),
            }
        }
    };
    Expr { id, span, kind }
}

fn map_all(items: Vec<Expr>, boxed: &mut impl FnMut(Box<Expr>) -> Box<Expr>) -> Vec<Expr> {
    items.into_iter().map(|e| *boxed(Box::new(e))).collect()
}

#[cfg(test)]
#[expect(clippy::unwrap_used, reason = "Tests use unwrap for brevity")]
mod tests;
