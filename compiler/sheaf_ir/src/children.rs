//! Direct children of an expression node.

use crate::{Definition, Expr, ExprKind};

/// Call `f` on every direct child of `expr`, in source order.
pub fn for_each_child<'ast>(expr: &'ast Expr, mut f: impl FnMut(&'ast Expr)) {
    match &expr.kind {
        ExprKind::Boolean(_)
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
        | ExprKind::Missing => {}

        ExprKind::AddSubtract { operands, .. }
        | ExprKind::Comparison { operands, .. }
        | ExprKind::InvalidOperators { operands, .. }
        | ExprKind::Times(operands)
        | ExprKind::Concat(operands)
        | ExprKind::And(operands)
        | ExprKind::Or(operands)
        | ExprKind::Equal(operands)
        | ExprKind::Tuple(operands)
        | ExprKind::Array(operands)
        | ExprKind::Invalid(operands) => operands.iter().for_each(f),

        ExprKind::Divide {
            numerator: a,
            denominator: b,
        }
        | ExprKind::Raise {
            base: a,
            exponent: b,
        }
        | ExprKind::NotEqual { left: a, right: b }
        | ExprKind::Matches {
            value: a,
            pattern: b,
        }
        | ExprKind::PlusMinus {
            value: a,
            tolerance: b,
        } => {
            f(a);
            f(b);
        }

        ExprKind::Call { function, args } => {
            f(function);
            args.iter().for_each(f);
        }
        ExprKind::FieldAccess { record, .. } => f(record),
        ExprKind::Record(fields) => fields.iter().for_each(|(_, value)| f(value)),
        ExprKind::Lambda { params, body } => {
            params.iter().for_each(&mut f);
            f(body);
        }
        ExprKind::If {
            condition,
            then_branch,
            else_branch,
        } => {
            f(condition);
            f(then_branch);
            f(else_branch);
        }
        ExprKind::Match { scrutinee, clauses } => {
            f(scrutinee);
            for clause in clauses {
                for pattern in &clause.patterns {
                    f(&pattern.pattern);
                    if let Some(guard) = &pattern.guard {
                        f(guard);
                    }
                }
                f(&clause.outcome);
            }
        }
        ExprKind::Define { definitions, body } => {
            for definition in definitions {
                match definition {
                    Definition::Equal { pattern, value } => {
                        f(pattern);
                        f(value);
                    }
                    Definition::Annotation { variable, ty } => {
                        f(variable);
                        f(ty);
                    }
                }
            }
            f(body);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{ColumnRef, NodeIdGen, Span};

    fn count_columns(expr: &Expr) -> usize {
        let mut count = usize::from(matches!(expr.kind, ExprKind::Column(_)));
        for_each_child(expr, |child| count += count_columns(child));
        count
    }

    #[test]
    fn children_come_in_source_order() {
        let mut ids = NodeIdGen::new();
        let mut node = |kind| Expr::new(ids.fresh(), Span::DUMMY, kind);
        let a = node(ExprKind::Column(ColumnRef::new(None, "a")));
        let b = node(ExprKind::Column(ColumnRef::new(None, "b")));
        let product = node(ExprKind::Times(vec![a, b]));
        let c = node(ExprKind::Column(ColumnRef::new(Some("T"), "c")));
        let tuple = node(ExprKind::Tuple(vec![product, c]));

        let mut order = Vec::new();
        for_each_child(&tuple, |child| order.push(child.id));
        assert_eq!(order.len(), 2);
        assert!(order[0] < order[1]);
        assert_eq!(count_columns(&tuple), 3);
    }
}
