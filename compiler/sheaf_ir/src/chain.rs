//! Building operator nodes from a flat `operand op operand op ...` run.
//!
//! The parser and the bracketing quick fixes both start from a run of
//! operands separated by operator symbols. Operators of one kind (or of a
//! mixable group such as `+`/`-`) become one n-ary node; anything else
//! becomes [`ExprKind::InvalidOperators`].

use crate::{AddOp, CompareDirection, CompareOp, Expr, ExprKind};

/// Every operator symbol the surface syntax knows.
pub const OPERATOR_SYMBOLS: [&str; 16] = [
    "+", "-", "*", "/", "^", ";", "&", "|", "=", "<>", "<", "<=", ">", ">=", "~", "±",
];

fn add_op(symbol: &str) -> Option<AddOp> {
    match symbol {
        "+" => Some(AddOp::Add),
        "-" => Some(AddOp::Subtract),
        _ => None,
    }
}

fn compare_op(symbol: &str) -> Option<CompareOp> {
    match symbol {
        "<" => Some(CompareOp::Less),
        "<=" => Some(CompareOp::LessEqual),
        ">" => Some(CompareOp::Greater),
        ">=" => Some(CompareOp::GreaterEqual),
        _ => None,
    }
}

impl ExprKind {
    /// The node for `operands` joined by `operators`.
    ///
    /// `operators` must be one shorter than `operands`; otherwise, or when
    /// the operators may not share a bracket level, the result is
    /// [`ExprKind::InvalidOperators`].
    pub fn from_operator_chain(operands: Vec<Expr>, operators: Vec<String>) -> ExprKind {
        if operators.is_empty() || operators.len() + 1 != operands.len() {
            return ExprKind::InvalidOperators {
                operands,
                operators,
            };
        }

        if let Some(ops) = operators.iter().map(|s| add_op(s)).collect::<Option<Vec<_>>>() {
            return ExprKind::AddSubtract { operands, ops };
        }

        if let Some(ops) = operators
            .iter()
            .map(|s| compare_op(s))
            .collect::<Option<Vec<_>>>()
        {
            let ascending = ops[0].direction() == CompareDirection::Ascending;
            if ops
                .iter()
                .all(|op| (op.direction() == CompareDirection::Ascending) == ascending)
            {
                return ExprKind::Comparison { operands, ops };
            }
            return ExprKind::InvalidOperators {
                operands,
                operators,
            };
        }

        let first = operators[0].as_str();
        if operators.iter().any(|op| op != first) {
            return ExprKind::InvalidOperators {
                operands,
                operators,
            };
        }

        match first {
            "*" => return ExprKind::Times(operands),
            ";" => return ExprKind::Concat(operands),
            "&" => return ExprKind::And(operands),
            "|" => return ExprKind::Or(operands),
            "=" => return ExprKind::Equal(operands),
            _ => {}
        }

        // The rest are binary.
        if operands.len() != 2 {
            return ExprKind::InvalidOperators {
                operands,
                operators,
            };
        }
        let mut iter = operands.into_iter();
        let (Some(left), Some(right)) = (iter.next(), iter.next()) else {
            return ExprKind::Missing;
        };
        let (left, right) = (Box::new(left), Box::new(right));
        match first {
            "/" => ExprKind::Divide {
                numerator: left,
                denominator: right,
            },
            "^" => ExprKind::Raise {
                base: left,
                exponent: right,
            },
            "<>" => ExprKind::NotEqual { left, right },
            "~" => ExprKind::Matches {
                value: left,
                pattern: right,
            },
            "±" => ExprKind::PlusMinus {
                value: left,
                tolerance: right,
            },
            _ => ExprKind::InvalidOperators {
                operands: vec![*left, *right],
                operators,
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn leaf(name: &str) -> Expr {
        Expr::synthetic(ExprKind::Ident(name.into()))
    }

    fn chain(names: &[&str], ops: &[&str]) -> ExprKind {
        ExprKind::from_operator_chain(
            names.iter().map(|n| leaf(n)).collect(),
            ops.iter().map(|s| (*s).to_owned()).collect(),
        )
    }

    #[test]
    fn mixable_groups_build_one_node() {
        assert!(matches!(
            chain(&["a", "b", "c"], &["+", "-"]),
            ExprKind::AddSubtract { ref ops, .. } if ops == &[AddOp::Add, AddOp::Subtract]
        ));
        assert!(matches!(
            chain(&["a", "b", "c"], &["<", "<="]),
            ExprKind::Comparison { .. }
        ));
        assert!(matches!(chain(&["a", "b", "c"], &["*", "*"]), ExprKind::Times(_)));
    }

    #[test]
    fn mixed_operators_are_invalid() {
        assert!(matches!(
            chain(&["a", "b", "c"], &["+", "*"]),
            ExprKind::InvalidOperators { .. }
        ));
        assert!(matches!(
            chain(&["a", "b", "c"], &["<", ">"]),
            ExprKind::InvalidOperators { .. }
        ));
        assert!(matches!(
            chain(&["a", "b", "c"], &["/", "/"]),
            ExprKind::InvalidOperators { .. }
        ));
    }

    #[test]
    fn binary_operators() {
        assert!(matches!(chain(&["a", "b"], &["^"]), ExprKind::Raise { .. }));
        assert!(matches!(chain(&["a", "b"], &["±"]), ExprKind::PlusMinus { .. }));
        assert!(matches!(chain(&["a", "b"], &["~"]), ExprKind::Matches { .. }));
    }
}
