//! Property-based tests for the sheaf formatter.
//!
//! Random trees are saved and parsed again; the parsed tree must have the
//! same structure as the original, and saving it again must give the same
//! text.

#![allow(clippy::unwrap_used, clippy::expect_used, reason = "Tests can panic")]
#![allow(
    clippy::doc_markdown,
    clippy::needless_pass_by_value,
    reason = "Proptest macros generate code with these patterns"
)]

use proptest::prelude::*;
use sheaf_fmt::save;
use sheaf_ir::{
    same_structure, AddOp, ClausePattern, CompareOp, Definition, Expr, ExprKind, MatchClause,
    UnitExpr,
};
use sheaf_parse::parse;

// -- Generation Strategies --

fn node(kind: ExprKind) -> Expr {
    Expr::synthetic(kind)
}

/// Identifiers of one or two words, avoiding the boolean literals.
fn name_strategy() -> impl Strategy<Value = String> {
    prop::string::string_regex("[a-z][a-z0-9]{0,5}( [a-z][a-z0-9]{0,3})?")
        .expect("valid regex")
        .prop_filter("not a literal word", |s| {
            !s.split(' ').any(|w| w == "true" || w == "false")
        })
}

fn unit_strategy() -> impl Strategy<Value = UnitExpr> {
    let leaf = prop_oneof![
        Just(UnitExpr::One),
        prop::sample::select(vec!["m", "s", "kg", "USD"]).prop_map(UnitExpr::single),
    ];
    leaf.prop_recursive(3, 8, 3, |inner| {
        prop_oneof![
            prop::collection::vec(inner.clone(), 2..4).prop_map(UnitExpr::Times),
            (inner.clone(), inner.clone()).prop_map(|(n, d)| UnitExpr::divide(n, d)),
            (inner, -3..4_i32)
                .prop_filter("non-zero power", |(_, p)| *p != 0)
                .prop_map(|(b, p)| UnitExpr::raise(b, p)),
        ]
    })
}

fn leaf_strategy() -> impl Strategy<Value = Expr> {
    prop_oneof![
        any::<bool>().prop_map(|b| node(ExprKind::Boolean(b))),
        (-1000_i64..1000, prop::option::of(unit_strategy())).prop_map(|(n, unit)| {
            node(ExprKind::Number {
                text: n.to_string(),
                unit,
            })
        }),
        "[a-z \"\\\\]{0,6}".prop_map(|s| node(ExprKind::Text(s))),
        name_strategy().prop_map(|s| node(ExprKind::Ident(s))),
        Just(node(ExprKind::Wildcard)),
        Just(node(ExprKind::ImplicitArg)),
        Just(node(ExprKind::Missing)),
    ]
}

fn compare_ops(len: usize, ascending: bool) -> Vec<CompareOp> {
    (0..len)
        .map(|i| match (ascending, i % 2 == 0) {
            (true, true) => CompareOp::Less,
            (true, false) => CompareOp::LessEqual,
            (false, true) => CompareOp::Greater,
            (false, false) => CompareOp::GreaterEqual,
        })
        .collect()
}

fn expr_strategy() -> impl Strategy<Value = Expr> {
    leaf_strategy().prop_recursive(4, 48, 4, |inner| {
        let operands = prop::collection::vec(inner.clone(), 2..4);
        prop_oneof![
            (operands.clone(), any::<bool>()).prop_map(|(operands, add)| {
                let op = if add { AddOp::Add } else { AddOp::Subtract };
                let ops = vec![op; operands.len() - 1];
                node(ExprKind::AddSubtract { operands, ops })
            }),
            (operands.clone(), any::<bool>()).prop_map(|(operands, ascending)| {
                let ops = compare_ops(operands.len() - 1, ascending);
                node(ExprKind::Comparison { operands, ops })
            }),
            operands.clone().prop_map(|o| node(ExprKind::Times(o))),
            operands.clone().prop_map(|o| node(ExprKind::And(o))),
            operands.prop_map(|o| node(ExprKind::Equal(o))),
            (inner.clone(), inner.clone()).prop_map(|(n, d)| node(ExprKind::Divide {
                numerator: Box::new(n),
                denominator: Box::new(d),
            })),
            (inner.clone(), inner.clone()).prop_map(|(v, p)| node(ExprKind::Matches {
                value: Box::new(v),
                pattern: Box::new(p),
            })),
            (name_strategy(), prop::collection::vec(inner.clone(), 0..3)).prop_map(
                |(name, args)| node(ExprKind::Call {
                    function: Box::new(node(ExprKind::Ident(name))),
                    args,
                })
            ),
            (inner.clone(), name_strategy()).prop_map(|(record, field)| {
                node(ExprKind::FieldAccess {
                    record: Box::new(record),
                    field,
                })
            }),
            prop::collection::vec(inner.clone(), 0..3).prop_map(|o| node(ExprKind::Tuple(o))),
            prop::collection::vec(inner.clone(), 0..3).prop_map(|o| node(ExprKind::Array(o))),
            (inner.clone(), inner.clone(), inner.clone()).prop_map(|(c, t, e)| {
                node(ExprKind::If {
                    condition: Box::new(c),
                    then_branch: Box::new(t),
                    else_branch: Box::new(e),
                })
            }),
            (inner.clone(), inner.clone(), inner.clone()).prop_map(|(s, p, o)| {
                node(ExprKind::Match {
                    scrutinee: Box::new(s),
                    clauses: vec![MatchClause {
                        patterns: vec![ClausePattern {
                            pattern: p,
                            guard: None,
                        }],
                        outcome: o,
                    }],
                })
            }),
            (inner.clone(), inner.clone(), inner).prop_map(|(p, v, b)| {
                node(ExprKind::Define {
                    definitions: vec![Definition::Equal { pattern: p, value: v }],
                    body: Box::new(b),
                })
            }),
        ]
    })
}

// -- Properties --

proptest! {
    #![proptest_config(ProptestConfig::with_cases(256))]

    #[test]
    fn saved_text_parses_to_the_same_tree(expr in expr_strategy()) {
        let saved = save(&expr);
        let parsed = parse(&saved)
            .unwrap_or_else(|err| panic!("`{saved}` does not parse: {err}"));
        prop_assert!(
            same_structure(&expr, &parsed),
            "`{}` parsed to a different tree", saved
        );
    }

    #[test]
    fn saving_is_idempotent(expr in expr_strategy()) {
        let once = save(&expr);
        let twice = save(&parse(&once).unwrap());
        prop_assert_eq!(once, twice);
    }
}
