use pretty_assertions::assert_eq;
use sheaf_diagnostic::ErrorCode;
use sheaf_ir::{
    has_unique_ids, map_children, AddOp, ClausePattern, ColumnRef, CompareOp, Definition, Expr,
    ExprKind, MatchClause, NodeId, Span, TemporalKind, TypeArgExpr, TypeExpr, UnitExpr,
};

use super::*;

// ========================================
// Helpers
// ========================================

/// The tree without ids and spans, for comparing against built trees.
fn shape(expr: Expr) -> Expr {
    let mut expr = map_children(expr, &mut shape);
    expr.id = NodeId::PLACEHOLDER;
    expr.span = Span::DUMMY;
    expr
}

fn parsed(text: &str) -> Expr {
    shape(parse(text).unwrap())
}

fn e(kind: ExprKind) -> Expr {
    Expr::synthetic(kind)
}

fn ident(name: &str) -> Expr {
    e(ExprKind::Ident(name.into()))
}

fn num(text: &str) -> Expr {
    e(ExprKind::Number {
        text: text.into(),
        unit: None,
    })
}

fn num_in(text: &str, unit: UnitExpr) -> Expr {
    e(ExprKind::Number {
        text: text.into(),
        unit: Some(unit),
    })
}

fn error_of(text: &str) -> ParseError {
    parse(text).unwrap_err()
}

// ========================================
// Literals and references
// ========================================

#[test]
fn literals() {
    assert_eq!(parsed("42"), num("42"));
    assert_eq!(parsed("-2.5"), num("-2.5"));
    assert_eq!(parsed("true"), e(ExprKind::Boolean(true)));
    assert_eq!(parsed(r#""a \"b\"""#), e(ExprKind::Text("a \"b\"".into())));
    assert_eq!(
        parsed("datetimezoned{2021-03-04 12:30 +01:00}"),
        e(ExprKind::Temporal {
            kind: TemporalKind::DateTimeZoned,
            content: "2021-03-04 12:30 +01:00".into(),
        })
    );
}

#[test]
fn units_on_numbers_and_alone() {
    assert_eq!(
        parsed("9.8{m/s^2}"),
        num_in(
            "9.8",
            UnitExpr::divide(UnitExpr::single("m"), UnitExpr::raise(UnitExpr::single("s"), 2))
        )
    );
    assert_eq!(
        parsed("{kg*m/s^-2}"),
        e(ExprKind::UnitLiteral(UnitExpr::divide(
            UnitExpr::Times(vec![UnitExpr::single("kg"), UnitExpr::single("m")]),
            UnitExpr::raise(UnitExpr::single("s"), -2),
        )))
    );
    assert_eq!(
        parsed("{1/(m*s)}"),
        e(ExprKind::UnitLiteral(UnitExpr::divide(
            UnitExpr::One,
            UnitExpr::Times(vec![UnitExpr::single("m"), UnitExpr::single("s")]),
        )))
    );
}

#[test]
fn type_literals() {
    assert_eq!(
        parsed("type{[Optional(Number{m})]}"),
        e(ExprKind::TypeLiteral(TypeExpr::List(Box::new(TypeExpr::Tagged {
            name: "Optional".into(),
            args: vec![TypeArgExpr::Type(TypeExpr::Number(Some(UnitExpr::single("m"))))],
        }))))
    );
    assert_eq!(
        parsed("type{(name: Text, born: Date)}"),
        e(ExprKind::TypeLiteral(TypeExpr::Record(vec![
            ("name".into(), TypeExpr::Text),
            ("born".into(), TypeExpr::Temporal(TemporalKind::Date)),
        ])))
    );
    assert_eq!(
        parsed("type{(Boolean,)}"),
        e(ExprKind::TypeLiteral(TypeExpr::Tuple(vec![TypeExpr::Boolean])))
    );
}

#[test]
fn identifiers_keep_inner_spaces() {
    assert_eq!(
        parsed("to text(unit   price)"),
        e(ExprKind::Call {
            function: Box::new(ident("to text")),
            args: vec![ident("unit price")],
        })
    );
}

#[test]
fn references() {
    assert_eq!(
        parsed(r"@column Orders\unit price"),
        e(ExprKind::Column(ColumnRef::new(Some("Orders"), "unit price")))
    );
    assert_eq!(
        parsed("@entire amount"),
        e(ExprKind::EntireColumn(ColumnRef::new(None, "amount")))
    );
    assert_eq!(parsed("@table Orders"), e(ExprKind::Table("Orders".into())));
    assert_eq!(
        parsed(r"@tag Shape\Circle"),
        e(ExprKind::Constructor {
            type_name: "Shape".into(),
            tag: "Circle".into(),
        })
    );
    assert_eq!(parsed("_"), e(ExprKind::Wildcard));
    assert_eq!(parsed("_rest"), ident("_rest"));
}

// ========================================
// Operators
// ========================================

#[test]
fn one_operator_kind_per_level() {
    assert_eq!(
        parsed("1{m} + 2{m} - x"),
        e(ExprKind::AddSubtract {
            operands: vec![
                num_in("1", UnitExpr::single("m")),
                num_in("2", UnitExpr::single("m")),
                ident("x"),
            ],
            ops: vec![AddOp::Add, AddOp::Subtract],
        })
    );
    assert_eq!(
        parsed("a < b <= c"),
        e(ExprKind::Comparison {
            operands: vec![ident("a"), ident("b"), ident("c")],
            ops: vec![CompareOp::Less, CompareOp::LessEqual],
        })
    );
    assert_eq!(
        parsed("1 + (2 * 3)"),
        e(ExprKind::AddSubtract {
            operands: vec![
                num("1"),
                e(ExprKind::Times(vec![num("2"), num("3")])),
            ],
            ops: vec![AddOp::Add],
        })
    );
}

#[test]
fn mixed_operators_become_a_placeholder() {
    assert_eq!(
        parsed("1 + 2 * 3"),
        e(ExprKind::InvalidOperators {
            operands: vec![num("1"), num("2"), num("3")],
            operators: vec!["+".into(), "*".into()],
        })
    );
}

#[test]
fn minus_after_an_operand_is_subtraction() {
    assert_eq!(
        parsed("a - -1"),
        e(ExprKind::AddSubtract {
            operands: vec![ident("a"), num("-1")],
            ops: vec![AddOp::Subtract],
        })
    );
}

#[test]
fn tolerance_pattern() {
    assert_eq!(
        parsed("x ~ (5 ± 1)"),
        e(ExprKind::Matches {
            value: Box::new(ident("x")),
            pattern: Box::new(e(ExprKind::PlusMinus {
                value: Box::new(num("5")),
                tolerance: Box::new(num("1")),
            })),
        })
    );
}

// ========================================
// Structure
// ========================================

#[test]
fn tuples_records_and_lists() {
    assert_eq!(parsed("(a)"), ident("a"));
    assert_eq!(parsed("(a,)"), e(ExprKind::Tuple(vec![ident("a")])));
    assert_eq!(parsed("()"), e(ExprKind::Tuple(Vec::new())));
    assert_eq!(
        parsed("(first name: \"Ada\", age: 36)"),
        e(ExprKind::Record(vec![
            ("first name".into(), e(ExprKind::Text("Ada".into()))),
            ("age".into(), num("36")),
        ]))
    );
    assert_eq!(
        parsed("[1, [2]]"),
        e(ExprKind::Array(vec![num("1"), e(ExprKind::Array(vec![num("2")]))]))
    );
    assert_eq!(
        parsed("today()"),
        e(ExprKind::Call {
            function: Box::new(ident("today")),
            args: Vec::new(),
        })
    );
}

#[test]
fn postfix_chains() {
    assert_eq!(
        parsed("f(x)#size#width"),
        e(ExprKind::FieldAccess {
            record: Box::new(e(ExprKind::FieldAccess {
                record: Box::new(e(ExprKind::Call {
                    function: Box::new(ident("f")),
                    args: vec![ident("x")],
                })),
                field: "size".into(),
            })),
            field: "width".into(),
        })
    );
}

#[test]
fn implicit_arguments() {
    assert_eq!(
        parsed("map(xs, ? * 2)"),
        e(ExprKind::Call {
            function: Box::new(ident("map")),
            args: vec![
                ident("xs"),
                e(ExprKind::Times(vec![e(ExprKind::ImplicitArg), num("2")])),
            ],
        })
    );
}

// ========================================
// Keyword forms
// ========================================

#[test]
fn if_expression() {
    assert_eq!(
        parsed("@if a @then 1 @else 2 @endif"),
        e(ExprKind::If {
            condition: Box::new(ident("a")),
            then_branch: Box::new(num("1")),
            else_branch: Box::new(num("2")),
        })
    );
}

#[test]
fn match_with_alternatives_and_guards() {
    let text = "@match n @case 0 @orcase x @given x < 0 @then 1 @case _ @then n @endmatch";
    assert_eq!(
        parsed(text),
        e(ExprKind::Match {
            scrutinee: Box::new(ident("n")),
            clauses: vec![
                MatchClause {
                    patterns: vec![
                        ClausePattern {
                            pattern: num("0"),
                            guard: None,
                        },
                        ClausePattern {
                            pattern: ident("x"),
                            guard: Some(e(ExprKind::Comparison {
                                operands: vec![ident("x"), num("0")],
                                ops: vec![CompareOp::Less],
                            })),
                        },
                    ],
                    outcome: num("1"),
                },
                MatchClause {
                    patterns: vec![ClausePattern {
                        pattern: e(ExprKind::Wildcard),
                        guard: None,
                    }],
                    outcome: ident("n"),
                },
            ],
        })
    );
}

#[test]
fn define_with_annotation() {
    let text = "@define x :: type{Number{m}}, x = 2{m}, ok = x = y @then ok @enddefine";
    assert_eq!(
        parsed(text),
        e(ExprKind::Define {
            definitions: vec![
                Definition::Annotation {
                    variable: ident("x"),
                    ty: e(ExprKind::TypeLiteral(TypeExpr::Number(Some(UnitExpr::single(
                        "m"
                    ))))),
                },
                Definition::Equal {
                    pattern: ident("x"),
                    value: num_in("2", UnitExpr::single("m")),
                },
                Definition::Equal {
                    pattern: ident("ok"),
                    value: e(ExprKind::Equal(vec![ident("x"), ident("y")])),
                },
            ],
            body: Box::new(ident("ok")),
        })
    );
}

#[test]
fn lambda() {
    assert_eq!(
        parsed("@function(a, (b, _)) @then a + b @endfunction"),
        e(ExprKind::Lambda {
            params: vec![
                ident("a"),
                e(ExprKind::Tuple(vec![ident("b"), e(ExprKind::Wildcard)])),
            ],
            body: Box::new(e(ExprKind::AddSubtract {
                operands: vec![ident("a"), ident("b")],
                ops: vec![AddOp::Add],
            })),
        })
    );
}

#[test]
fn placeholders() {
    assert_eq!(parsed("@missing"), e(ExprKind::Missing));
    assert_eq!(parsed("@invalid \"3x\""), e(ExprKind::InvalidIdent("3x".into())));
    assert_eq!(
        parsed("@invalid(a, @missing)"),
        e(ExprKind::Invalid(vec![ident("a"), e(ExprKind::Missing)]))
    );
}

// ========================================
// Ids, spans and errors
// ========================================

#[test]
fn ids_are_unique_and_spans_cover_source() {
    let text = "@if x > 1 @then f(x, [1, 2]) @else (a: 1)#a @endif";
    let expr = parse(text).unwrap();
    assert!(has_unique_ids(&expr));
    assert_eq!(expr.span.snippet(text), Some(text));
    let ExprKind::If { then_branch, .. } = &expr.kind else {
        panic!("expected an if");
    };
    assert_eq!(then_branch.span.snippet(text), Some("f(x, [1, 2])"));
}

#[test]
fn standalone_type() {
    assert_eq!(
        parse_type("Number{USD}").unwrap(),
        TypeExpr::Number(Some(UnitExpr::single("USD")))
    );
    assert_eq!(
        parse_type("Shape").unwrap(),
        TypeExpr::Tagged {
            name: "Shape".into(),
            args: Vec::new(),
        }
    );
    assert_eq!(parse_type("Number)").unwrap_err().code, ErrorCode::E1001);
}

#[test]
fn syntax_errors() {
    let err = error_of("@if a @then b @endif");
    assert_eq!(err.code, ErrorCode::E1001);
    assert_eq!(err.message, "expected `@else`, found `@endif`");

    let err = error_of("f(1, 2");
    assert_eq!(err.code, ErrorCode::E1003);
    assert_eq!(err.message, "expected `)`, found the end of the formula");

    let err = error_of("1 +");
    assert_eq!(err.code, ErrorCode::E1002);

    let err = error_of("{m^x}");
    assert_eq!(err.code, ErrorCode::E1005);

    let err = error_of("type{3}");
    assert_eq!(err.code, ErrorCode::E1006);

    let err = error_of("a b(1) c");
    assert_eq!(err.span, Span::new(7, 8));
}

#[test]
fn parse_errors_become_diagnostics() {
    let diagnostic = error_of("\"open").to_diagnostic();
    assert_eq!(diagnostic.code, ErrorCode::E1007);
    assert!(diagnostic.node.is_placeholder());
}
