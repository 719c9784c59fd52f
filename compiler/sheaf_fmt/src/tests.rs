use pretty_assertions::assert_eq;
use sheaf_ir::{same_structure, Expr, ExprKind, TypeArgExpr, TypeExpr, UnitExpr};
use sheaf_parse::parse;

use crate::{save, save_expr, Saver};

/// A type as written inside `type{...}`.
fn save_type(ty: &TypeExpr) -> String {
    let mut saver = Saver::new();
    saver.type_expr(ty);
    saver.output()
}

/// A unit as written inside `{...}`.
fn save_unit(unit: &UnitExpr) -> String {
    let mut saver = Saver::new();
    saver.unit(unit);
    saver.output()
}

/// Parse, save, and check the saved text parses to the same tree.
fn resaved(text: &str) -> String {
    let expr = parse(text).unwrap();
    let saved = save(&expr);
    let reparsed = parse(&saved).unwrap();
    assert!(
        same_structure(&expr, &reparsed),
        "`{text}` saved as `{saved}`, which parses differently"
    );
    saved
}

fn synthetic(kind: ExprKind) -> Expr {
    Expr::synthetic(kind)
}

fn ident(name: &str) -> Expr {
    synthetic(ExprKind::Ident(name.to_owned()))
}

// ========================================
// Literals
// ========================================

#[test]
fn literals() {
    assert_eq!(resaved("12"), "12");
    assert_eq!(resaved("-3.50"), "-3.50");
    assert_eq!(resaved("9.8{ m / s^2 }"), "9.8{m/s^2}");
    assert_eq!(resaved("true"), "true");
    assert_eq!(resaved("date{2021-03-04}"), "date{2021-03-04}");
    assert_eq!(resaved("{1/s}"), "{1/s}");
    assert_eq!(resaved("type{ [Number{m}] }"), "type{[Number{m}]}");
}

#[test]
fn text_is_escaped() {
    let expr = synthetic(ExprKind::Text("say \"hi\"\\\n\tok".to_owned()));
    assert_eq!(save(&expr), r#""say \"hi\"\\\n\tok""#);
    assert_eq!(resaved(r#""a\"b""#), r#""a\"b""#);
}

#[test]
fn units() {
    let per_second_squared = UnitExpr::divide(UnitExpr::One, UnitExpr::raise(UnitExpr::single("s"), 2));
    assert_eq!(save_unit(&per_second_squared), "1/s^2");
    let product = UnitExpr::Times(vec![
        UnitExpr::single("kg"),
        UnitExpr::raise(UnitExpr::single("m"), -2),
    ]);
    assert_eq!(save_unit(&product), "kg*m^-2");
    let nested = UnitExpr::divide(
        UnitExpr::single("m"),
        UnitExpr::Times(vec![UnitExpr::single("s"), UnitExpr::single("kg")]),
    );
    assert_eq!(save_unit(&nested), "m/(s*kg)");
    let raised = UnitExpr::raise(
        UnitExpr::divide(UnitExpr::single("m"), UnitExpr::single("s")),
        2,
    );
    assert_eq!(save_unit(&raised), "(m/s)^2");
    assert_eq!(resaved("1{m/(s*kg)}"), "1{m/(s*kg)}");
    assert_eq!(resaved("1{a/b/c}"), "1{a/b/c}");
}

#[test]
fn types() {
    let optional = TypeExpr::Tagged {
        name: "Optional".to_owned(),
        args: vec![TypeArgExpr::Type(TypeExpr::Number(Some(UnitExpr::single("m"))))],
    };
    assert_eq!(save_type(&optional), "Optional(Number{m})");
    let per_unit = TypeExpr::Tagged {
        name: "Unit".to_owned(),
        args: vec![TypeArgExpr::Unit(UnitExpr::single("km"))],
    };
    assert_eq!(save_type(&per_unit), "Unit({km})");
    assert_eq!(save_type(&TypeExpr::Tuple(vec![TypeExpr::Text])), "(Text,)");
    assert_eq!(save_type(&TypeExpr::Tuple(Vec::new())), "()");
    assert_eq!(
        resaved("type{(name:Text,born:Date)}"),
        "type{(name: Text, born: Date)}"
    );
}

// ========================================
// References
// ========================================

#[test]
fn references() {
    assert_eq!(resaved("to   text"), "to text");
    assert_eq!(resaved("@column Orders\\price"), "@column Orders\\price");
    assert_eq!(resaved("@entire price"), "@entire price");
    assert_eq!(resaved("@table Orders"), "@table Orders");
    assert_eq!(resaved("@tag Shape\\Point"), "@tag Shape\\Point");
    assert_eq!(resaved("map(xs,?*2)"), "map(xs, ? * 2)");
    assert_eq!(resaved("p~(_,b)"), "p ~ (_, b)");
}

// ========================================
// Operators
// ========================================

#[test]
fn operator_runs_share_one_level() {
    assert_eq!(resaved("1+2-3"), "1 + 2 - 3");
    assert_eq!(resaved("a<b<=c"), "a < b <= c");
    assert_eq!(resaved("a - -1"), "a - -1");
    assert_eq!(resaved("x ± 0.5"), "x ± 0.5");
}

#[test]
fn nested_operators_are_bracketed() {
    assert_eq!(resaved("(1 + 2) * 3"), "(1 + 2) * 3");
    assert_eq!(resaved("((a))"), "a");
    assert_eq!(resaved("(a = b) & (c ~ d)"), "(a = b) & (c ~ d)");

    let sum = synthetic(ExprKind::Times(vec![ident("a"), ident("b")]));
    assert_eq!(save_expr(&sum, true), "(a * b)");
    assert_eq!(save_expr(&sum, false), "a * b");
    assert_eq!(save_expr(&ident("a"), true), "a");
}

#[test]
fn mixed_operators_keep_their_run() {
    assert_eq!(resaved("1 + 2 * 3"), "1 + 2 * 3");
}

#[test]
fn operator_callees_are_bracketed() {
    let call = synthetic(ExprKind::Call {
        function: Box::new(synthetic(ExprKind::Or(vec![ident("f"), ident("g")]))),
        args: vec![ident("x")],
    });
    assert_eq!(save(&call), "(f | g)(x)");
    assert_eq!(resaved("(r#size)(1)"), "r#size(1)");
}

// ========================================
// Structure
// ========================================

#[test]
fn tuples_records_lists() {
    assert_eq!(resaved("( )"), "()");
    assert_eq!(resaved("(1 ,)"), "(1,)");
    assert_eq!(resaved("(1,2)"), "(1, 2)");
    assert_eq!(resaved("(width:1,height:2)"), "(width: 1, height: 2)");
    assert_eq!(resaved("[ ]"), "[]");
    assert_eq!(resaved("[1,[2]]"), "[1, [2]]");
}

#[test]
fn keyword_forms() {
    assert_eq!(
        resaved("@if a>1 @then \"big\" @else \"small\" @endif"),
        "@if a > 1 @then \"big\" @else \"small\" @endif"
    );
    assert_eq!(
        resaved("@match s @case Circle(r) @given r>0 @orcase Point @then 1 @case _ @then 0 @endmatch"),
        "@match s @case Circle(r) @given r > 0 @orcase Point @then 1 @case _ @then 0 @endmatch"
    );
    assert_eq!(
        resaved("@define d::type{Number{m}}, d=3{m}, (a,b)=(1,2) @then d @enddefine"),
        "@define d :: type{Number{m}}, d = 3{m}, (a, b) = (1, 2) @then d @enddefine"
    );
    assert_eq!(
        resaved("@function(a,b) @then a-b @endfunction(5,2)"),
        "@function(a, b) @then a - b @endfunction(5, 2)"
    );
}

#[test]
fn definition_patterns_stop_at_equals() {
    assert_eq!(
        resaved("@define x = a = b @then x @enddefine"),
        "@define x = a = b @then x @enddefine"
    );
    assert_eq!(
        resaved("@define (a = b) = c @then 1 @enddefine"),
        "@define (a = b) = c @then 1 @enddefine"
    );
}

#[test]
fn placeholders() {
    assert_eq!(resaved("@missing"), "@missing");
    assert_eq!(resaved("@invalid \"3 +\""), "@invalid \"3 +\"");
    assert_eq!(resaved("@invalid(a,@missing)"), "@invalid(a, @missing)");
}
