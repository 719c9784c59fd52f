use pretty_assertions::assert_eq;
use sheaf_ir::UnitExpr;

use super::*;

#[test]
fn display_matches_type_syntax() {
    let speed = Unit::named("m").divided_by(&Unit::named("s"));
    assert_eq!(DataType::Number(speed).to_string(), "Number{m/s}");
    assert_eq!(DataType::SCALAR.to_string(), "Number");
    let row = DataType::Record(
        [
            ("name".to_owned(), DataType::Text),
            ("age".to_owned(), DataType::SCALAR),
        ]
        .into_iter()
        .collect(),
    );
    assert_eq!(row.to_string(), "(age: Number, name: Text)");
    let opt = DataType::Tagged {
        name: "Optional".into(),
        args: vec![DataTypeArg::Type(DataType::list(DataType::Boolean))],
    };
    assert_eq!(opt.to_string(), "Optional([Boolean])");
}

#[test]
fn type_expr_keeps_units() {
    let t = DataType::Number(Unit::named("kg"));
    assert_eq!(
        t.to_type_expr(),
        TypeExpr::Number(Some(UnitExpr::single("kg")))
    );
    assert_eq!(DataType::SCALAR.to_type_expr(), TypeExpr::Number(None));
}
