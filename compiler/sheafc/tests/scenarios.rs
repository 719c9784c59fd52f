//! End-to-end scenarios: text in, types and row values out.

#![allow(clippy::unwrap_used, clippy::expect_used, reason = "Tests can panic")]

use pretty_assertions::assert_eq;
use sheaf_types::{
    DataType, TagDefinition, TaggedTypeDefinition, TypeTerm, Unit, UnitDeclaration, UnitTerm,
};
use sheafc::{
    CheckedExpression, Diagnostic, Engine, EngineConfig, ErrorCode, EvalError,
    InternalErrorPolicy, Table, TableSet, UserError, Value,
};

const ORDERS: &str = "\
item:Text\tprice:Number{USD}\tquantity:Number\tshipped:Optional(Date)
bolt\t0.25\t40\t2024-02-01
nut\t0.10\t0\t
washer\t0.05\t100\t2024-03-15
";

fn engine() -> Engine {
    Engine::new(EngineConfig {
        internal_errors: InternalErrorPolicy::Report,
        ..EngineConfig::default()
    })
    .unwrap()
}

fn orders(engine: &Engine) -> TableSet {
    TableSet::single(Table::from_tsv("Orders", ORDERS, engine.types(), engine.units()).unwrap())
}

fn checked(engine: &Engine, tables: &TableSet, text: &str) -> CheckedExpression {
    engine
        .check_text(text, tables)
        .unwrap_or_else(|errors| panic!("`{text}` failed to check: {errors:#?}"))
}

fn errors(engine: &Engine, tables: &TableSet, text: &str) -> Vec<Diagnostic> {
    match engine.check_text(text, tables) {
        Ok(checked) => panic!("`{text}` checked to {}", checked.ty()),
        Err(errors) => errors,
    }
}

fn column(engine: &Engine, tables: &TableSet, text: &str) -> Vec<String> {
    let checked = checked(engine, tables, text);
    engine
        .evaluate_column(&checked, tables.row_count())
        .into_iter()
        .map(|result| match result {
            Ok(value) => value.to_string(),
            Err(err) => format!("error: {err}"),
        })
        .collect()
}

fn shown(text: &str) -> String {
    let engine = engine();
    let tables = TableSet::new();
    let checked = checked(&engine, &tables, text);
    engine.evaluate(&checked, 0).unwrap().to_string()
}

// ========================================
// Concrete scenarios
// ========================================

#[test]
fn adding_lengths() {
    let engine = engine();
    let checked = checked(&engine, &TableSet::new(), "1{m} + 2{m}");
    assert_eq!(checked.ty(), &DataType::Number(Unit::named("m")));
    assert_eq!(engine.evaluate(&checked, 0).unwrap().to_string(), "3");
}

#[test]
fn adding_a_length_to_a_duration() {
    let engine = engine();
    let errors = errors(&engine, &TableSet::new(), "1{m} + 2{s}");
    assert_eq!(errors.len(), 1);
    assert_eq!(errors[0].code, ErrorCode::E2002);
    assert!(
        errors[0].fixes.iter().any(|f| f.title().starts_with("change the unit")),
        "{:?}",
        errors[0].fixes
    );
}

#[test]
fn matching_binds_a_variable() {
    let engine = engine();
    let checked = checked(&engine, &TableSet::new(), "@match 5 @case x @then x*2 @endmatch");
    assert_eq!(checked.ty(), &DataType::SCALAR);
    assert_eq!(engine.evaluate(&checked, 0).unwrap().to_string(), "10");
}

#[test]
fn match_with_no_applicable_clause() {
    let engine = engine();
    let checked = checked(&engine, &TableSet::new(), "@match 5 @case 6 @then \"no\" @endmatch");
    assert_eq!(checked.ty(), &DataType::Text);
    assert_eq!(
        engine.evaluate(&checked, 0).unwrap_err(),
        EvalError::User(UserError::NoMatchingClause {
            value: "5".to_owned()
        })
    );
}

#[test]
fn missing_source_column() {
    let engine = engine();
    let source = Table::new("Source", 1)
        .with_column("col1", DataType::SCALAR, vec![Value::number(1_i64)])
        .unwrap();
    let tables = TableSet::single(source);
    let errors = errors(&engine, &tables, "@column col1 + @column col2");
    assert_eq!(errors.len(), 1);
    assert_eq!(errors[0].code, ErrorCode::E4001);
    assert_eq!(errors[0].message, "could not find source column: col2");
}

#[test]
fn anything_matches_a_wildcard() {
    for x in ["1", "\"text\"", "[1, 2]", "date{2024-01-01}", "(a: 1, b: true)"] {
        let text = format!("@define x = {x} @then x ~ _ @enddefine");
        assert_eq!(shown(&text), "true", "{text}");
    }
}

// ========================================
// Properties
// ========================================

#[test]
fn checking_twice_gives_the_same_answer() {
    let engine = engine();
    let tables = orders(&engine);
    for text in [
        "@column price * @column quantity",
        "@column price + 1{m}",
        "@column item ; @column nope",
        "@if @column quantity > 0 @then @column item @else 3 @endif",
    ] {
        let expr = sheaf_parse::parse(text).unwrap();
        let first = engine.check(&expr, &tables).map(|c| c.ty().clone());
        let second = engine.check(&expr, &tables).map(|c| c.ty().clone());
        assert_eq!(first, second, "{text}");
    }
}

#[test]
fn saved_formulas_check_and_evaluate_the_same() {
    let engine = engine();
    let tables = orders(&engine);
    for text in [
        "@column price*@column quantity",
        "((1+2)*3)-(4/2)",
        "@define (a,b)=(2,3) @then a^b @enddefine",
        "@match @column quantity @case 0 @then \"none\" @case q @given q>50 @then \"many\" @case _ @then \"some\" @endmatch",
        "map([1,2,3],?*10)",
        "@column shipped ~ None",
        "to text((lo:1,hi:5)#hi) ; \"!\"",
    ] {
        let expr = sheaf_parse::parse(text).unwrap();
        let saved = sheaf_fmt::save(&expr);
        let original = checked(&engine, &tables, text);
        let resaved = checked(&engine, &tables, &saved);
        assert_eq!(original.ty(), resaved.ty(), "`{text}` saved as `{saved}`");
        for row in 0..tables.row_count() {
            assert_eq!(
                engine.evaluate(&original, row).map(|v| v.to_string()),
                engine.evaluate(&resaved, row).map(|v| v.to_string()),
                "`{text}` saved as `{saved}`, row {row}"
            );
        }
    }
}

#[test]
fn exhaustive_matches_never_fail() {
    let engine = engine();
    let tables = orders(&engine);
    let total = column(
        &engine,
        &tables,
        "@match @column shipped @case None @then 0 @case Is(_) @then 1 @endmatch",
    );
    assert_eq!(total, vec!["1", "0", "1"]);

    let partial = column(
        &engine,
        &tables,
        "@match @column shipped @case Is(_) @then 1 @endmatch",
    );
    assert_eq!(partial[1], "error: no matching clause for None");
}

#[test]
fn and_stops_at_the_first_false() {
    assert_eq!(shown("false & ((1 / 0) = 1)"), "false");
    assert_eq!(shown("true | ((1 / 0) = 1)"), "true");
}

#[test]
fn square_roots_need_a_square_unit() {
    let engine = engine();
    let tables = TableSet::new();
    for text in ["sqrt(4{m})", "9{m} ^ (1/2)"] {
        let errors = errors(&engine, &tables, text);
        assert_eq!(errors.len(), 1, "{text}");
        assert_eq!(errors[0].code, ErrorCode::E2002, "{text}");
    }
    let area = checked(&engine, &tables, "sqrt(4{m^2})");
    assert_eq!(area.ty(), &DataType::Number(Unit::named("m")));
    assert_eq!(engine.evaluate(&area, 0).unwrap().to_string(), "2");
}

// ========================================
// Tables
// ========================================

#[test]
fn tsv_tables_are_typed_by_their_header() {
    let engine = engine();
    let tables = orders(&engine);
    let checked = checked(&engine, &tables, "@column price * @column quantity");
    assert_eq!(checked.ty(), &DataType::Number(Unit::named("USD")));
    assert_eq!(
        column(&engine, &tables, "@column price * @column quantity"),
        vec!["10", "0", "5"]
    );
    assert_eq!(
        column(&engine, &tables, "@column shipped"),
        vec!["Is(date{2024-02-01})", "None", "Is(date{2024-03-15})"]
    );
}

#[test]
fn failing_rows_do_not_affect_others() {
    let engine = Engine::new(EngineConfig {
        threads: 2,
        internal_errors: InternalErrorPolicy::Report,
        ..EngineConfig::default()
    })
    .unwrap();
    let tables = orders(&engine);
    assert_eq!(
        column(&engine, &tables, "100 / @column quantity"),
        vec!["2.5", "error: division by zero", "1"]
    );
}

#[test]
fn whole_columns_and_qualified_tables() {
    let engine = engine();
    let tables = orders(&engine);
    assert_eq!(
        column(&engine, &tables, "sum(@entire quantity)"),
        vec!["140"; 3]
    );
    assert_eq!(
        column(&engine, &tables, "count(@table Orders)"),
        vec!["3"; 3]
    );
    assert_eq!(
        column(&engine, &tables, "@column Orders\\item"),
        vec!["\"bolt\"", "\"nut\"", "\"washer\""]
    );
}

#[test]
fn registered_tagged_types() {
    let mut engine = engine();
    engine
        .types_mut()
        .register(TaggedTypeDefinition {
            name: "Shape".to_owned(),
            params: Vec::new(),
            tags: vec![
                TagDefinition {
                    name: "Square".to_owned(),
                    payload: Some(TypeTerm::Number(UnitTerm::named("m"))),
                },
                TagDefinition {
                    name: "Dot".to_owned(),
                    payload: None,
                },
            ],
        })
        .unwrap();
    let tables = TableSet::new();
    let checked = checked(
        &engine,
        &tables,
        "@match Square(3{m}) @case Square(s) @then s * s @case Dot @then 0{m^2} @endmatch",
    );
    assert_eq!(checked.ty(), &DataType::Number(Unit::named("m").raised_to(2)));
    assert_eq!(engine.evaluate(&checked, 0).unwrap().to_string(), "9");
}

#[test]
fn declared_units() {
    let mut engine = engine();
    let tables = TableSet::new();
    let unknown = errors(&engine, &tables, "3{furlong}");
    assert_eq!(unknown[0].code, ErrorCode::E4004);

    engine
        .units_mut()
        .declare(UnitDeclaration::scaled("furlong", "furlong", 201.168, Unit::named("m")))
        .unwrap();
    let area = checked(&engine, &tables, "3{furlong} * 2{furlong}");
    assert_eq!(area.ty(), &DataType::Number(Unit::named("furlong").raised_to(2)));
    assert_eq!(engine.evaluate(&area, 0).unwrap().to_string(), "6");
}
