use pretty_assertions::assert_eq;
use sheaf_ir::UnitExpr;

use super::*;
use crate::UnitTerm;

fn shape() -> TaggedTypeDefinition {
    TaggedTypeDefinition {
        name: "Shape".into(),
        params: vec![TypeParam::Unit("u".into())],
        tags: vec![
            TagDefinition {
                name: "Circle".into(),
                payload: Some(TypeTerm::Number(UnitTerm::Var(UnitVarId::from_raw(0)))),
            },
            TagDefinition {
                name: "None".into(),
                payload: None,
            },
        ],
    }
}

#[test]
fn optional_is_builtin() {
    let types = TypeManager::new();
    let def = types.get(builtin::OPTIONAL).unwrap();
    assert_eq!(def.tag_index(builtin::NONE), Some(0));
    assert_eq!(def.tag_index(builtin::IS), Some(1));
    assert!(types.get(builtin::TYPE).unwrap().tags.is_empty());
}

#[test]
fn registering_twice_fails() {
    let mut types = TypeManager::new();
    types.register(shape()).unwrap();
    assert_eq!(
        types.register(shape()),
        Err(TypeExprError::Duplicate("Shape".into()))
    );
    let mut clash = shape();
    clash.name = "Date".into();
    assert!(types.register(clash).is_err());
}

#[test]
fn types_with_tag_are_sorted() {
    let mut types = TypeManager::new();
    types.register(shape()).unwrap();
    assert_eq!(types.types_with_tag("None"), vec!["Optional", "Shape"]);
    assert_eq!(types.types_with_tag("Circle"), vec!["Shape"]);
    assert!(types.types_with_tag("Square").is_empty());
}

#[test]
fn instantiating_a_tag_links_payload_to_type_args() {
    let types = TypeManager::new();
    let mut unifier = Unifier::new();
    let inst = types
        .instantiate_tag(builtin::OPTIONAL, builtin::IS, &mut unifier)
        .unwrap();
    assert_eq!(inst.index, 1);
    let TypeTerm::Tagged { args, .. } = &inst.ty else {
        panic!("expected a tagged type, got {}", inst.ty);
    };
    assert_eq!(args, &vec![TypeArg::Type(inst.payload.clone().unwrap())]);

    // Fixing the payload fixes the type argument.
    unifier
        .unify(inst.payload.as_ref().unwrap(), &TypeTerm::Text)
        .unwrap();
    assert_eq!(
        unifier.resolve(&inst.ty),
        TypeTerm::optional(TypeTerm::Text)
    );
}

#[test]
fn unit_parameters_get_unit_variables() {
    let mut types = TypeManager::new();
    types.register(shape()).unwrap();
    let mut unifier = Unifier::new();
    let inst = types.instantiate_tag("Shape", "Circle", &mut unifier).unwrap();
    let payload = inst.payload.unwrap();
    unifier
        .unify(&payload, &TypeTerm::Number(UnitTerm::named("m")))
        .unwrap();
    assert_eq!(
        unifier.to_concrete(&inst.ty).unwrap().to_string(),
        "Shape({m})"
    );
}

#[test]
fn resolves_nested_type_syntax() {
    let types = TypeManager::new();
    let units = UnitManager::with_builtin_units();
    let expr = TypeExpr::Tagged {
        name: "Optional".into(),
        args: vec![TypeArgExpr::Type(TypeExpr::List(Box::new(TypeExpr::Number(
            Some(UnitExpr::single("km")),
        ))))],
    };
    let ty = types.resolve_type_expr(&expr, &units).unwrap();
    assert_eq!(ty.to_string(), "Optional([Number{km}])");
}

#[test]
fn type_syntax_errors() {
    let types = TypeManager::new();
    let units = UnitManager::with_builtin_units();

    let unknown = TypeExpr::Tagged {
        name: "Optinal".into(),
        args: vec![],
    };
    let Err(TypeExprError::UnknownType { suggestions, .. }) =
        types.resolve_type_expr(&unknown, &units)
    else {
        panic!("expected an unknown type error");
    };
    assert!(suggestions.iter().any(|s| s == "Optional"));

    let arity = TypeExpr::Tagged {
        name: "Optional".into(),
        args: vec![],
    };
    assert!(matches!(
        types.resolve_type_expr(&arity, &units),
        Err(TypeExprError::Arity { expected: 1, found: 0, .. })
    ));

    let kind = TypeExpr::Tagged {
        name: "Unit".into(),
        args: vec![TypeArgExpr::Type(TypeExpr::Text)],
    };
    assert!(matches!(
        types.resolve_type_expr(&kind, &units),
        Err(TypeExprError::ArgKind { expected: "unit", .. })
    ));

    let record = TypeExpr::Record(vec![
        ("a".into(), TypeExpr::Text),
        ("a".into(), TypeExpr::Boolean),
    ]);
    assert_eq!(
        types.resolve_type_expr(&record, &units),
        Err(TypeExprError::Duplicate("a".into()))
    );
}
