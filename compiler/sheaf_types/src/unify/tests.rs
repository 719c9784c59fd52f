use pretty_assertions::assert_eq;
use proptest::prelude::*;

use super::*;
use crate::Unit;

fn number(unit: &str) -> TypeTerm {
    TypeTerm::Number(UnitTerm::named(unit))
}

// ========================================
// Basic terms
// ========================================

#[test]
fn identical_terms_unify() {
    let mut u = Unifier::new();
    assert_eq!(u.unify(&TypeTerm::Text, &TypeTerm::Text), Ok(TypeTerm::Text));
    assert_eq!(u.unify(&number("m"), &number("m")), Ok(number("m")));
}

#[test]
fn variables_bind_in_either_direction() {
    let mut u = Unifier::new();
    let a = u.fresh_type();
    let b = u.fresh_type();
    u.unify(&a, &TypeTerm::list(b.clone())).unwrap();
    u.unify(&TypeTerm::Boolean, &b).unwrap();
    assert_eq!(u.resolve(&a), TypeTerm::list(TypeTerm::Boolean));
}

#[test]
fn mismatch_reports_resolved_terms() {
    let mut u = Unifier::new();
    let a = u.fresh_type();
    u.unify(&a, &TypeTerm::Text).unwrap();
    assert_eq!(
        u.unify(&a, &TypeTerm::Boolean),
        Err(TypeError::Mismatch {
            expected: TypeTerm::Text,
            found: TypeTerm::Boolean,
        })
    );
}

#[test]
fn occurs_check_rejects_infinite_types() {
    let mut u = Unifier::new();
    let a = u.fresh_type();
    let err = u.unify(&a, &TypeTerm::list(a.clone())).unwrap_err();
    assert!(matches!(err, TypeError::Infinite { .. }));
}

#[test]
fn failed_unification_leaves_no_bindings() {
    let mut u = Unifier::new();
    let a = u.fresh_type();
    let pair = TypeTerm::Tuple(vec![a.clone(), TypeTerm::Text]);
    let other = TypeTerm::Tuple(vec![TypeTerm::SCALAR, TypeTerm::Boolean]);
    assert!(u.unify(&pair, &other).is_err());
    assert_eq!(u.resolve(&a), a);
}

#[test]
fn arity_mismatches() {
    let mut u = Unifier::new();
    let f1 = TypeTerm::function(vec![TypeTerm::Text], TypeTerm::Text);
    let f2 = TypeTerm::function(vec![TypeTerm::Text, TypeTerm::Text], TypeTerm::Text);
    assert_eq!(
        u.unify(&f1, &f2),
        Err(TypeError::Arity {
            kind: ArityKind::Function,
            expected: 1,
            found: 2,
        })
    );
}

#[test]
fn tagged_types_unify_by_name_and_args() {
    let mut u = Unifier::new();
    let a = u.fresh_type();
    let unified = u
        .unify(&TypeTerm::optional(a.clone()), &TypeTerm::optional(TypeTerm::Text))
        .unwrap();
    assert_eq!(unified, TypeTerm::optional(TypeTerm::Text));
    assert!(u
        .unify(
            &TypeTerm::optional(TypeTerm::Text),
            &TypeTerm::type_of(TypeTerm::Text)
        )
        .is_err());
}

// ========================================
// Units
// ========================================

#[test]
fn numbers_with_different_units_are_a_unit_error() {
    let mut u = Unifier::new();
    let err = u.unify(&number("m"), &number("s")).unwrap_err();
    let TypeError::Unit(mismatch) = err else {
        panic!("expected a unit mismatch, got {err:?}");
    };
    assert_eq!(mismatch.expected.to_string(), "m");
    assert_eq!(mismatch.found.to_string(), "s");
}

#[test]
fn scalar_against_unit_is_a_unit_error() {
    let mut u = Unifier::new();
    assert!(matches!(
        u.unify(&TypeTerm::SCALAR, &number("m")),
        Err(TypeError::Unit(_))
    ));
}

#[test]
fn unit_variable_solves_quotient() {
    // ?u * s = m  gives  ?u = m/s
    let mut u = Unifier::new();
    let var = u.fresh_unit();
    u.unify_units(&var.clone().times(UnitTerm::named("s")), &UnitTerm::named("m"))
        .unwrap();
    assert_eq!(u.resolve_unit(&var).to_string(), "m/s");
}

#[test]
fn unit_square_root_is_solved_when_exact() {
    let mut u = Unifier::new();
    let var = u.fresh_unit();
    let area = UnitTerm::named("m").raised_to(2);
    u.unify_units(&var.clone().raised_to(2), &area).unwrap();
    assert_eq!(u.resolve_unit(&var).to_string(), "m");
}

#[test]
fn unit_square_root_fails_when_inexact() {
    let mut u = Unifier::new();
    let var = u.fresh_unit();
    assert!(u
        .unify_units(&var.clone().raised_to(2), &UnitTerm::named("m"))
        .is_err());
    assert!(u.resolve_unit(&var).vars().next().is_some());
}

#[test]
fn unit_root_with_a_remainder_fails() {
    // ?u^2 * s = m^3 leaves m^3 with no variable to absorb the odd power.
    let mut u = Unifier::new();
    let var = u.fresh_unit();
    let volume = UnitTerm::named("m").raised_to(3);
    let err = u
        .unify_units(&var.clone().raised_to(2).times(UnitTerm::named("s")), &volume)
        .unwrap_err();
    assert_eq!(err.found.to_string(), "m^3");
    assert_eq!(u.resolve_unit(&var).vars().count(), 1);
}

#[test]
fn two_unit_variables_stay_general() {
    // ?a^2 = ?b^3 has the general solution ?a = ?w^3, ?b = ?w^2.
    let mut u = Unifier::new();
    let a = u.fresh_unit();
    let b = u.fresh_unit();
    u.unify_units(&a.clone().raised_to(2), &b.clone().raised_to(3))
        .unwrap();
    let ra = u.resolve_unit(&a);
    let rb = u.resolve_unit(&b);
    let (wa, ea) = ra.vars().next().unwrap();
    let (wb, eb) = rb.vars().next().unwrap();
    assert_eq!(wa, wb);
    assert_eq!((ea.abs(), eb.abs()), (3, 2));
}

// ========================================
// Records
// ========================================

fn record(fields: &[(&str, TypeTerm)]) -> RecordTerm {
    RecordTerm::exact(fields.iter().map(|(k, t)| ((*k).to_owned(), t.clone())))
}

#[test]
fn exact_records_need_the_same_fields() {
    let mut u = Unifier::new();
    let a = TypeTerm::Record(record(&[("x", TypeTerm::Text)]));
    let b = TypeTerm::Record(record(&[("x", TypeTerm::Text), ("y", TypeTerm::Text)]));
    assert!(u.unify(&a, &b).is_err());
}

#[test]
fn open_record_takes_fields_from_exact_one() {
    let mut u = Unifier::new();
    let row = u.fresh_row_var();
    let open = TypeTerm::Record(RecordTerm::open(
        [("x".to_owned(), TypeTerm::SCALAR)],
        row,
    ));
    let exact = TypeTerm::Record(record(&[("x", TypeTerm::SCALAR), ("y", TypeTerm::Text)]));
    let unified = u.unify(&open, &exact).unwrap();
    assert_eq!(unified, exact);
}

#[test]
fn open_record_missing_field_in_exact_record() {
    let mut u = Unifier::new();
    let row = u.fresh_row_var();
    let open = TypeTerm::Record(RecordTerm::open(
        [("z".to_owned(), TypeTerm::SCALAR)],
        row,
    ));
    let exact = TypeTerm::Record(record(&[("x", TypeTerm::SCALAR)]));
    let err = u.unify(&open, &exact).unwrap_err();
    assert!(matches!(err, TypeError::MissingField { ref field, .. } if field == "z"));
}

#[test]
fn two_open_records_merge_their_fields() {
    let mut u = Unifier::new();
    let (r1, r2) = (u.fresh_row_var(), u.fresh_row_var());
    let left = TypeTerm::Record(RecordTerm::open([("a".to_owned(), TypeTerm::Text)], r1));
    let right = TypeTerm::Record(RecordTerm::open([("b".to_owned(), TypeTerm::Boolean)], r2));
    u.unify(&left, &right).unwrap();

    let TypeTerm::Record(merged) = u.resolve(&left) else {
        panic!("expected a record");
    };
    assert_eq!(merged.fields.keys().collect::<Vec<_>>(), vec!["a", "b"]);
    assert!(merged.rest.is_some());
    assert_eq!(u.resolve(&right), u.resolve(&left));
}

// ========================================
// Type classes
// ========================================

#[test]
fn functions_are_not_equatable() {
    let mut u = Unifier::new();
    let f = TypeTerm::function(vec![], TypeTerm::Text);
    let err = u.require(&f, TypeClasses::EQUATABLE).unwrap_err();
    assert!(matches!(err, TypeError::NotInClass { .. }));
    assert!(u.require(&TypeTerm::list(TypeTerm::Text), TypeClasses::COMPARABLE).is_ok());
}

#[test]
fn classes_follow_variables_into_bindings() {
    let mut u = Unifier::new();
    let a = u.fresh_type();
    u.require(&TypeTerm::list(a.clone()), TypeClasses::EQUATABLE)
        .unwrap();
    let f = TypeTerm::function(vec![], TypeTerm::Text);
    assert!(u.unify(&a, &f).is_err());
}

#[test]
fn classes_pass_between_linked_variables() {
    let mut u = Unifier::new();
    let a = u.fresh_constrained(TypeClasses::EQUATABLE);
    let b = u.fresh_type();
    u.unify(&a, &b).unwrap();
    let f = TypeTerm::function(vec![], TypeTerm::Text);
    assert!(u.unify(&b, &f).is_err());
}

#[test]
fn phantom_types_are_not_equatable() {
    let mut u = Unifier::new();
    assert!(u
        .require(&TypeTerm::type_of(TypeTerm::Text), TypeClasses::EQUATABLE)
        .is_err());
}

// ========================================
// Concrete conversion
// ========================================

#[test]
fn concrete_conversion() {
    let mut u = Unifier::new();
    let a = u.fresh_type();
    assert!(matches!(u.to_concrete(&a), Err(ConcreteError::Unresolved { .. })));
    assert!(matches!(
        u.to_concrete(&TypeTerm::optional(a.clone())),
        Err(ConcreteError::Ambiguous { .. })
    ));
    let n = TypeTerm::Number(u.fresh_unit());
    assert!(matches!(u.to_concrete(&n), Err(ConcreteError::UnresolvedUnit { .. })));

    u.unify(&a, &number("kg")).unwrap();
    assert_eq!(
        u.to_concrete(&TypeTerm::optional(a)).unwrap(),
        DataType::Tagged {
            name: "Optional".into(),
            args: vec![DataTypeArg::Type(DataType::Number(Unit::named("kg")))],
        }
    );
}

#[test]
fn rollback_keeps_fresh_ids_unique() {
    let mut u = Unifier::new();
    let snapshot = u.snapshot();
    let a = u.fresh_type_var();
    u.rollback(snapshot);
    let b = u.fresh_type_var();
    assert_ne!(a, b);
}

proptest! {
    #[test]
    fn unit_products_commute(
        a in prop::sample::select(vec!["m", "s", "kg", "USD"]),
        b in prop::sample::select(vec!["m", "s", "kg", "USD"]),
        pa in -3i32..=3,
        pb in -3i32..=3,
    ) {
        let ua = UnitTerm::named(a).raised_to(pa);
        let ub = UnitTerm::named(b).raised_to(pb);
        let mut u = Unifier::new();
        prop_assert!(u.unify_units(&ua.clone().times(ub.clone()), &ub.clone().times(ua.clone())).is_ok());
        prop_assert_eq!(
            ua.clone().times(ub.clone()).exponents(),
            ub.times(ua).exponents()
        );
    }
}
