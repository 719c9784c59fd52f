use pretty_assertions::assert_eq;
use sheaf_ir::UnitExpr;

use super::*;

fn m() -> UnitTerm {
    UnitTerm::named("m")
}

fn s() -> UnitTerm {
    UnitTerm::named("s")
}

#[test]
fn product_order_does_not_matter() {
    assert_eq!(m().times(s()).exponents(), s().times(m()).exponents());
}

#[test]
fn quotient_cancels() {
    let u = m().times(s()).divided_by(s());
    assert_eq!(u.exponents(), m().exponents());
    assert!(m().divided_by(m()).exponents().is_scalar());
}

#[test]
fn powers_multiply_through() {
    let accel = m().divided_by(s().raised_to(2));
    let squared = accel.raised_to(2).exponents();
    let names: Vec<_> = squared.names().collect();
    assert_eq!(names, vec![("m", 2), ("s", -4)]);
}

#[test]
fn display_uses_unit_syntax() {
    let accel = m().divided_by(s().raised_to(2));
    assert_eq!(accel.to_string(), "m/s^2");
    assert_eq!(UnitTerm::Scalar.to_string(), "1");
    assert_eq!(UnitTerm::Scalar.divided_by(s()).to_string(), "1/s");
    let kg = UnitTerm::named("kg");
    assert_eq!(
        kg.divided_by(m().times(s().raised_to(2))).to_string(),
        "kg/(m*s^2)"
    );
    assert_eq!(UnitTerm::Var(UnitVarId::from_raw(4)).to_string(), "?u4");
}

#[test]
fn concrete_unit_arithmetic() {
    let m = Unit::named("m");
    let s = Unit::named("s");
    let speed = m.divided_by(&s);
    assert_eq!(speed.times(&s), m);
    assert_eq!(speed.raised_to(0), Unit::SCALAR);
    assert_eq!(m.raised_to(2).root(2), Some(m.clone()));
    assert_eq!(m.root(2), None);
}

#[test]
fn unit_to_expr() {
    let speed = Unit::named("m").divided_by(&Unit::named("s").raised_to(2));
    assert_eq!(
        speed.to_expr(),
        UnitExpr::divide(
            UnitExpr::single("m"),
            UnitExpr::raise(UnitExpr::single("s"), 2)
        )
    );
    assert_eq!(Unit::SCALAR.to_expr(), UnitExpr::One);
}

#[test]
fn exponents_round_trip_through_terms() {
    let mut e = UnitExponents::var(UnitVarId::from_raw(1));
    e.add_name("m", 2);
    e.add_name("s", -1);
    assert_eq!(e.to_term().exponents(), e);
    assert!(!e.is_concrete());
    assert_eq!(e.to_unit(), None);
}
