use pretty_assertions::assert_eq;

use super::*;

#[test]
fn integers_stay_exact() {
    assert_eq!(Number::Int(2).plus(Number::Int(3)), Some(Number::Int(5)));
    assert!(matches!(Number::Int(6).divided_by(Number::Int(3)), Some(Number::Int(2))));
    assert!(matches!(Number::Int(2).raised_to(Number::Int(10)), Some(Number::Int(1024))));
}

#[test]
fn inexact_results_fall_back_to_floats() {
    let third = Number::Int(1).divided_by(Number::Int(3)).unwrap();
    assert!(matches!(third, Number::Float(_)));
    let big = Number::Int(i64::MAX).plus(Number::ONE);
    assert!(matches!(big, Some(Number::Float(_))));
}

#[test]
fn integral_floats_normalize() {
    assert!(matches!(
        Number::Float(0.5).times(Number::Int(4)),
        Some(Number::Int(2))
    ));
    assert!(matches!(Number::parse("2.0"), Some(Number::Int(2))));
}

#[test]
fn division_by_zero_is_none() {
    assert_eq!(Number::Int(1).divided_by(Number::ZERO), None);
    assert_eq!(Number::Float(1.5).divided_by(Number::Float(0.0)), None);
}

#[test]
fn ints_and_floats_compare_numerically() {
    assert_eq!(Number::Int(3), Number::Float(3.0));
    assert!(Number::Int(2) < Number::Float(2.5));
}

#[test]
fn rounding() {
    assert_eq!(Number::Float(2.346).round_to(2), Some(Number::Float(2.35)));
    assert_eq!(Number::Float(-2.5).round_to(0), Some(Number::Int(-3)));
    assert_eq!(Number::Int(1234).round_to(-2), Some(Number::Int(1200)));
}

#[test]
fn rounding_far_from_the_point_stays_finite() {
    assert_eq!(Number::Float(1.25).round_to(-400), Some(Number::ZERO));
    assert_eq!(Number::Float(2.5).round_to(400), Some(Number::Float(2.5)));
    assert_eq!(Number::Float(1e300).round_to(300), Some(Number::Float(1e300)));
    assert_eq!(Number::Float(1.7e308).round_to(-308), None);
}

#[test]
fn overflow_is_none() {
    let huge = Number::Float(1e308);
    assert_eq!(huge.plus(huge), None);
    assert_eq!(huge.times(Number::Int(10)), None);
    assert_eq!(huge.negate().minus(huge), None);
    assert_eq!(huge.divided_by(Number::Float(1e-10)), None);
    assert!(matches!(
        Number::Int(i64::MAX).times(Number::Int(2)),
        Some(Number::Float(_))
    ));
}

#[test]
fn numbers_order_totally() {
    let mut items = vec![Number::Float(2.5), Number::Int(-1), Number::Float(1e300), Number::Int(2)];
    items.sort();
    assert_eq!(
        items,
        vec![Number::Int(-1), Number::Int(2), Number::Float(2.5), Number::Float(1e300)]
    );
    assert_ne!(Number::Float(0.5), Number::Float(1.5));
}

#[test]
fn parse_and_display() {
    assert_eq!(Number::parse("1e3").unwrap().to_string(), "1000");
    assert_eq!(Number::parse("-0.25").unwrap().to_string(), "-0.25");
    assert_eq!(Number::parse("abc"), None);
    assert_eq!(Number::Int(-2).sqrt(), None);
}
