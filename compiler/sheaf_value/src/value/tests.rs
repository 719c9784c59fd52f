use pretty_assertions::assert_eq;

use super::*;
use crate::UserError;

#[test]
fn numbers_compare_across_representations() {
    let a = Value::number(2);
    let b = Value::Number(Number::Float(2.0));
    assert!(a.equals(&b).unwrap());
    assert_eq!(
        Value::number(1).compare(&Value::number(2)).unwrap(),
        Some(Ordering::Less)
    );
}

#[test]
fn tagged_values_order_by_tag_then_payload() {
    let none = Value::none();
    let three = Value::some(Value::number(3));
    let four = Value::some(Value::number(4));
    assert_eq!(none.compare(&three).unwrap(), Some(Ordering::Less));
    assert_eq!(three.compare(&four).unwrap(), Some(Ordering::Less));
    assert!(three.equals(&Value::some(Value::number(3))).unwrap());
    assert!(!three.equals(&none).unwrap());
}

#[test]
fn lazy_and_eager_lists_are_equal_when_elements_are() {
    let eager = Value::list(vec![Value::number(0), Value::number(1)]);
    let lazy = Value::List(ListValue::lazy(2, |i| {
        Ok(Value::number(i64::try_from(i).unwrap_or(i64::MAX)))
    }));
    assert!(eager.equals(&lazy).unwrap());
}

#[test]
fn failing_lazy_lists_report_errors() {
    let lazy = Value::List(ListValue::lazy(1, |_| Err(UserError::DivisionByZero.into())));
    assert!(lazy.equals(&Value::list(vec![])).is_ok());
    assert!(lazy
        .equals(&Value::list(vec![Value::number(1)]))
        .is_err());
}

#[test]
fn records_compare_by_fields() {
    let a = Value::record([("x".to_owned(), Value::number(1))]);
    let b = Value::record([("x".to_owned(), Value::number(1))]);
    let c = Value::record([("y".to_owned(), Value::number(1))]);
    assert!(a.equals(&b).unwrap());
    assert!(!a.equals(&c).unwrap());
}

#[test]
fn functions_are_called_with_checked_arity() {
    let double = FunctionValue::new("double", 1, |args| {
        let n = args[0].as_number().unwrap_or(Number::ZERO);
        Ok(Value::Number(n.times(Number::Int(2)).unwrap()))
    });
    assert!(double
        .call(&[Value::number(4)])
        .unwrap()
        .equals(&Value::number(8))
        .unwrap());
    assert!(double.call(&[]).unwrap_err().is_internal());
}

#[test]
fn display_is_literal_like() {
    let v = Value::tuple(vec![
        Value::text("a\"b"),
        Value::Boolean(true),
        Value::list(vec![Value::some(Value::number(1)), Value::none()]),
    ]);
    assert_eq!(v.to_string(), r#"("a\"b", true, [Is(1), None])"#);
}
