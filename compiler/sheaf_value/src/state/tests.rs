use super::*;
use crate::Number;

#[test]
fn add_returns_a_new_state() {
    let base = EvaluateState::new(4);
    let next = base.add("x", Value::number(1)).unwrap();
    assert!(base.get("x").is_err());
    assert_eq!(next.get("x").unwrap().as_number(), Some(Number::Int(1)));
    assert_eq!(next.row(), 4);
}

#[test]
fn unbound_and_duplicate_names_are_internal_errors() {
    let state = EvaluateState::new(0).add("x", Value::Boolean(true)).unwrap();
    assert!(state.get("y").unwrap_err().is_internal());
    assert!(state.add("x", Value::Boolean(false)).unwrap_err().is_internal());
    let state = state.add("_a", Value::Boolean(true)).unwrap();
    assert!(state.add("_a", Value::Boolean(false)).is_ok());
}
