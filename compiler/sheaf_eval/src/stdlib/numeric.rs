//! Arithmetic on numbers and lists of numbers.

use std::cmp::Ordering;

use sheaf_types::{SchemeBuilder, TypeClasses, TypeScheme, TypeTerm};
use sheaf_value::{EvalResult, Number, UserError, Value};

use super::{arg, list, number, number_value, StandardLibrary};
use crate::errors::{incomparable, not_real};

pub(super) fn register(library: &mut StandardLibrary) {
    library.fixed("abs", same_unit(), |args| Ok(Value::Number(number(args, 0)?.abs())));
    library.fixed("round", same_unit(), |args| {
        let n = number(args, 0)?;
        let rounded = n.round_to(0).ok_or_else(|| not_real(format!("round({n})")))?;
        Ok(Value::Number(rounded))
    });
    library.fixed("round decimal", round_decimal_scheme(), round_decimal);
    library.fixed("sqrt", sqrt_scheme(), sqrt);
    library.fixed("min", extremum_scheme(), |args| extremum(args, Ordering::Less));
    library.fixed("max", extremum_scheme(), |args| extremum(args, Ordering::Greater));
    library.fixed("sum", total_scheme(), sum);
    library.fixed("average", total_scheme(), average);
}

/// `Number{u} -> Number{u}`.
fn same_unit() -> TypeScheme {
    let mut b = SchemeBuilder::new();
    let number = TypeTerm::Number(b.unit_var());
    b.build(vec![number.clone()], number)
}

/// `(Number{u}, Number) -> Number{u}`.
fn round_decimal_scheme() -> TypeScheme {
    let mut b = SchemeBuilder::new();
    let number = TypeTerm::Number(b.unit_var());
    b.build(vec![number.clone(), TypeTerm::SCALAR], number)
}

/// `Number{u^2} -> Number{u}`.
fn sqrt_scheme() -> TypeScheme {
    let mut b = SchemeBuilder::new();
    let u = b.unit_var();
    b.build(
        vec![TypeTerm::Number(u.clone().raised_to(2))],
        TypeTerm::Number(u),
    )
}

/// `(t, t) -> t` for orderable `t`.
fn extremum_scheme() -> TypeScheme {
    let mut b = SchemeBuilder::new();
    let t = b.constrained(TypeClasses::COMPARABLE);
    b.build(vec![t.clone(), t.clone()], t)
}

/// `[Number{u}] -> Number{u}`.
fn total_scheme() -> TypeScheme {
    let mut b = SchemeBuilder::new();
    let number = TypeTerm::Number(b.unit_var());
    b.build(vec![TypeTerm::list(number.clone())], number)
}

fn round_decimal(args: &[Value]) -> EvalResult<Value> {
    let places = number(args, 1)?
        .as_i64()
        .ok_or_else(|| UserError::function("round decimal", "the number of places must be a whole number"))?;
    let places = i32::try_from(places)
        .ok()
        .filter(|p| p.abs() <= Number::MAX_PLACES)
        .ok_or_else(|| {
            UserError::function(
                "round decimal",
                format!("the number of places must be between -{0} and {0}", Number::MAX_PLACES),
            )
        })?;
    let n = number(args, 0)?;
    let rounded = n
        .round_to(places)
        .ok_or_else(|| not_real(format!("round decimal({n}, {places})")))?;
    Ok(Value::Number(rounded))
}

fn sqrt(args: &[Value]) -> EvalResult<Value> {
    let n = number(args, 0)?;
    let root = n.sqrt().ok_or_else(|| not_real(format!("sqrt({n})")))?;
    Ok(Value::Number(root))
}

/// The first argument unless the second is strictly further in `towards`.
fn extremum(args: &[Value], towards: Ordering) -> EvalResult<Value> {
    let (a, b) = (arg(args, 0)?, arg(args, 1)?);
    let ordering = b.compare(a)?.ok_or_else(|| incomparable(b, a))?;
    Ok(if ordering == towards { b.clone() } else { a.clone() })
}

fn sum(args: &[Value]) -> EvalResult<Value> {
    let mut total = Number::ZERO;
    for item in list(args, 0)?.to_vec()? {
        total = add_to(total, number_value(&item)?)?;
    }
    Ok(Value::Number(total))
}

fn add_to(total: Number, n: Number) -> EvalResult<Number> {
    total
        .plus(n)
        .ok_or_else(|| not_real(format!("{total} + {n}")))
}

fn average(args: &[Value]) -> EvalResult<Value> {
    let items = list(args, 0)?.to_vec()?;
    if items.is_empty() {
        return Err(UserError::function("average", "the list is empty").into());
    }
    let mut total = Number::ZERO;
    for item in &items {
        total = add_to(total, number_value(item)?)?;
    }
    let count = Number::from(i64::try_from(items.len()).unwrap_or(i64::MAX));
    Ok(Value::Number(total.divided_by(count).unwrap_or(total)))
}
