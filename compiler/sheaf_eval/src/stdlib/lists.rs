//! Functions over lists.

use sheaf_types::{SchemeBuilder, TypeScheme, TypeTerm};
use sheaf_value::{EvalResult, Number, UserError, Value};

use super::{function, list, number, test, StandardLibrary};

pub(super) fn register(library: &mut StandardLibrary) {
    library.fixed("count", count_scheme(), count);
    library.fixed("element", element_scheme(), element);
    library.fixed("any", predicate_scheme(), |args| quantify(args, Quantifier::Any));
    library.fixed("all", predicate_scheme(), |args| quantify(args, Quantifier::All));
    library.fixed("none", predicate_scheme(), |args| quantify(args, Quantifier::None));
    library.fixed("map", map_scheme(), map);
    library.fixed("filter", filter_scheme(), filter);
}

/// `[t] -> Number`.
fn count_scheme() -> TypeScheme {
    let mut b = SchemeBuilder::new();
    let t = b.type_var();
    b.build(vec![TypeTerm::list(t)], TypeTerm::SCALAR)
}

/// `([t], Number) -> t`.
fn element_scheme() -> TypeScheme {
    let mut b = SchemeBuilder::new();
    let t = b.type_var();
    b.build(vec![TypeTerm::list(t.clone()), TypeTerm::SCALAR], t)
}

/// `([t], t -> Boolean) -> Boolean`.
fn predicate_scheme() -> TypeScheme {
    let mut b = SchemeBuilder::new();
    let t = b.type_var();
    b.build(
        vec![
            TypeTerm::list(t.clone()),
            TypeTerm::function(vec![t], TypeTerm::Boolean),
        ],
        TypeTerm::Boolean,
    )
}

/// `([t], t -> r) -> [r]`.
fn map_scheme() -> TypeScheme {
    let mut b = SchemeBuilder::new();
    let (t, r) = (b.type_var(), b.type_var());
    b.build(
        vec![TypeTerm::list(t.clone()), TypeTerm::function(vec![t], r.clone())],
        TypeTerm::list(r),
    )
}

/// `([t], t -> Boolean) -> [t]`.
fn filter_scheme() -> TypeScheme {
    let mut b = SchemeBuilder::new();
    let t = b.type_var();
    b.build(
        vec![
            TypeTerm::list(t.clone()),
            TypeTerm::function(vec![t.clone()], TypeTerm::Boolean),
        ],
        TypeTerm::list(t),
    )
}

fn count(args: &[Value]) -> EvalResult<Value> {
    let len = list(args, 0)?.len();
    Ok(Value::Number(Number::from(i64::try_from(len).unwrap_or(i64::MAX))))
}

/// `element(list, n)` is the `n`th item, counting from 1.
fn element(args: &[Value]) -> EvalResult<Value> {
    let items = list(args, 0)?;
    let n = number(args, 1)?
        .as_i64()
        .ok_or_else(|| UserError::function("element", "the index must be a whole number"))?;
    let out_of_range = || UserError::IndexOutOfRange {
        index: n,
        len: items.len(),
    };
    let index = n
        .checked_sub(1)
        .and_then(|i| usize::try_from(i).ok())
        .ok_or_else(out_of_range)?;
    match items.get(index) {
        Some(item) => item,
        None => Err(out_of_range().into()),
    }
}

#[derive(Copy, Clone)]
enum Quantifier {
    Any,
    All,
    None,
}

/// Stops at the first item that decides the answer.
fn quantify(args: &[Value], quantifier: Quantifier) -> EvalResult<Value> {
    let predicate = function(args, 1)?;
    let items = list(args, 0)?;
    for index in 0..items.len() {
        let Some(item) = items.get(index) else { break };
        let holds = test(predicate, item?)?;
        match (quantifier, holds) {
            (Quantifier::Any, true) => return Ok(Value::Boolean(true)),
            (Quantifier::All, false) | (Quantifier::None, true) => {
                return Ok(Value::Boolean(false))
            }
            _ => {}
        }
    }
    Ok(Value::Boolean(matches!(
        quantifier,
        Quantifier::All | Quantifier::None
    )))
}

fn map(args: &[Value]) -> EvalResult<Value> {
    let transform = function(args, 1)?;
    let items = list(args, 0)?.to_vec()?;
    let mapped = items
        .into_iter()
        .map(|item| transform.call(&[item]))
        .collect::<EvalResult<Vec<_>>>()?;
    Ok(Value::list(mapped))
}

fn filter(args: &[Value]) -> EvalResult<Value> {
    let predicate = function(args, 1)?;
    let mut kept = Vec::new();
    for item in list(args, 0)?.to_vec()? {
        if test(predicate, item.clone())? {
            kept.push(item);
        }
    }
    Ok(Value::list(kept))
}
