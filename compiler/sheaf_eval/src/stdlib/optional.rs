//! Functions over `Optional(t)`.

use sheaf_types::{builtin, SchemeBuilder, TypeScheme, TypeTerm};
use sheaf_value::{EvalResult, Value};

use super::{arg, StandardLibrary};
use crate::errors::expected;

pub(super) fn register(library: &mut StandardLibrary) {
    library.fixed("get optional", get_scheme(), get_optional);
    library.fixed("is none", is_none_scheme(), |args| {
        Ok(Value::Boolean(payload(arg(args, 0)?)?.is_none()))
    });
}

/// `(Optional(t), t) -> t`.
fn get_scheme() -> TypeScheme {
    let mut b = SchemeBuilder::new();
    let t = b.type_var();
    b.build(vec![TypeTerm::optional(t.clone()), t.clone()], t)
}

/// `Optional(t) -> Boolean`.
fn is_none_scheme() -> TypeScheme {
    let mut b = SchemeBuilder::new();
    let t = b.type_var();
    b.build(vec![TypeTerm::optional(t)], TypeTerm::Boolean)
}

/// The value inside `Is(...)`, or the default for `None`.
fn get_optional(args: &[Value]) -> EvalResult<Value> {
    match payload(arg(args, 0)?)? {
        Some(value) => Ok(value.clone()),
        None => arg(args, 1).cloned(),
    }
}

fn payload(optional: &Value) -> EvalResult<Option<&Value>> {
    match optional {
        Value::Tagged(tagged) if tagged.type_name == builtin::OPTIONAL => {
            Ok(tagged.payload.as_ref())
        }
        other => Err(expected("an optional value", other)),
    }
}
