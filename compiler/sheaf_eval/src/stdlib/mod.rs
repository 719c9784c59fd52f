//! Built-in functions callable from formulas.
//!
//! Each function has a [`TypeScheme`] whose type and unit variables are
//! renamed at every call site, so `abs` works for any unit and `map` for
//! any element type. Most functions behave the same at every call site; a
//! few (`convert unit`, `from text to`) are built from the settled types of
//! their call site, which is where a unit conversion factor or a target
//! type is decided.
//!
//! Argument helpers below treat a value of the wrong kind as an internal
//! error: the checker already matched every argument to the signature.

mod lists;
mod numeric;
mod optional;
mod temporal;
mod text;
mod units;

use std::sync::Arc;

use chrono::NaiveDate;
use rustc_hash::FxHashMap;
use sheaf_types::TypeScheme;
use sheaf_value::{
    CallSite, EvalError, EvalResult, FunctionDefinition, FunctionLookup, FunctionValue,
    InstantiateError, ListValue, Number, Value,
};

use crate::errors::expected;

type Body = fn(&[Value]) -> EvalResult<Value>;
type Build = fn(&CallSite<'_>) -> Result<FunctionValue, InstantiateError>;

enum Instance {
    /// The same callable at every call site.
    Fixed(Body),
    /// Built from the types settled at the call site.
    PerSite(Build),
}

/// One built-in function.
struct Builtin {
    name: &'static str,
    scheme: TypeScheme,
    instance: Instance,
}

impl FunctionDefinition for Builtin {
    fn name(&self) -> &str {
        self.name
    }

    fn scheme(&self) -> &TypeScheme {
        &self.scheme
    }

    fn instantiate(&self, site: &CallSite<'_>) -> Result<FunctionValue, InstantiateError> {
        match self.instance {
            Instance::Fixed(body) => Ok(FunctionValue::new(self.name, self.scheme.arity(), body)),
            Instance::PerSite(build) => build(site),
        }
    }
}

/// The built-in functions, looked up by name.
pub struct StandardLibrary {
    functions: FxHashMap<&'static str, Arc<dyn FunctionDefinition>>,
    /// Registration order, for stable suggestions.
    names: Vec<&'static str>,
}

impl StandardLibrary {
    pub fn new() -> Self {
        let mut library = StandardLibrary {
            functions: FxHashMap::default(),
            names: Vec::new(),
        };
        numeric::register(&mut library);
        lists::register(&mut library);
        text::register(&mut library);
        temporal::register(&mut library);
        units::register(&mut library);
        optional::register(&mut library);
        library
    }

    fn fixed(&mut self, name: &'static str, scheme: TypeScheme, body: Body) {
        self.add(Builtin {
            name,
            scheme,
            instance: Instance::Fixed(body),
        });
    }

    fn per_site(&mut self, name: &'static str, scheme: TypeScheme, build: Build) {
        self.add(Builtin {
            name,
            scheme,
            instance: Instance::PerSite(build),
        });
    }

    fn add(&mut self, builtin: Builtin) {
        let name = builtin.name;
        if self.functions.insert(name, Arc::new(builtin)).is_none() {
            self.names.push(name);
        }
    }

    pub fn len(&self) -> usize {
        self.names.len()
    }

    pub fn is_empty(&self) -> bool {
        self.names.is_empty()
    }
}

impl Default for StandardLibrary {
    fn default() -> Self {
        Self::new()
    }
}

impl FunctionLookup for StandardLibrary {
    fn lookup(&self, name: &str) -> Option<Arc<dyn FunctionDefinition>> {
        self.functions.get(name).cloned()
    }

    fn names(&self) -> Vec<&str> {
        self.names.clone()
    }
}

// ========================================
// Argument helpers
// ========================================

fn arg(args: &[Value], index: usize) -> EvalResult<&Value> {
    args.get(index)
        .ok_or_else(|| EvalError::internal(format!("missing argument {}", index + 1)))
}

fn number(args: &[Value], index: usize) -> EvalResult<Number> {
    number_value(arg(args, index)?)
}

fn number_value(value: &Value) -> EvalResult<Number> {
    value.as_number().ok_or_else(|| expected("a number", value))
}

fn text(args: &[Value], index: usize) -> EvalResult<&str> {
    let value = arg(args, index)?;
    value.as_text().ok_or_else(|| expected("text", value))
}

fn list(args: &[Value], index: usize) -> EvalResult<&ListValue> {
    let value = arg(args, index)?;
    value.as_list().ok_or_else(|| expected("a list", value))
}

fn function(args: &[Value], index: usize) -> EvalResult<&FunctionValue> {
    let value = arg(args, index)?;
    value.as_function().ok_or_else(|| expected("a function", value))
}

fn date(args: &[Value], index: usize) -> EvalResult<NaiveDate> {
    let value = arg(args, index)?;
    match value {
        Value::Temporal(t) => t.date().ok_or_else(|| expected("a date", value)),
        _ => Err(expected("a date", value)),
    }
}

/// Call a predicate, which the checker typed to return a boolean.
fn test(predicate: &FunctionValue, item: Value) -> EvalResult<bool> {
    let result = predicate.call(&[item])?;
    result.as_bool().ok_or_else(|| expected("a boolean", &result))
}
