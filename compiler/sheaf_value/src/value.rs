//! Runtime values.
//!
//! Values are immutable and cheap to clone: composite values share their
//! contents through `Arc`, so one value can be read from many rows being
//! evaluated in parallel.

use std::cmp::Ordering;
use std::collections::BTreeMap;
use std::fmt;
use std::sync::Arc;

use sheaf_types::{DataType, Unit};

use crate::{EvalError, Number, Temporal};

/// A function value: a closure over its arguments.
pub type NativeFn = dyn Fn(&[Value]) -> Result<Value, EvalError> + Send + Sync;

#[derive(Clone)]
pub enum Value {
    Number(Number),
    Text(Arc<str>),
    Boolean(bool),
    Temporal(Temporal),
    /// A tag of a tagged type, with its payload if the tag has one.
    Tagged(Arc<TaggedValue>),
    Tuple(Arc<[Value]>),
    Record(Arc<BTreeMap<String, Value>>),
    List(ListValue),
    Function(FunctionValue),
    /// The value of a type literal.
    Type(Arc<DataType>),
    /// The value of a unit literal.
    Unit(Arc<Unit>),
}

#[derive(Clone, Debug)]
pub struct TaggedValue {
    pub type_name: String,
    pub tag: String,
    /// Position of the tag in its type's declaration; tags order by it.
    pub index: usize,
    pub payload: Option<Value>,
}

impl Value {
    #[inline]
    pub fn number(n: impl Into<Number>) -> Self {
        Value::Number(n.into())
    }

    #[inline]
    pub fn text(s: impl AsRef<str>) -> Self {
        Value::Text(Arc::from(s.as_ref()))
    }

    pub fn tuple(items: Vec<Value>) -> Self {
        Value::Tuple(Arc::from(items))
    }

    pub fn record(fields: impl IntoIterator<Item = (String, Value)>) -> Self {
        Value::Record(Arc::new(fields.into_iter().collect()))
    }

    pub fn list(items: Vec<Value>) -> Self {
        Value::List(ListValue::from_vec(items))
    }

    pub fn tagged(type_name: &str, tag: &str, index: usize, payload: Option<Value>) -> Self {
        Value::Tagged(Arc::new(TaggedValue {
            type_name: type_name.to_owned(),
            tag: tag.to_owned(),
            index,
            payload,
        }))
    }

    /// `Is(value)` of `Optional`.
    pub fn some(value: Value) -> Self {
        Value::tagged(
            sheaf_types::builtin::OPTIONAL,
            sheaf_types::builtin::IS,
            1,
            Some(value),
        )
    }

    /// `None` of `Optional`.
    pub fn none() -> Self {
        Value::tagged(sheaf_types::builtin::OPTIONAL, sheaf_types::builtin::NONE, 0, None)
    }

    pub fn as_number(&self) -> Option<Number> {
        match self {
            Value::Number(n) => Some(*n),
            _ => None,
        }
    }

    pub fn as_bool(&self) -> Option<bool> {
        match self {
            Value::Boolean(b) => Some(*b),
            _ => None,
        }
    }

    pub fn as_text(&self) -> Option<&str> {
        match self {
            Value::Text(s) => Some(s.as_ref()),
            _ => None,
        }
    }

    pub fn as_list(&self) -> Option<&ListValue> {
        match self {
            Value::List(l) => Some(l),
            _ => None,
        }
    }

    pub fn as_function(&self) -> Option<&FunctionValue> {
        match self {
            Value::Function(f) => Some(f),
            _ => None,
        }
    }

    /// Name of the value's kind, for error messages.
    pub fn kind_name(&self) -> &'static str {
        match self {
            Value::Number(_) => "number",
            Value::Text(_) => "text",
            Value::Boolean(_) => "boolean",
            Value::Temporal(_) => "date/time",
            Value::Tagged(_) => "tagged value",
            Value::Tuple(_) => "tuple",
            Value::Record(_) => "record",
            Value::List(_) => "list",
            Value::Function(_) => "function",
            Value::Type(_) => "type",
            Value::Unit(_) => "unit",
        }
    }

    /// Structural equality. Lazy lists are forced; a failure reading them
    /// is returned.
    pub fn equals(&self, other: &Value) -> Result<bool, EvalError> {
        Ok(match (self, other) {
            (Value::Number(a), Value::Number(b)) => a == b,
            (Value::Text(a), Value::Text(b)) => a == b,
            (Value::Boolean(a), Value::Boolean(b)) => a == b,
            (Value::Temporal(a), Value::Temporal(b)) => a.compare(b) == Some(Ordering::Equal),
            (Value::Tagged(a), Value::Tagged(b)) => {
                if a.type_name != b.type_name || a.index != b.index {
                    return Ok(false);
                }
                match (&a.payload, &b.payload) {
                    (Some(x), Some(y)) => x.equals(y)?,
                    (None, None) => true,
                    _ => false,
                }
            }
            (Value::Tuple(a), Value::Tuple(b)) => all_equal(a.iter(), b.iter(), a.len(), b.len())?,
            (Value::Record(a), Value::Record(b)) => {
                a.keys().eq(b.keys()) && all_equal(a.values(), b.values(), a.len(), b.len())?
            }
            (Value::List(a), Value::List(b)) => {
                if a.len() != b.len() {
                    return Ok(false);
                }
                let (a, b) = (a.to_vec()?, b.to_vec()?);
                all_equal(a.iter(), b.iter(), a.len(), b.len())?
            }
            (Value::Function(a), Value::Function(b)) => a.ptr_eq(b),
            (Value::Type(a), Value::Type(b)) => a == b,
            (Value::Unit(a), Value::Unit(b)) => a == b,
            _ => false,
        })
    }

    /// Ordering for comparable values; `None` when the values do not order.
    pub fn compare(&self, other: &Value) -> Result<Option<Ordering>, EvalError> {
        Ok(match (self, other) {
            (Value::Number(a), Value::Number(b)) => Some(a.cmp(b)),
            (Value::Text(a), Value::Text(b)) => Some(a.cmp(b)),
            (Value::Boolean(a), Value::Boolean(b)) => Some(a.cmp(b)),
            (Value::Temporal(a), Value::Temporal(b)) => a.compare(b),
            (Value::Tagged(a), Value::Tagged(b)) => match a.index.cmp(&b.index) {
                Ordering::Equal => match (&a.payload, &b.payload) {
                    (Some(x), Some(y)) => x.compare(y)?,
                    _ => Some(Ordering::Equal),
                },
                other => Some(other),
            },
            (Value::Tuple(a), Value::Tuple(b)) => compare_seq(a, b)?,
            (Value::Record(a), Value::Record(b)) => {
                let a: Vec<Value> = a.values().cloned().collect();
                let b: Vec<Value> = b.values().cloned().collect();
                compare_seq(&a, &b)?
            }
            (Value::List(a), Value::List(b)) => compare_seq(&a.to_vec()?, &b.to_vec()?)?,
            _ => None,
        })
    }
}

fn all_equal<'a>(
    a: impl Iterator<Item = &'a Value>,
    b: impl Iterator<Item = &'a Value>,
    len_a: usize,
    len_b: usize,
) -> Result<bool, EvalError> {
    if len_a != len_b {
        return Ok(false);
    }
    for (x, y) in a.zip(b) {
        if !x.equals(y)? {
            return Ok(false);
        }
    }
    Ok(true)
}

fn compare_seq(a: &[Value], b: &[Value]) -> Result<Option<Ordering>, EvalError> {
    for (x, y) in a.iter().zip(b) {
        match x.compare(y)? {
            Some(Ordering::Equal) => {}
            other => return Ok(other),
        }
    }
    Ok(Some(a.len().cmp(&b.len())))
}

// ========================================
// Lists
// ========================================

/// Produces the element at an index of a lazy list.
pub type ElementFn = dyn Fn(usize) -> Result<Value, EvalError> + Send + Sync;

/// A list, either held in memory or computed element by element (the
/// cells of a whole column).
#[derive(Clone)]
pub enum ListValue {
    Items(Arc<[Value]>),
    Lazy { len: usize, element: Arc<ElementFn> },
}

impl ListValue {
    pub fn from_vec(items: Vec<Value>) -> Self {
        ListValue::Items(Arc::from(items))
    }

    pub fn lazy(
        len: usize,
        element: impl Fn(usize) -> Result<Value, EvalError> + Send + Sync + 'static,
    ) -> Self {
        ListValue::Lazy {
            len,
            element: Arc::new(element),
        }
    }

    pub fn len(&self) -> usize {
        match self {
            ListValue::Items(items) => items.len(),
            ListValue::Lazy { len, .. } => *len,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Element `index`, or `None` past the end.
    pub fn get(&self, index: usize) -> Option<Result<Value, EvalError>> {
        if index >= self.len() {
            return None;
        }
        Some(match self {
            ListValue::Items(items) => Ok(items[index].clone()),
            ListValue::Lazy { element, .. } => element(index),
        })
    }

    /// All elements, forcing a lazy list.
    pub fn to_vec(&self) -> Result<Vec<Value>, EvalError> {
        match self {
            ListValue::Items(items) => Ok(items.to_vec()),
            ListValue::Lazy { len, element } => (0..*len).map(|i| element(i)).collect(),
        }
    }
}

impl fmt::Debug for ListValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ListValue::Items(items) => f.debug_list().entries(items.iter()).finish(),
            ListValue::Lazy { len, .. } => write!(f, "<lazy list of {len}>"),
        }
    }
}

// ========================================
// Functions
// ========================================

/// A callable value: a lambda or a standard function instance.
#[derive(Clone)]
pub struct FunctionValue {
    name: Arc<str>,
    arity: usize,
    body: Arc<NativeFn>,
}

impl FunctionValue {
    pub fn new(
        name: &str,
        arity: usize,
        body: impl Fn(&[Value]) -> Result<Value, EvalError> + Send + Sync + 'static,
    ) -> Self {
        FunctionValue {
            name: Arc::from(name),
            arity,
            body: Arc::new(body),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn arity(&self) -> usize {
        self.arity
    }

    /// Call with `args`. A wrong argument count means the checker let an
    /// ill-typed call through, which is an internal error.
    pub fn call(&self, args: &[Value]) -> Result<Value, EvalError> {
        if args.len() != self.arity {
            return Err(EvalError::internal(format!(
                "`{}` takes {} arguments but was called with {}",
                self.name,
                self.arity,
                args.len()
            )));
        }
        (self.body)(args)
    }

    pub fn ptr_eq(&self, other: &FunctionValue) -> bool {
        Arc::ptr_eq(&self.body, &other.body)
    }
}

impl fmt::Debug for FunctionValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FunctionValue")
            .field("name", &self.name)
            .field("arity", &self.arity)
            .finish_non_exhaustive()
    }
}

// ========================================
// Formatting
// ========================================

impl fmt::Debug for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::List(l) => write!(f, "List({l:?})"),
            Value::Function(func) => write!(f, "{func:?}"),
            other => write!(f, "{other}"),
        }
    }
}

/// Literal-like rendering: `"text"`, `[1, 2]`, `(a: 1)`, `Is(3)`.
impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Number(n) => write!(f, "{n}"),
            Value::Text(s) => write!(f, "\"{}\"", s.replace('\\', "\\\\").replace('"', "\\\"")),
            Value::Boolean(b) => write!(f, "{b}"),
            Value::Temporal(t) => write!(f, "{t}"),
            Value::Tagged(t) => match &t.payload {
                Some(p) => write!(f, "{}({p})", t.tag),
                None => write!(f, "{}", t.tag),
            },
            Value::Tuple(items) => {
                write!(f, "(")?;
                write_items(f, items.iter())?;
                write!(f, ")")
            }
            Value::Record(fields) => {
                write!(f, "(")?;
                for (i, (name, value)) in fields.iter().enumerate() {
                    if i > 0 {
                        write!(f, ", ")?;
                    }
                    write!(f, "{name}: {value}")?;
                }
                write!(f, ")")
            }
            Value::List(list) => {
                write!(f, "[")?;
                match list.to_vec() {
                    Ok(items) => write_items(f, items.iter())?,
                    Err(_) => write!(f, "<error>")?,
                }
                write!(f, "]")
            }
            Value::Function(func) => write!(f, "<function {}>", func.name()),
            Value::Type(t) => write!(f, "type{{{t}}}"),
            Value::Unit(u) => write!(f, "{{{u}}}"),
        }
    }
}

fn write_items<'a>(
    f: &mut fmt::Formatter<'_>,
    items: impl Iterator<Item = &'a Value>,
) -> fmt::Result {
    for (i, item) in items.enumerate() {
        if i > 0 {
            write!(f, ", ")?;
        }
        write!(f, "{item}")?;
    }
    Ok(())
}

#[cfg(test)]
#[expect(clippy::unwrap_used, reason = "Tests use unwrap for brevity")]
mod tests;
