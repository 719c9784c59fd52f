//! Text functions and conversions between text and other values.

use sheaf_types::{DataType, DataTypeArg, SchemeBuilder, TypeScheme, TypeTerm};
use sheaf_value::{CallSite, EvalResult, FunctionValue, InstantiateError, Number, Temporal, Value};

use super::{arg, text, StandardLibrary};

pub(super) fn register(library: &mut StandardLibrary) {
    library.fixed("text length", text_length_scheme(), |args| {
        let len = text(args, 0)?.chars().count();
        Ok(Value::Number(Number::from(i64::try_from(len).unwrap_or(i64::MAX))))
    });
    library.fixed("upper case", text_scheme(), |args| {
        Ok(Value::text(text(args, 0)?.to_uppercase()))
    });
    library.fixed("lower case", text_scheme(), |args| {
        Ok(Value::text(text(args, 0)?.to_lowercase()))
    });
    library.fixed("trim", text_scheme(), |args| Ok(Value::text(text(args, 0)?.trim())));
    library.fixed("to text", to_text_scheme(), to_text);
    library.per_site("from text to", from_text_scheme(), from_text);
}

fn text_scheme() -> TypeScheme {
    TypeScheme::monomorphic(vec![TypeTerm::Text], TypeTerm::Text)
}

fn text_length_scheme() -> TypeScheme {
    TypeScheme::monomorphic(vec![TypeTerm::Text], TypeTerm::SCALAR)
}

/// `t -> Text`.
fn to_text_scheme() -> TypeScheme {
    let mut b = SchemeBuilder::new();
    let t = b.type_var();
    b.build(vec![t], TypeTerm::Text)
}

/// `(Type(t), Text) -> Optional(t)`.
fn from_text_scheme() -> TypeScheme {
    let mut b = SchemeBuilder::new();
    let t = b.type_var();
    b.build(
        vec![TypeTerm::type_of(t.clone()), TypeTerm::Text],
        TypeTerm::optional(t),
    )
}

/// Text is returned as it is; anything else as it would be written in a
/// formula.
fn to_text(args: &[Value]) -> EvalResult<Value> {
    let value = arg(args, 0)?;
    Ok(match value {
        Value::Text(_) => value.clone(),
        Value::Temporal(t) => Value::text(t.content()),
        other => Value::text(other.to_string()),
    })
}

/// What `from text to` can read, decided by the type literal at the call
/// site.
#[derive(Clone, Copy)]
enum Target {
    Number,
    Text,
    Boolean,
    Temporal(sheaf_ir::TemporalKind),
}

fn from_text(site: &CallSite<'_>) -> Result<FunctionValue, InstantiateError> {
    let target = match site.param(0) {
        Some(DataType::Tagged { args, .. }) => match args.first() {
            Some(DataTypeArg::Type(DataType::Number(_))) => Target::Number,
            Some(DataTypeArg::Type(DataType::Text)) => Target::Text,
            Some(DataTypeArg::Type(DataType::Boolean)) => Target::Boolean,
            Some(DataTypeArg::Type(DataType::Temporal(kind))) => Target::Temporal(*kind),
            Some(DataTypeArg::Type(other)) => {
                return Err(InstantiateError(format!("cannot read a {other} from text")))
            }
            _ => return Err(InstantiateError("expected a type literal".to_owned())),
        },
        _ => return Err(InstantiateError("the target type must be known".to_owned())),
    };
    Ok(FunctionValue::new("from text to", 2, move |args| {
        let input = text(args, 1)?;
        let read = match target {
            Target::Number => Number::parse(input).map(Value::Number),
            Target::Text => Some(Value::text(input)),
            Target::Boolean => match input.trim() {
                "true" => Some(Value::Boolean(true)),
                "false" => Some(Value::Boolean(false)),
                _ => None,
            },
            Target::Temporal(kind) => Temporal::parse(kind, input).ok().map(Value::Temporal),
        };
        Ok(read.map_or_else(Value::none, Value::some))
    }))
}
