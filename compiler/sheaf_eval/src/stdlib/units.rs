//! Unit conversion.

use sheaf_types::{DataType, DataTypeArg, SchemeBuilder, TypeScheme, TypeTerm, Unit};
use sheaf_value::{CallSite, FunctionValue, InstantiateError, Number, Value};

use super::{number, StandardLibrary};

pub(super) fn register(library: &mut StandardLibrary) {
    library.per_site("convert unit", convert_scheme(), convert);
    library.fixed("strip units", strip_scheme(), |args| {
        Ok(Value::Number(number(args, 0)?))
    });
}

/// `(Unit(to), Number{from}) -> Number{to}`.
fn convert_scheme() -> TypeScheme {
    let mut b = SchemeBuilder::new();
    let (to, from) = (b.unit_var(), b.unit_var());
    b.build(
        vec![TypeTerm::unit_of(to.clone()), TypeTerm::Number(from)],
        TypeTerm::Number(to),
    )
}

/// `Number{u} -> Number`.
fn strip_scheme() -> TypeScheme {
    let mut b = SchemeBuilder::new();
    let number = TypeTerm::Number(b.unit_var());
    b.build(vec![number], TypeTerm::SCALAR)
}

/// The conversion factor is worked out once per call site; units whose
/// base dimensions differ are rejected there.
fn convert(site: &CallSite<'_>) -> Result<FunctionValue, InstantiateError> {
    let to = match site.param(0) {
        Some(DataType::Tagged { args, .. }) => match args.first() {
            Some(DataTypeArg::Unit(unit)) => unit,
            _ => return Err(InstantiateError("expected a unit literal".to_owned())),
        },
        _ => return Err(InstantiateError("the target unit must be known".to_owned())),
    };
    let from: &Unit = match site.param(1) {
        Some(DataType::Number(unit)) => unit,
        _ => return Err(InstantiateError("the unit to convert from must be known".to_owned())),
    };
    let factor = site
        .units
        .conversion_factor(from, to)
        .map_err(|err| InstantiateError(err.to_string()))?;
    let factor = Number::from_f64(factor);
    Ok(FunctionValue::new("convert unit", 2, move |args| {
        Ok(Value::Number(number(args, 1)?.times(factor)))
    }))
}
