//! Date functions.

use chrono::{Datelike, NaiveDate};
use sheaf_ir::TemporalKind;
use sheaf_types::{TypeScheme, TypeTerm};
use sheaf_value::{EvalResult, Number, Temporal, UserError, Value};

use super::{date, number, StandardLibrary};

pub(super) fn register(library: &mut StandardLibrary) {
    library.fixed("year", part_scheme(), |args| {
        Ok(Value::Number(Number::from(i64::from(date(args, 0)?.year()))))
    });
    library.fixed("month", part_scheme(), |args| {
        Ok(Value::Number(Number::from(i64::from(date(args, 0)?.month()))))
    });
    library.fixed("day", part_scheme(), |args| {
        Ok(Value::Number(Number::from(i64::from(date(args, 0)?.day()))))
    });
    library.fixed(
        "date from ymd",
        TypeScheme::monomorphic(
            vec![TypeTerm::SCALAR, TypeTerm::SCALAR, TypeTerm::SCALAR],
            date_type(),
        ),
        date_from_ymd,
    );
    library.fixed(
        "days between",
        TypeScheme::monomorphic(vec![date_type(), date_type()], TypeTerm::SCALAR),
        |args| {
            let days = (date(args, 1)? - date(args, 0)?).num_days();
            Ok(Value::Number(Number::from(days)))
        },
    );
}

fn date_type() -> TypeTerm {
    TypeTerm::Temporal(TemporalKind::Date)
}

/// `Date -> Number`.
fn part_scheme() -> TypeScheme {
    TypeScheme::monomorphic(vec![date_type()], TypeTerm::SCALAR)
}

fn date_from_ymd(args: &[Value]) -> EvalResult<Value> {
    let part = |index: usize| -> EvalResult<Option<i64>> { Ok(number(args, index)?.as_i64()) };
    let (year, month, day) = (part(0)?, part(1)?, part(2)?);
    let date = year
        .and_then(|y| i32::try_from(y).ok())
        .zip(month.and_then(|m| u32::try_from(m).ok()))
        .zip(day.and_then(|d| u32::try_from(d).ok()))
        .and_then(|((y, m), d)| NaiveDate::from_ymd_opt(y, m, d))
        .ok_or_else(|| {
            UserError::function(
                "date from ymd",
                format!(
                    "{}-{}-{} is not a date",
                    display_part(year),
                    display_part(month),
                    display_part(day)
                ),
            )
        })?;
    Ok(Value::Temporal(Temporal::Date(date)))
}

fn display_part(part: Option<i64>) -> String {
    part.map_or_else(|| "?".to_owned(), |p| p.to_string())
}
