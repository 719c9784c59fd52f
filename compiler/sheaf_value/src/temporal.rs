//! Date and time values.

use std::cmp::Ordering;
use std::fmt;

use chrono::{DateTime, Datelike, FixedOffset, NaiveDate, NaiveDateTime, NaiveTime, Timelike};
use sheaf_ir::TemporalKind;

#[derive(Copy, Clone, Debug, Eq, PartialEq, Hash)]
pub enum Temporal {
    Date(NaiveDate),
    /// Stored as the first day of the month.
    YearMonth(NaiveDate),
    Time(NaiveTime),
    DateTime(NaiveDateTime),
    DateTimeZoned(DateTime<FixedOffset>),
}

#[derive(Clone, Debug, Eq, PartialEq, thiserror::Error)]
#[error("`{content}` is not a valid {}", kind.type_name())]
pub struct TemporalError {
    pub kind: TemporalKind,
    pub content: String,
}

const TIME_FORMATS: [&str; 2] = ["%H:%M:%S%.f", "%H:%M"];
const DATE_TIME_FORMATS: [&str; 2] = ["%Y-%m-%d %H:%M:%S%.f", "%Y-%m-%d %H:%M"];
const ZONED_FORMATS: [&str; 2] = ["%Y-%m-%d %H:%M:%S%.f %:z", "%Y-%m-%d %H:%M %:z"];

impl Temporal {
    /// Parse the content of a temporal literal, e.g. `2021-03-04` for a date.
    pub fn parse(kind: TemporalKind, content: &str) -> Result<Temporal, TemporalError> {
        let text = content.trim();
        let parsed = match kind {
            TemporalKind::Date => NaiveDate::parse_from_str(text, "%Y-%m-%d")
                .ok()
                .map(Temporal::Date),
            TemporalKind::YearMonth => NaiveDate::parse_from_str(&format!("{text}-01"), "%Y-%m-%d")
                .ok()
                .map(Temporal::YearMonth),
            TemporalKind::Time => TIME_FORMATS
                .iter()
                .find_map(|f| NaiveTime::parse_from_str(text, f).ok())
                .map(Temporal::Time),
            TemporalKind::DateTime => DATE_TIME_FORMATS
                .iter()
                .find_map(|f| NaiveDateTime::parse_from_str(text, f).ok())
                .map(Temporal::DateTime),
            TemporalKind::DateTimeZoned => ZONED_FORMATS
                .iter()
                .find_map(|f| DateTime::parse_from_str(text, f).ok())
                .map(Temporal::DateTimeZoned),
        };
        parsed.ok_or_else(|| TemporalError {
            kind,
            content: content.to_owned(),
        })
    }

    pub fn kind(&self) -> TemporalKind {
        match self {
            Temporal::Date(_) => TemporalKind::Date,
            Temporal::YearMonth(_) => TemporalKind::YearMonth,
            Temporal::Time(_) => TemporalKind::Time,
            Temporal::DateTime(_) => TemporalKind::DateTime,
            Temporal::DateTimeZoned(_) => TemporalKind::DateTimeZoned,
        }
    }

    /// The date part, for kinds that have one.
    pub fn date(&self) -> Option<NaiveDate> {
        match self {
            Temporal::Date(d) | Temporal::YearMonth(d) => Some(*d),
            Temporal::Time(_) => None,
            Temporal::DateTime(dt) => Some(dt.date()),
            Temporal::DateTimeZoned(dt) => Some(dt.date_naive()),
        }
    }

    /// Order of two values of the same kind. Zoned values compare as instants.
    pub fn compare(&self, other: &Temporal) -> Option<Ordering> {
        match (self, other) {
            (Temporal::Date(a), Temporal::Date(b))
            | (Temporal::YearMonth(a), Temporal::YearMonth(b)) => Some(a.cmp(b)),
            (Temporal::Time(a), Temporal::Time(b)) => Some(a.cmp(b)),
            (Temporal::DateTime(a), Temporal::DateTime(b)) => Some(a.cmp(b)),
            (Temporal::DateTimeZoned(a), Temporal::DateTimeZoned(b)) => Some(a.cmp(b)),
            _ => None,
        }
    }

    /// Literal content in canonical form, without the keyword and braces.
    pub fn content(&self) -> String {
        match self {
            Temporal::Date(d) => d.format("%Y-%m-%d").to_string(),
            Temporal::YearMonth(d) => format!("{:04}-{:02}", d.year(), d.month()),
            Temporal::Time(t) => format_time(*t),
            Temporal::DateTime(dt) => format!("{} {}", dt.date().format("%Y-%m-%d"), format_time(dt.time())),
            Temporal::DateTimeZoned(dt) => format!(
                "{} {} {}",
                dt.date_naive().format("%Y-%m-%d"),
                format_time(dt.time()),
                dt.offset()
            ),
        }
    }
}

/// `HH:MM`, with seconds and fractions only when present.
fn format_time(t: NaiveTime) -> String {
    if t.nanosecond() != 0 {
        t.format("%H:%M:%S%.f").to_string()
    } else if t.second() != 0 {
        t.format("%H:%M:%S").to_string()
    } else {
        t.format("%H:%M").to_string()
    }
}

impl fmt::Display for Temporal {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{{{}}}", self.kind().literal_keyword(), self.content())
    }
}

#[cfg(test)]
#[expect(clippy::unwrap_used, reason = "Tests use unwrap for brevity")]
mod tests;
