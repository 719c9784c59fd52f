//! Type syntax as written inside `type{...}` and in `::` annotations.

use crate::UnitExpr;

/// The five temporal value kinds.
#[derive(Copy, Clone, Eq, PartialEq, Ord, PartialOrd, Hash, Debug)]
pub enum TemporalKind {
    /// Calendar date, `date{2021-03-04}`.
    Date,
    /// Year and month, `dateym{2021-03}`.
    YearMonth,
    /// Time of day, `time{12:30}`.
    Time,
    /// Local date and time, `datetime{2021-03-04 12:30}`.
    DateTime,
    /// Date and time with a UTC offset, `datetimezoned{2021-03-04 12:30 +01:00}`.
    DateTimeZoned,
}

impl TemporalKind {
    pub const ALL: [TemporalKind; 5] = [
        TemporalKind::Date,
        TemporalKind::YearMonth,
        TemporalKind::Time,
        TemporalKind::DateTime,
        TemporalKind::DateTimeZoned,
    ];

    /// Literal prefix, as in `date{...}`.
    pub const fn literal_keyword(self) -> &'static str {
        match self {
            TemporalKind::Date => "date",
            TemporalKind::YearMonth => "dateym",
            TemporalKind::Time => "time",
            TemporalKind::DateTime => "datetime",
            TemporalKind::DateTimeZoned => "datetimezoned",
        }
    }

    /// Name used in type expressions, as in `type{Date}`.
    pub const fn type_name(self) -> &'static str {
        match self {
            TemporalKind::Date => "Date",
            TemporalKind::YearMonth => "DateYM",
            TemporalKind::Time => "Time",
            TemporalKind::DateTime => "DateTime",
            TemporalKind::DateTimeZoned => "DateTimeZoned",
        }
    }

    pub fn from_literal_keyword(keyword: &str) -> Option<Self> {
        Self::ALL
            .into_iter()
            .find(|kind| kind.literal_keyword() == keyword)
    }

    pub fn from_type_name(name: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|kind| kind.type_name() == name)
    }
}

/// A type as written by the user.
#[derive(Clone, Eq, PartialEq, Hash, Debug)]
pub enum TypeExpr {
    /// `Number` or `Number{unit}`.
    Number(Option<UnitExpr>),
    Text,
    Boolean,
    Temporal(TemporalKind),
    /// `[element]`.
    List(Box<TypeExpr>),
    /// `(a, b)`.
    Tuple(Vec<TypeExpr>),
    /// `(name: a, other: b)`.
    Record(Vec<(String, TypeExpr)>),
    /// `Optional(Number)`, or a bare `Shape` when there are no arguments.
    Tagged { name: String, args: Vec<TypeArgExpr> },
    /// Text that could not be read as a type.
    Invalid(String),
}

/// Argument of a tagged type: either a type or a unit (written `{u}`).
#[derive(Clone, Eq, PartialEq, Hash, Debug)]
pub enum TypeArgExpr {
    Type(TypeExpr),
    Unit(UnitExpr),
}
