//! Unit syntax as written inside `{...}`.

/// A unit expression as written by the user, before resolution against the
/// unit registry. `{m/s^2}` is `Divide(Single("m"), Raise(Single("s"), 2))`.
#[derive(Clone, Eq, PartialEq, Hash, Debug)]
pub enum UnitExpr {
    /// `1`, the scalar unit.
    One,
    /// A unit name such as `m` or `USD`.
    Single(String),
    /// `a*b*c`.
    Times(Vec<UnitExpr>),
    /// `a/b`.
    Divide(Box<UnitExpr>, Box<UnitExpr>),
    /// `a^n`.
    Raise(Box<UnitExpr>, i32),
    /// Text that could not be read as a unit.
    Invalid(String),
}

impl UnitExpr {
    pub fn single(name: impl Into<String>) -> Self {
        UnitExpr::Single(name.into())
    }

    pub fn divide(num: UnitExpr, den: UnitExpr) -> Self {
        UnitExpr::Divide(Box::new(num), Box::new(den))
    }

    pub fn raise(base: UnitExpr, power: i32) -> Self {
        UnitExpr::Raise(Box::new(base), power)
    }

    /// Whether rendering this unit as an operand of another unit operator
    /// needs brackets.
    pub fn is_compound(&self) -> bool {
        matches!(
            self,
            UnitExpr::Times(_) | UnitExpr::Divide(..) | UnitExpr::Raise(..)
        )
    }
}
