//! Errors from unification, environments and registries.

use std::fmt;

use crate::{TypeTerm, Unit, UnitExponents};

/// Error from type unification.
#[derive(Clone, Debug, Eq, PartialEq, thiserror::Error)]
pub enum TypeError {
    #[error("expected {expected} but found {found}")]
    Mismatch { expected: TypeTerm, found: TypeTerm },

    #[error(transparent)]
    Unit(#[from] UnitMismatch),

    /// Occurs check failed.
    #[error("{ty} would have to contain itself")]
    Infinite { ty: TypeTerm },

    #[error("expected {expected} {kind} but found {found}")]
    Arity {
        kind: ArityKind,
        expected: usize,
        found: usize,
    },

    #[error("{record} has no field `{field}`")]
    MissingField { field: String, record: TypeTerm },

    #[error("{ty} cannot be {requirement}")]
    NotInClass {
        ty: TypeTerm,
        requirement: &'static str,
    },
}

/// Two units that could not be made equal.
#[derive(Clone, Debug, Eq, PartialEq, thiserror::Error)]
#[error("units do not match: {expected} and {found}")]
pub struct UnitMismatch {
    pub expected: UnitExponents,
    pub found: UnitExponents,
}

/// What kind of thing has the wrong number of parts.
#[derive(Copy, Clone, Debug, Eq, PartialEq, Hash)]
pub enum ArityKind {
    Tuple,
    Function,
    TypeArgs,
}

impl fmt::Display for ArityKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ArityKind::Tuple => write!(f, "tuple items"),
            ArityKind::Function => write!(f, "arguments"),
            ArityKind::TypeArgs => write!(f, "type arguments"),
        }
    }
}

/// A term could not be turned into a concrete type.
#[derive(Clone, Debug, Eq, PartialEq, thiserror::Error)]
pub enum ConcreteError {
    #[error("could not work out the type: {ty}")]
    Unresolved { ty: TypeTerm },

    #[error("could not work out the unit: {unit}")]
    UnresolvedUnit { unit: UnitExponents },

    /// A tagged type whose arguments are still unknown, e.g. a bare `None`.
    #[error("ambiguous type {ty}: add a type annotation")]
    Ambiguous { ty: TypeTerm },
}

#[derive(Clone, Debug, Eq, PartialEq, thiserror::Error)]
#[error("variable `{0}` is already defined")]
pub struct DuplicateVariable(pub String);

/// Alternatives of one match clause did not bind the same variables.
#[derive(Clone, Debug, Eq, PartialEq, thiserror::Error)]
pub enum IntersectError {
    #[error("variable `{name}` must be defined in every alternative")]
    OnlyInSome { name: String },

    #[error("variable `{name}` has different types in different alternatives: {source}")]
    Mismatch { name: String, source: TypeError },
}

#[derive(Clone, Debug, Eq, PartialEq, thiserror::Error)]
pub enum UnitError {
    #[error("unknown unit `{name}`")]
    Unknown {
        name: String,
        suggestions: Vec<String>,
    },

    #[error("unit `{0}` is already declared")]
    Duplicate(String),

    #[error("invalid unit `{0}`")]
    Invalid(String),

    #[error("cannot convert {from} to {to}")]
    Incompatible { from: Unit, to: Unit },
}

/// Error resolving written type syntax.
#[derive(Clone, Debug, Eq, PartialEq, thiserror::Error)]
pub enum TypeExprError {
    #[error("unknown type `{name}`")]
    UnknownType {
        name: String,
        suggestions: Vec<String>,
    },

    #[error("type `{0}` is already defined")]
    Duplicate(String),

    #[error("`{name}` takes {expected} type arguments but {found} were given")]
    Arity {
        name: String,
        expected: usize,
        found: usize,
    },

    #[error("argument {index} of `{name}` must be a {expected}")]
    ArgKind {
        name: String,
        index: usize,
        expected: &'static str,
    },

    #[error(transparent)]
    Unit(#[from] UnitError),

    #[error("invalid type `{0}`")]
    Invalid(String),
}
