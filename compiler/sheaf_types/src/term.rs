//! Type terms: types that may still contain variables.

use std::collections::BTreeMap;
use std::fmt;

use bitflags::bitflags;
use rustc_hash::FxHashMap;
use sheaf_ir::TemporalKind;

use crate::type_manager::builtin;
use crate::{UnitTerm, UnitVarId};

/// A type unification variable.
#[derive(Copy, Clone, Eq, PartialEq, Ord, PartialOrd, Hash, Debug)]
pub struct TypeVarId(u32);

impl TypeVarId {
    #[inline]
    pub const fn from_raw(raw: u32) -> Self {
        TypeVarId(raw)
    }

    #[inline]
    pub const fn raw(self) -> u32 {
        self.0
    }
}

/// A variable standing for the unknown remaining fields of a record.
#[derive(Copy, Clone, Eq, PartialEq, Ord, PartialOrd, Hash, Debug)]
pub struct RowVarId(u32);

impl RowVarId {
    #[inline]
    pub const fn from_raw(raw: u32) -> Self {
        RowVarId(raw)
    }
}

bitflags! {
    /// Capabilities a type variable is required to have.
    #[derive(Copy, Clone, Eq, PartialEq, Hash, Debug)]
    pub struct TypeClasses: u8 {
        /// Values can be compared with `=` and matched by value.
        const EQUATABLE = 1 << 0;
        /// Values can be ordered with `<`, `min`, `max`.
        const COMPARABLE = (1 << 1) | Self::EQUATABLE.bits();
    }
}

impl TypeClasses {
    /// What a type lacking these classes cannot be, for messages.
    pub fn requirement(self) -> &'static str {
        if self.contains(TypeClasses::COMPARABLE) {
            "compared or ordered"
        } else {
            "compared for equality"
        }
    }
}

/// A type as seen by the checker.
#[derive(Clone, Eq, PartialEq, Hash, Debug)]
pub enum TypeTerm {
    Number(UnitTerm),
    Text,
    Boolean,
    Temporal(TemporalKind),
    /// A tagged (sum) type applied to its arguments. The tags themselves
    /// live in the [`TypeManager`](crate::TypeManager).
    Tagged {
        name: String,
        args: Vec<TypeArg>,
    },
    Tuple(Vec<TypeTerm>),
    Record(RecordTerm),
    List(Box<TypeTerm>),
    Function(Vec<TypeTerm>, Box<TypeTerm>),
    Var(TypeVarId),
}

/// Argument of a tagged type.
#[derive(Clone, Eq, PartialEq, Hash, Debug)]
pub enum TypeArg {
    Type(TypeTerm),
    Unit(UnitTerm),
}

/// Record fields, plus a row variable when more fields may exist.
///
/// `rest == None` is an exact record: it has these fields and no others.
#[derive(Clone, Eq, PartialEq, Hash, Debug)]
pub struct RecordTerm {
    pub fields: BTreeMap<String, TypeTerm>,
    pub rest: Option<RowVarId>,
}

impl RecordTerm {
    pub fn exact(fields: impl IntoIterator<Item = (String, TypeTerm)>) -> Self {
        RecordTerm {
            fields: fields.into_iter().collect(),
            rest: None,
        }
    }

    pub fn open(fields: impl IntoIterator<Item = (String, TypeTerm)>, rest: RowVarId) -> Self {
        RecordTerm {
            fields: fields.into_iter().collect(),
            rest: Some(rest),
        }
    }

    pub fn is_exact(&self) -> bool {
        self.rest.is_none()
    }
}

impl TypeTerm {
    pub const SCALAR: TypeTerm = TypeTerm::Number(UnitTerm::Scalar);

    pub fn list(element: TypeTerm) -> Self {
        TypeTerm::List(Box::new(element))
    }

    pub fn function(params: Vec<TypeTerm>, ret: TypeTerm) -> Self {
        TypeTerm::Function(params, Box::new(ret))
    }

    pub fn tagged(name: impl Into<String>, args: Vec<TypeArg>) -> Self {
        TypeTerm::Tagged {
            name: name.into(),
            args,
        }
    }

    /// `Optional(inner)`.
    pub fn optional(inner: TypeTerm) -> Self {
        TypeTerm::tagged(builtin::OPTIONAL, vec![TypeArg::Type(inner)])
    }

    /// `Type(inner)`, the type of a type literal.
    pub fn type_of(inner: TypeTerm) -> Self {
        TypeTerm::tagged(builtin::TYPE, vec![TypeArg::Type(inner)])
    }

    /// `Unit(unit)`, the type of a unit literal.
    pub fn unit_of(unit: UnitTerm) -> Self {
        TypeTerm::tagged(builtin::UNIT, vec![TypeArg::Unit(unit)])
    }

    /// Replace variables by the given terms; variables without an entry are
    /// kept. Used to instantiate schemes and tagged type parameters.
    pub fn substitute(
        &self,
        types: &FxHashMap<TypeVarId, TypeTerm>,
        units: &FxHashMap<UnitVarId, UnitTerm>,
    ) -> TypeTerm {
        let go = |t: &TypeTerm| t.substitute(types, units);
        match self {
            TypeTerm::Var(v) => types.get(v).cloned().unwrap_or(TypeTerm::Var(*v)),
            TypeTerm::Number(u) => TypeTerm::Number(substitute_unit(u, units)),
            TypeTerm::Text | TypeTerm::Boolean | TypeTerm::Temporal(_) => self.clone(),
            TypeTerm::Tagged { name, args } => TypeTerm::Tagged {
                name: name.clone(),
                args: args
                    .iter()
                    .map(|arg| match arg {
                        TypeArg::Type(t) => TypeArg::Type(go(t)),
                        TypeArg::Unit(u) => TypeArg::Unit(substitute_unit(u, units)),
                    })
                    .collect(),
            },
            TypeTerm::Tuple(items) => TypeTerm::Tuple(items.iter().map(go).collect()),
            TypeTerm::Record(record) => TypeTerm::Record(RecordTerm {
                fields: record
                    .fields
                    .iter()
                    .map(|(k, t)| (k.clone(), go(t)))
                    .collect(),
                rest: record.rest,
            }),
            TypeTerm::List(element) => TypeTerm::list(go(element)),
            TypeTerm::Function(params, ret) => {
                TypeTerm::function(params.iter().map(go).collect(), go(ret))
            }
        }
    }
}

fn substitute_unit(unit: &UnitTerm, units: &FxHashMap<UnitVarId, UnitTerm>) -> UnitTerm {
    match unit {
        UnitTerm::Var(v) => units.get(v).cloned().unwrap_or(UnitTerm::Var(*v)),
        UnitTerm::Scalar | UnitTerm::Named(_) => unit.clone(),
        UnitTerm::Product(a, b) => substitute_unit(a, units).times(substitute_unit(b, units)),
        UnitTerm::Quotient(a, b) => {
            substitute_unit(a, units).divided_by(substitute_unit(b, units))
        }
        UnitTerm::Power(base, n) => substitute_unit(base, units).raised_to(*n),
    }
}

impl fmt::Display for TypeTerm {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TypeTerm::Number(unit) => {
                let exps = unit.exponents();
                if exps.is_scalar() {
                    write!(f, "Number")
                } else {
                    write!(f, "Number{{{exps}}}")
                }
            }
            TypeTerm::Text => write!(f, "Text"),
            TypeTerm::Boolean => write!(f, "Boolean"),
            TypeTerm::Temporal(kind) => write!(f, "{}", kind.type_name()),
            TypeTerm::Tagged { name, args } => {
                write!(f, "{name}")?;
                if !args.is_empty() {
                    write!(f, "(")?;
                    for (i, arg) in args.iter().enumerate() {
                        if i > 0 {
                            write!(f, ", ")?;
                        }
                        match arg {
                            TypeArg::Type(t) => write!(f, "{t}")?,
                            TypeArg::Unit(u) => write!(f, "{{{u}}}")?,
                        }
                    }
                    write!(f, ")")?;
                }
                Ok(())
            }
            TypeTerm::Tuple(items) => {
                write!(f, "(")?;
                for (i, item) in items.iter().enumerate() {
                    if i > 0 {
                        write!(f, ", ")?;
                    }
                    write!(f, "{item}")?;
                }
                write!(f, ")")
            }
            TypeTerm::Record(record) => {
                write!(f, "(")?;
                for (i, (name, ty)) in record.fields.iter().enumerate() {
                    if i > 0 {
                        write!(f, ", ")?;
                    }
                    write!(f, "{name}: {ty}")?;
                }
                if record.rest.is_some() {
                    if !record.fields.is_empty() {
                        write!(f, ", ")?;
                    }
                    write!(f, "..")?;
                }
                write!(f, ")")
            }
            TypeTerm::List(element) => write!(f, "[{element}]"),
            TypeTerm::Function(params, ret) => {
                write!(f, "@function(")?;
                for (i, param) in params.iter().enumerate() {
                    if i > 0 {
                        write!(f, ", ")?;
                    }
                    write!(f, "{param}")?;
                }
                write!(f, ") -> {ret}")
            }
            TypeTerm::Var(v) => write!(f, "?t{}", v.0),
        }
    }
}
