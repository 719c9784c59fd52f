//! Concrete types: what a checked formula or a column has.

use std::collections::BTreeMap;
use std::fmt;

use sheaf_ir::{TemporalKind, TypeArgExpr, TypeExpr};

use crate::{RecordTerm, TypeArg, TypeTerm, Unit};

/// A type with no variables left.
#[derive(Clone, Eq, PartialEq, Hash, Debug)]
pub enum DataType {
    Number(Unit),
    Text,
    Boolean,
    Temporal(TemporalKind),
    Tagged {
        name: String,
        args: Vec<DataTypeArg>,
    },
    Tuple(Vec<DataType>),
    Record(BTreeMap<String, DataType>),
    List(Box<DataType>),
    Function(Vec<DataType>, Box<DataType>),
}

#[derive(Clone, Eq, PartialEq, Hash, Debug)]
pub enum DataTypeArg {
    Type(DataType),
    Unit(Unit),
}

impl DataType {
    pub const SCALAR: DataType = DataType::Number(Unit::SCALAR);

    pub fn list(element: DataType) -> Self {
        DataType::List(Box::new(element))
    }

    /// The same type as a term, for unifying against checker terms.
    pub fn to_term(&self) -> TypeTerm {
        match self {
            DataType::Number(unit) => TypeTerm::Number(unit.to_term()),
            DataType::Text => TypeTerm::Text,
            DataType::Boolean => TypeTerm::Boolean,
            DataType::Temporal(kind) => TypeTerm::Temporal(*kind),
            DataType::Tagged { name, args } => TypeTerm::Tagged {
                name: name.clone(),
                args: args
                    .iter()
                    .map(|arg| match arg {
                        DataTypeArg::Type(t) => TypeArg::Type(t.to_term()),
                        DataTypeArg::Unit(u) => TypeArg::Unit(u.to_term()),
                    })
                    .collect(),
            },
            DataType::Tuple(items) => TypeTerm::Tuple(items.iter().map(DataType::to_term).collect()),
            DataType::Record(fields) => TypeTerm::Record(RecordTerm::exact(
                fields.iter().map(|(k, t)| (k.clone(), t.to_term())),
            )),
            DataType::List(element) => TypeTerm::list(element.to_term()),
            DataType::Function(params, ret) => TypeTerm::function(
                params.iter().map(DataType::to_term).collect(),
                ret.to_term(),
            ),
        }
    }

    /// Type syntax for this type, as written inside `type{...}`.
    ///
    /// Function types have no syntax; they render as an invalid type.
    pub fn to_type_expr(&self) -> TypeExpr {
        match self {
            DataType::Number(unit) if unit.is_scalar() => TypeExpr::Number(None),
            DataType::Number(unit) => TypeExpr::Number(Some(unit.to_expr())),
            DataType::Text => TypeExpr::Text,
            DataType::Boolean => TypeExpr::Boolean,
            DataType::Temporal(kind) => TypeExpr::Temporal(*kind),
            DataType::Tagged { name, args } => TypeExpr::Tagged {
                name: name.clone(),
                args: args
                    .iter()
                    .map(|arg| match arg {
                        DataTypeArg::Type(t) => TypeArgExpr::Type(t.to_type_expr()),
                        DataTypeArg::Unit(u) => TypeArgExpr::Unit(u.to_expr()),
                    })
                    .collect(),
            },
            DataType::Tuple(items) => {
                TypeExpr::Tuple(items.iter().map(DataType::to_type_expr).collect())
            }
            DataType::Record(fields) => TypeExpr::Record(
                fields
                    .iter()
                    .map(|(k, t)| (k.clone(), t.to_type_expr()))
                    .collect(),
            ),
            DataType::List(element) => TypeExpr::List(Box::new(element.to_type_expr())),
            DataType::Function(..) => TypeExpr::Invalid(self.to_string()),
        }
    }
}

impl fmt::Display for DataType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        // Same rendering as the term, which has no variables to show.
        write!(f, "{}", self.to_term())
    }
}

#[cfg(test)]
mod tests;
