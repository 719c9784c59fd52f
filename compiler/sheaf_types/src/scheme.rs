//! Polymorphic function signatures.

use std::fmt;

use rustc_hash::FxHashMap;

use crate::{TypeClasses, TypeTerm, TypeVarId, Unifier, UnitTerm, UnitVarId};

/// A function type with type and unit variables that are renamed to fresh
/// variables at every call site.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct TypeScheme {
    params: Vec<TypeTerm>,
    ret: TypeTerm,
    type_vars: Vec<TypeClasses>,
    unit_vars: u32,
}

/// Hands out the template variables of a [`TypeScheme`].
///
/// ```
/// use sheaf_types::{SchemeBuilder, TypeTerm};
///
/// let mut b = SchemeBuilder::new();
/// let t = b.type_var();
/// let scheme = b.build(vec![TypeTerm::list(t.clone())], t);
/// assert_eq!(scheme.to_string(), "@function([?t0]) -> ?t0");
/// ```
#[derive(Debug, Default)]
pub struct SchemeBuilder {
    type_vars: Vec<TypeClasses>,
    unit_vars: u32,
}

impl SchemeBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn type_var(&mut self) -> TypeTerm {
        self.constrained(TypeClasses::empty())
    }

    /// A type variable whose instances must be in `classes`.
    pub fn constrained(&mut self, classes: TypeClasses) -> TypeTerm {
        let id = u32::try_from(self.type_vars.len()).unwrap_or(u32::MAX);
        self.type_vars.push(classes);
        TypeTerm::Var(TypeVarId::from_raw(id))
    }

    pub fn unit_var(&mut self) -> UnitTerm {
        let id = UnitVarId::from_raw(self.unit_vars);
        self.unit_vars += 1;
        UnitTerm::Var(id)
    }

    pub fn build(self, params: Vec<TypeTerm>, ret: TypeTerm) -> TypeScheme {
        TypeScheme {
            params,
            ret,
            type_vars: self.type_vars,
            unit_vars: self.unit_vars,
        }
    }
}

impl TypeScheme {
    /// A signature with no variables.
    pub fn monomorphic(params: Vec<TypeTerm>, ret: TypeTerm) -> Self {
        SchemeBuilder::new().build(params, ret)
    }

    pub fn arity(&self) -> usize {
        self.params.len()
    }

    pub fn params(&self) -> &[TypeTerm] {
        &self.params
    }

    /// The function type with fresh variables for the template variables.
    pub fn instantiate(&self, unifier: &mut Unifier) -> TypeTerm {
        let types: FxHashMap<TypeVarId, TypeTerm> = (0u32..)
            .zip(&self.type_vars)
            .map(|(i, classes)| (TypeVarId::from_raw(i), unifier.fresh_constrained(*classes)))
            .collect();
        let units: FxHashMap<UnitVarId, UnitTerm> = (0..self.unit_vars)
            .map(|i| (UnitVarId::from_raw(i), unifier.fresh_unit()))
            .collect();
        TypeTerm::function(
            self.params.iter().map(|p| p.substitute(&types, &units)).collect(),
            self.ret.substitute(&types, &units),
        )
    }
}

impl fmt::Display for TypeScheme {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", TypeTerm::function(self.params.clone(), self.ret.clone()))
    }
}
