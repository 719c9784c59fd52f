//! Unification of type terms.
//!
//! The unifier keeps a substitution for type, row and unit variables. Every
//! public operation is atomic: on failure the substitution is restored to
//! what it was before the call, so a failed unification never leaves half a
//! solution behind for later checks to trip over.
//!
//! Records are row-polymorphic. Unifying `(a: Number, ..r1)` with
//! `(b: Text, ..r2)` binds `r1 := (b: Text, ..r3)` and `r2 := (a: Number, ..r3)`
//! for a fresh `r3`. An exact record on either side closes the row.

mod units;

use std::collections::BTreeMap;

use rustc_hash::FxHashMap;
use tracing::trace;

use crate::{
    ArityKind, ConcreteError, DataType, DataTypeArg, RecordTerm, RowVarId, TypeArg, TypeClasses,
    TypeError, TypeTerm, TypeVarId, UnitExponents, UnitMismatch, UnitTerm, UnitVarId,
};

/// Variable substitution plus the counters for fresh variables.
#[derive(Clone, Debug, Default)]
pub struct Unifier {
    types: FxHashMap<TypeVarId, TypeTerm>,
    rows: FxHashMap<RowVarId, RecordTerm>,
    units: FxHashMap<UnitVarId, UnitExponents>,
    type_classes: FxHashMap<TypeVarId, TypeClasses>,
    row_classes: FxHashMap<RowVarId, TypeClasses>,
    next_type_var: u32,
    next_row_var: u32,
    next_unit_var: u32,
}

/// Saved unifier state, see [`Unifier::snapshot`].
#[derive(Clone, Debug)]
pub struct Snapshot {
    state: Box<Unifier>,
}

impl Unifier {
    pub fn new() -> Self {
        Self::default()
    }

    // ========================================
    // Fresh variables
    // ========================================

    pub fn fresh_type_var(&mut self) -> TypeVarId {
        let id = TypeVarId::from_raw(self.next_type_var);
        self.next_type_var += 1;
        id
    }

    pub fn fresh_type(&mut self) -> TypeTerm {
        TypeTerm::Var(self.fresh_type_var())
    }

    /// A fresh type variable that may only be bound to types in `classes`.
    pub fn fresh_constrained(&mut self, classes: TypeClasses) -> TypeTerm {
        let var = self.fresh_type_var();
        if !classes.is_empty() {
            self.type_classes.insert(var, classes);
        }
        TypeTerm::Var(var)
    }

    pub fn fresh_row_var(&mut self) -> RowVarId {
        let id = RowVarId::from_raw(self.next_row_var);
        self.next_row_var += 1;
        id
    }

    pub fn fresh_unit_var(&mut self) -> UnitVarId {
        let id = UnitVarId::from_raw(self.next_unit_var);
        self.next_unit_var += 1;
        id
    }

    pub fn fresh_unit(&mut self) -> UnitTerm {
        UnitTerm::Var(self.fresh_unit_var())
    }

    // ========================================
    // Snapshots
    // ========================================

    /// Save the current substitution.
    pub fn snapshot(&self) -> Snapshot {
        Snapshot {
            state: Box::new(self.clone()),
        }
    }

    /// Restore a saved substitution. Fresh-variable counters keep their
    /// current values so ids handed out since the snapshot stay unique.
    pub fn rollback(&mut self, snapshot: Snapshot) {
        let (t, r, u) = (self.next_type_var, self.next_row_var, self.next_unit_var);
        *self = *snapshot.state;
        self.next_type_var = self.next_type_var.max(t);
        self.next_row_var = self.next_row_var.max(r);
        self.next_unit_var = self.next_unit_var.max(u);
    }

    /// Run `f`, undoing its effect on the substitution if it fails.
    pub fn transaction<T, E>(
        &mut self,
        f: impl FnOnce(&mut Self) -> Result<T, E>,
    ) -> Result<T, E> {
        let snapshot = self.snapshot();
        let result = f(self);
        if result.is_err() {
            self.rollback(snapshot);
        }
        result
    }

    // ========================================
    // Resolution
    // ========================================

    /// Apply the substitution throughout `ty`.
    pub fn resolve(&self, ty: &TypeTerm) -> TypeTerm {
        match ty {
            TypeTerm::Var(v) => match self.types.get(v) {
                Some(bound) => self.resolve(bound),
                None => ty.clone(),
            },
            TypeTerm::Number(unit) => TypeTerm::Number(self.resolve_unit(unit).to_term()),
            TypeTerm::Text | TypeTerm::Boolean | TypeTerm::Temporal(_) => ty.clone(),
            TypeTerm::Tagged { name, args } => TypeTerm::Tagged {
                name: name.clone(),
                args: args.iter().map(|arg| self.resolve_arg(arg)).collect(),
            },
            TypeTerm::Tuple(items) => {
                TypeTerm::Tuple(items.iter().map(|t| self.resolve(t)).collect())
            }
            TypeTerm::Record(record) => {
                let flat = self.flatten_record(record);
                TypeTerm::Record(RecordTerm {
                    fields: flat
                        .fields
                        .iter()
                        .map(|(k, t)| (k.clone(), self.resolve(t)))
                        .collect(),
                    rest: flat.rest,
                })
            }
            TypeTerm::List(element) => TypeTerm::list(self.resolve(element)),
            TypeTerm::Function(params, ret) => TypeTerm::function(
                params.iter().map(|t| self.resolve(t)).collect(),
                self.resolve(ret),
            ),
        }
    }

    fn resolve_arg(&self, arg: &TypeArg) -> TypeArg {
        match arg {
            TypeArg::Type(t) => TypeArg::Type(self.resolve(t)),
            TypeArg::Unit(u) => TypeArg::Unit(self.resolve_unit(u).to_term()),
        }
    }

    /// Normal form of `unit` with the substitution applied.
    pub fn resolve_unit(&self, unit: &UnitTerm) -> UnitExponents {
        self.apply_units(&unit.exponents())
    }

    fn apply_units(&self, exps: &UnitExponents) -> UnitExponents {
        let mut out = UnitExponents::scalar();
        for (name, power) in exps.names() {
            out.add_name(name, power);
        }
        for (var, power) in exps.vars() {
            match self.units.get(&var) {
                Some(bound) => out.multiply(&self.apply_units(bound), power),
                None => out.add_var(var, power),
            }
        }
        out
    }

    /// Follow bound row variables so the result's `rest` is unbound.
    fn flatten_record(&self, record: &RecordTerm) -> RecordTerm {
        let mut fields = record.fields.clone();
        let mut rest = record.rest;
        while let Some(bound) = rest.and_then(|r| self.rows.get(&r)) {
            for (k, t) in &bound.fields {
                fields.entry(k.clone()).or_insert_with(|| t.clone());
            }
            rest = bound.rest;
        }
        RecordTerm { fields, rest }
    }

    /// Follow variable bindings at the top of `ty` only.
    fn shallow(&self, ty: &TypeTerm) -> TypeTerm {
        let mut current = ty;
        while let TypeTerm::Var(v) = current {
            match self.types.get(v) {
                Some(bound) => current = bound,
                None => break,
            }
        }
        current.clone()
    }

    // ========================================
    // Unification
    // ========================================

    /// Unify two terms, returning the resolved common term.
    pub fn unify(&mut self, expected: &TypeTerm, found: &TypeTerm) -> Result<TypeTerm, TypeError> {
        self.transaction(|u| {
            u.unify_inner(expected, found)?;
            Ok(u.resolve(expected))
        })
    }

    /// Unify two units.
    pub fn unify_units(&mut self, expected: &UnitTerm, found: &UnitTerm) -> Result<(), UnitMismatch> {
        self.transaction(|u| u.unify_units_inner(expected, found))
    }

    /// Require `ty` to be in `classes`, constraining variables inside it.
    pub fn require(&mut self, ty: &TypeTerm, classes: TypeClasses) -> Result<(), TypeError> {
        self.transaction(|u| u.require_inner(ty, classes))
    }

    fn unify_inner(&mut self, expected: &TypeTerm, found: &TypeTerm) -> Result<(), TypeError> {
        let a = self.shallow(expected);
        let b = self.shallow(found);
        trace!(expected = %a, found = %b, "unify");

        match (&a, &b) {
            (TypeTerm::Var(x), TypeTerm::Var(y)) if x == y => Ok(()),
            (TypeTerm::Var(x), other) | (other, TypeTerm::Var(x)) => self.bind_type(*x, other),

            (TypeTerm::Number(u1), TypeTerm::Number(u2)) => {
                self.unify_units_inner(u1, u2).map_err(TypeError::Unit)
            }
            (TypeTerm::Text, TypeTerm::Text) | (TypeTerm::Boolean, TypeTerm::Boolean) => Ok(()),
            (TypeTerm::Temporal(k1), TypeTerm::Temporal(k2)) if k1 == k2 => Ok(()),

            (
                TypeTerm::Tagged { name: n1, args: a1 },
                TypeTerm::Tagged { name: n2, args: a2 },
            ) if n1 == n2 => {
                if a1.len() != a2.len() {
                    return Err(TypeError::Arity {
                        kind: ArityKind::TypeArgs,
                        expected: a1.len(),
                        found: a2.len(),
                    });
                }
                for (x, y) in a1.iter().zip(a2) {
                    match (x, y) {
                        (TypeArg::Type(x), TypeArg::Type(y)) => self.unify_inner(x, y)?,
                        (TypeArg::Unit(x), TypeArg::Unit(y)) => {
                            self.unify_units_inner(x, y).map_err(TypeError::Unit)?;
                        }
                        _ => return Err(self.mismatch(&a, &b)),
                    }
                }
                Ok(())
            }

            (TypeTerm::Tuple(x), TypeTerm::Tuple(y)) => {
                if x.len() != y.len() {
                    return Err(TypeError::Arity {
                        kind: ArityKind::Tuple,
                        expected: x.len(),
                        found: y.len(),
                    });
                }
                x.iter().zip(y).try_for_each(|(x, y)| self.unify_inner(x, y))
            }

            (TypeTerm::List(x), TypeTerm::List(y)) => self.unify_inner(x, y),

            (TypeTerm::Function(p1, r1), TypeTerm::Function(p2, r2)) => {
                if p1.len() != p2.len() {
                    return Err(TypeError::Arity {
                        kind: ArityKind::Function,
                        expected: p1.len(),
                        found: p2.len(),
                    });
                }
                for (x, y) in p1.iter().zip(p2) {
                    self.unify_inner(x, y)?;
                }
                self.unify_inner(r1, r2)
            }

            (TypeTerm::Record(r1), TypeTerm::Record(r2)) => self.unify_records(r1, r2),

            _ => Err(self.mismatch(&a, &b)),
        }
    }

    fn mismatch(&self, expected: &TypeTerm, found: &TypeTerm) -> TypeError {
        TypeError::Mismatch {
            expected: self.resolve(expected),
            found: self.resolve(found),
        }
    }

    fn bind_type(&mut self, var: TypeVarId, ty: &TypeTerm) -> Result<(), TypeError> {
        if let TypeTerm::Var(other) = ty {
            if let Some(classes) = self.type_classes.get(&var).copied() {
                *self.type_classes.entry(*other).or_insert(TypeClasses::empty()) |= classes;
            }
            trace!(var = var.raw(), other = other.raw(), "link type variables");
            self.types.insert(var, ty.clone());
            return Ok(());
        }

        if self.occurs(var, ty) {
            return Err(TypeError::Infinite {
                ty: self.resolve(ty),
            });
        }
        if let Some(classes) = self.type_classes.get(&var).copied() {
            self.require_inner(ty, classes)?;
        }
        trace!(var = var.raw(), ty = %ty, "bind type variable");
        self.types.insert(var, ty.clone());
        Ok(())
    }

    fn occurs(&self, var: TypeVarId, ty: &TypeTerm) -> bool {
        match ty {
            TypeTerm::Var(v) => {
                *v == var || self.types.get(v).is_some_and(|bound| self.occurs(var, bound))
            }
            TypeTerm::Number(_) | TypeTerm::Text | TypeTerm::Boolean | TypeTerm::Temporal(_) => {
                false
            }
            TypeTerm::Tagged { args, .. } => args.iter().any(|arg| match arg {
                TypeArg::Type(t) => self.occurs(var, t),
                TypeArg::Unit(_) => false,
            }),
            TypeTerm::Tuple(items) => items.iter().any(|t| self.occurs(var, t)),
            TypeTerm::Record(record) => self
                .flatten_record(record)
                .fields
                .values()
                .any(|t| self.occurs(var, t)),
            TypeTerm::List(element) => self.occurs(var, element),
            TypeTerm::Function(params, ret) => {
                params.iter().any(|t| self.occurs(var, t)) || self.occurs(var, ret)
            }
        }
    }

    fn row_occurs(&self, row: RowVarId, ty: &TypeTerm) -> bool {
        match self.shallow(ty) {
            TypeTerm::Record(record) => {
                let flat = self.flatten_record(&record);
                flat.rest == Some(row) || flat.fields.values().any(|t| self.row_occurs(row, t))
            }
            TypeTerm::Tagged { args, .. } => args.iter().any(|arg| match arg {
                TypeArg::Type(t) => self.row_occurs(row, t),
                TypeArg::Unit(_) => false,
            }),
            TypeTerm::Tuple(items) => items.iter().any(|t| self.row_occurs(row, t)),
            TypeTerm::List(element) => self.row_occurs(row, &element),
            TypeTerm::Function(params, ret) => {
                params.iter().any(|t| self.row_occurs(row, t)) || self.row_occurs(row, &ret)
            }
            TypeTerm::Var(_)
            | TypeTerm::Number(_)
            | TypeTerm::Text
            | TypeTerm::Boolean
            | TypeTerm::Temporal(_) => false,
        }
    }

    fn unify_records(&mut self, r1: &RecordTerm, r2: &RecordTerm) -> Result<(), TypeError> {
        let expected = self.flatten_record(r1);
        let found = self.flatten_record(r2);

        let mut only_expected = BTreeMap::new();
        let mut only_found = BTreeMap::new();
        for (name, ty) in &expected.fields {
            match found.fields.get(name) {
                Some(other) => self.unify_inner(ty, other)?,
                None => {
                    only_expected.insert(name.clone(), ty.clone());
                }
            }
        }
        for (name, ty) in &found.fields {
            if !expected.fields.contains_key(name) {
                only_found.insert(name.clone(), ty.clone());
            }
        }

        match (expected.rest, found.rest) {
            (None, None) => {
                if only_expected.is_empty() && only_found.is_empty() {
                    Ok(())
                } else {
                    Err(self.mismatch(&TypeTerm::Record(expected), &TypeTerm::Record(found)))
                }
            }
            (Some(row), None) => {
                if let Some(field) = only_expected.keys().next() {
                    return Err(TypeError::MissingField {
                        field: field.clone(),
                        record: self.resolve(&TypeTerm::Record(found)),
                    });
                }
                self.bind_row(row, RecordTerm { fields: only_found, rest: None })
            }
            (None, Some(row)) => {
                if let Some(field) = only_found.keys().next() {
                    return Err(TypeError::MissingField {
                        field: field.clone(),
                        record: self.resolve(&TypeTerm::Record(expected)),
                    });
                }
                self.bind_row(row, RecordTerm { fields: only_expected, rest: None })
            }
            (Some(a), Some(b)) if a == b => {
                if only_expected.is_empty() && only_found.is_empty() {
                    Ok(())
                } else {
                    Err(self.mismatch(&TypeTerm::Record(expected), &TypeTerm::Record(found)))
                }
            }
            (Some(a), Some(b)) => {
                let tail = self.fresh_row_var();
                let classes = self.row_classes.get(&a).copied().unwrap_or(TypeClasses::empty())
                    | self.row_classes.get(&b).copied().unwrap_or(TypeClasses::empty());
                if !classes.is_empty() {
                    self.row_classes.insert(tail, classes);
                }
                self.bind_row(a, RecordTerm { fields: only_found, rest: Some(tail) })?;
                self.bind_row(b, RecordTerm { fields: only_expected, rest: Some(tail) })
            }
        }
    }

    fn bind_row(&mut self, row: RowVarId, record: RecordTerm) -> Result<(), TypeError> {
        if record.fields.values().any(|t| self.row_occurs(row, t)) {
            return Err(TypeError::Infinite {
                ty: self.resolve(&TypeTerm::Record(record)),
            });
        }
        if let Some(classes) = self.row_classes.get(&row).copied() {
            for ty in record.fields.values() {
                self.require_inner(ty, classes)?;
            }
            if let Some(tail) = record.rest {
                *self.row_classes.entry(tail).or_insert(TypeClasses::empty()) |= classes;
            }
        }
        self.rows.insert(row, record);
        Ok(())
    }

    fn require_inner(&mut self, ty: &TypeTerm, classes: TypeClasses) -> Result<(), TypeError> {
        if classes.is_empty() {
            return Ok(());
        }
        let resolved = self.shallow(ty);
        match &resolved {
            TypeTerm::Var(v) => {
                *self.type_classes.entry(*v).or_insert(TypeClasses::empty()) |= classes;
                Ok(())
            }
            TypeTerm::Number(_) | TypeTerm::Text | TypeTerm::Boolean | TypeTerm::Temporal(_) => {
                Ok(())
            }
            TypeTerm::Tagged { name, args } => {
                if crate::builtin::is_phantom(name) {
                    return Err(self.not_in_class(&resolved, classes));
                }
                for arg in args {
                    if let TypeArg::Type(t) = arg {
                        self.require_inner(t, classes)?;
                    }
                }
                Ok(())
            }
            TypeTerm::Tuple(items) => items.iter().try_for_each(|t| self.require_inner(t, classes)),
            TypeTerm::List(element) => self.require_inner(element, classes),
            TypeTerm::Record(record) => {
                let flat = self.flatten_record(record);
                for ty in flat.fields.values() {
                    self.require_inner(ty, classes)?;
                }
                if let Some(rest) = flat.rest {
                    *self.row_classes.entry(rest).or_insert(TypeClasses::empty()) |= classes;
                }
                Ok(())
            }
            TypeTerm::Function(..) => Err(self.not_in_class(&resolved, classes)),
        }
    }

    fn not_in_class(&self, ty: &TypeTerm, classes: TypeClasses) -> TypeError {
        TypeError::NotInClass {
            ty: self.resolve(ty),
            requirement: classes.requirement(),
        }
    }

    // ========================================
    // Concrete types
    // ========================================

    /// Convert a term to a concrete type.
    ///
    /// Fails if a variable remains. A tagged type whose arguments are still
    /// unknown is reported as ambiguous rather than unresolved.
    pub fn to_concrete(&self, ty: &TypeTerm) -> Result<DataType, ConcreteError> {
        let resolved = self.resolve(ty);
        concrete(&resolved)
    }
}

fn concrete(ty: &TypeTerm) -> Result<DataType, ConcreteError> {
    Ok(match ty {
        TypeTerm::Var(_) => return Err(ConcreteError::Unresolved { ty: ty.clone() }),
        TypeTerm::Number(unit) => DataType::Number(concrete_unit(unit)?),
        TypeTerm::Text => DataType::Text,
        TypeTerm::Boolean => DataType::Boolean,
        TypeTerm::Temporal(kind) => DataType::Temporal(*kind),
        TypeTerm::Tagged { name, args } => {
            let mut out = Vec::with_capacity(args.len());
            for arg in args {
                let converted = match arg {
                    TypeArg::Type(t) => concrete(t).map(DataTypeArg::Type),
                    TypeArg::Unit(u) => concrete_unit(u).map(DataTypeArg::Unit),
                };
                match converted {
                    Ok(arg) => out.push(arg),
                    Err(_) => return Err(ConcreteError::Ambiguous { ty: ty.clone() }),
                }
            }
            DataType::Tagged {
                name: name.clone(),
                args: out,
            }
        }
        TypeTerm::Tuple(items) => {
            DataType::Tuple(items.iter().map(concrete).collect::<Result<_, _>>()?)
        }
        TypeTerm::Record(record) => {
            if record.rest.is_some() {
                return Err(ConcreteError::Unresolved { ty: ty.clone() });
            }
            DataType::Record(
                record
                    .fields
                    .iter()
                    .map(|(k, t)| Ok((k.clone(), concrete(t)?)))
                    .collect::<Result<_, ConcreteError>>()?,
            )
        }
        TypeTerm::List(element) => DataType::list(concrete(element)?),
        TypeTerm::Function(params, ret) => DataType::Function(
            params.iter().map(concrete).collect::<Result<_, _>>()?,
            Box::new(concrete(ret)?),
        ),
    })
}

fn concrete_unit(unit: &UnitTerm) -> Result<crate::Unit, ConcreteError> {
    let exps = unit.exponents();
    exps.to_unit()
        .ok_or(ConcreteError::UnresolvedUnit { unit: exps })
}

#[cfg(test)]
#[expect(clippy::unwrap_used, reason = "Tests use unwrap for brevity")]
mod tests;
