//! Unit terms, their normal form, and concrete units.

use std::collections::BTreeMap;
use std::fmt;

use sheaf_ir::UnitExpr;

/// A unit unification variable.
#[derive(Copy, Clone, Eq, PartialEq, Ord, PartialOrd, Hash, Debug)]
pub struct UnitVarId(u32);

impl UnitVarId {
    #[inline]
    pub const fn from_raw(raw: u32) -> Self {
        UnitVarId(raw)
    }

    #[inline]
    pub const fn raw(self) -> u32 {
        self.0
    }
}

/// A unit as built by the checker.
///
/// The constructors are structural; nothing is simplified until the term is
/// normalized with [`UnitTerm::exponents`].
#[derive(Clone, Eq, PartialEq, Hash, Debug)]
pub enum UnitTerm {
    Scalar,
    Named(String),
    Product(Box<UnitTerm>, Box<UnitTerm>),
    Quotient(Box<UnitTerm>, Box<UnitTerm>),
    Power(Box<UnitTerm>, i32),
    Var(UnitVarId),
}

impl UnitTerm {
    pub fn named(name: impl Into<String>) -> Self {
        UnitTerm::Named(name.into())
    }

    #[must_use]
    pub fn times(self, other: UnitTerm) -> Self {
        match (self, other) {
            (UnitTerm::Scalar, u) | (u, UnitTerm::Scalar) => u,
            (a, b) => UnitTerm::Product(Box::new(a), Box::new(b)),
        }
    }

    #[must_use]
    pub fn divided_by(self, other: UnitTerm) -> Self {
        match other {
            UnitTerm::Scalar => self,
            other => UnitTerm::Quotient(Box::new(self), Box::new(other)),
        }
    }

    #[must_use]
    pub fn raised_to(self, power: i32) -> Self {
        match (self, power) {
            (_, 0) | (UnitTerm::Scalar, _) => UnitTerm::Scalar,
            (u, 1) => u,
            (u, n) => UnitTerm::Power(Box::new(u), n),
        }
    }

    /// Normal form, without applying any substitution.
    pub fn exponents(&self) -> UnitExponents {
        let mut out = UnitExponents::scalar();
        self.accumulate(1, &mut out);
        out
    }

    fn accumulate(&self, power: i32, out: &mut UnitExponents) {
        match self {
            UnitTerm::Scalar => {}
            UnitTerm::Named(name) => out.add_name(name, power),
            UnitTerm::Var(var) => out.add_var(*var, power),
            UnitTerm::Product(a, b) => {
                a.accumulate(power, out);
                b.accumulate(power, out);
            }
            UnitTerm::Quotient(a, b) => {
                a.accumulate(power, out);
                b.accumulate(-power, out);
            }
            UnitTerm::Power(base, n) => base.accumulate(power.saturating_mul(*n), out),
        }
    }
}

impl fmt::Display for UnitTerm {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(&self.exponents(), f)
    }
}

/// Normal form of a unit: a product of names and variables raised to
/// non-zero integer powers.
#[derive(Clone, Eq, PartialEq, Hash, Debug, Default)]
pub struct UnitExponents {
    names: BTreeMap<String, i32>,
    vars: BTreeMap<UnitVarId, i32>,
}

impl UnitExponents {
    pub fn scalar() -> Self {
        Self::default()
    }

    pub fn var(var: UnitVarId) -> Self {
        let mut out = Self::scalar();
        out.add_var(var, 1);
        out
    }

    pub fn add_name(&mut self, name: &str, power: i32) {
        if power == 0 {
            return;
        }
        let entry = self.names.entry(name.to_owned()).or_insert(0);
        *entry += power;
        if *entry == 0 {
            self.names.remove(name);
        }
    }

    pub fn add_var(&mut self, var: UnitVarId, power: i32) {
        if power == 0 {
            return;
        }
        let entry = self.vars.entry(var).or_insert(0);
        *entry += power;
        if *entry == 0 {
            self.vars.remove(&var);
        }
    }

    /// Multiply by `other` raised to `power`.
    pub fn multiply(&mut self, other: &UnitExponents, power: i32) {
        for (name, exp) in &other.names {
            self.add_name(name, exp * power);
        }
        for (&var, exp) in &other.vars {
            self.add_var(var, exp * power);
        }
    }

    pub fn is_scalar(&self) -> bool {
        self.names.is_empty() && self.vars.is_empty()
    }

    /// Whether no unit variables remain.
    pub fn is_concrete(&self) -> bool {
        self.vars.is_empty()
    }

    pub fn names(&self) -> impl Iterator<Item = (&str, i32)> {
        self.names.iter().map(|(n, &e)| (n.as_str(), e))
    }

    pub fn vars(&self) -> impl Iterator<Item = (UnitVarId, i32)> + '_ {
        self.vars.iter().map(|(&v, &e)| (v, e))
    }

    pub(crate) fn remove_var(&mut self, var: UnitVarId) -> Option<i32> {
        self.vars.remove(&var)
    }

    /// The concrete unit, if no variables remain.
    pub fn to_unit(&self) -> Option<Unit> {
        self.is_concrete().then(|| Unit {
            dims: self.names.clone(),
        })
    }

    pub fn to_term(&self) -> UnitTerm {
        let names = self
            .names
            .iter()
            .map(|(n, &e)| UnitTerm::Named(n.clone()).raised_to(e));
        let vars = self
            .vars
            .iter()
            .map(|(&v, &e)| UnitTerm::Var(v).raised_to(e));
        names.chain(vars).fold(UnitTerm::Scalar, UnitTerm::times)
    }
}

impl fmt::Display for UnitExponents {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let names = self.names.iter().map(|(n, &e)| (n.clone(), e));
        let vars = self.vars.iter().map(|(v, &e)| (format!("?u{}", v.0), e));
        write_factors(f, names.chain(vars))
    }
}

/// A unit with no variables: names to non-zero integer powers.
#[derive(Clone, Eq, PartialEq, Ord, PartialOrd, Hash, Debug, Default)]
pub struct Unit {
    dims: BTreeMap<String, i32>,
}

impl Unit {
    pub const SCALAR: Unit = Unit {
        dims: BTreeMap::new(),
    };

    pub fn named(name: impl Into<String>) -> Self {
        let mut dims = BTreeMap::new();
        dims.insert(name.into(), 1);
        Unit { dims }
    }

    pub fn is_scalar(&self) -> bool {
        self.dims.is_empty()
    }

    pub fn dims(&self) -> impl Iterator<Item = (&str, i32)> {
        self.dims.iter().map(|(n, &e)| (n.as_str(), e))
    }

    #[must_use]
    pub fn times(&self, other: &Unit) -> Unit {
        self.combine(other, 1)
    }

    #[must_use]
    pub fn divided_by(&self, other: &Unit) -> Unit {
        self.combine(other, -1)
    }

    #[must_use]
    pub fn raised_to(&self, power: i32) -> Unit {
        if power == 0 {
            return Unit::SCALAR;
        }
        Unit {
            dims: self
                .dims
                .iter()
                .map(|(n, &e)| (n.clone(), e * power))
                .collect(),
        }
    }

    /// The `n`th root, if every exponent is divisible by `n`.
    pub fn root(&self, n: i32) -> Option<Unit> {
        if n == 0 || self.dims.values().any(|e| e % n != 0) {
            return None;
        }
        Some(Unit {
            dims: self.dims.iter().map(|(k, &e)| (k.clone(), e / n)).collect(),
        })
    }

    fn combine(&self, other: &Unit, sign: i32) -> Unit {
        let mut exps = UnitExponents::scalar();
        for (name, &e) in &self.dims {
            exps.add_name(name, e);
        }
        for (name, &e) in &other.dims {
            exps.add_name(name, e * sign);
        }
        Unit { dims: exps.names }
    }

    pub fn to_term(&self) -> UnitTerm {
        self.dims
            .iter()
            .map(|(n, &e)| UnitTerm::Named(n.clone()).raised_to(e))
            .fold(UnitTerm::Scalar, UnitTerm::times)
    }

    /// Unit syntax for this unit, e.g. `m/s^2` for use in a rebuilt literal.
    pub fn to_expr(&self) -> UnitExpr {
        fn factor(name: &str, power: i32) -> UnitExpr {
            if power == 1 {
                UnitExpr::single(name)
            } else {
                UnitExpr::raise(UnitExpr::single(name), power)
            }
        }
        fn product(mut items: Vec<UnitExpr>) -> UnitExpr {
            match items.len() {
                0 => UnitExpr::One,
                1 => items.remove(0),
                _ => UnitExpr::Times(items),
            }
        }

        let num: Vec<_> = self
            .dims
            .iter()
            .filter(|(_, e)| **e > 0)
            .map(|(n, &e)| factor(n, e))
            .collect();
        let den: Vec<_> = self
            .dims
            .iter()
            .filter(|(_, e)| **e < 0)
            .map(|(n, &e)| factor(n, -e))
            .collect();
        if den.is_empty() {
            product(num)
        } else {
            UnitExpr::divide(product(num), product(den))
        }
    }
}

impl fmt::Display for Unit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write_factors(f, self.dims.iter().map(|(n, &e)| (n.clone(), e)))
    }
}

/// Render `a*b^2/(c*d)`; `1` for the empty product.
fn write_factors(
    f: &mut fmt::Formatter<'_>,
    factors: impl Iterator<Item = (String, i32)>,
) -> fmt::Result {
    let (num, den): (Vec<_>, Vec<_>) = factors.partition(|(_, e)| *e > 0);
    let render = |items: &[(String, i32)]| {
        items
            .iter()
            .map(|(n, e)| {
                let e = e.abs();
                if e == 1 {
                    n.clone()
                } else {
                    format!("{n}^{e}")
                }
            })
            .collect::<Vec<_>>()
            .join("*")
    };

    if num.is_empty() {
        write!(f, "1")?;
    } else {
        write!(f, "{}", render(&num))?;
    }
    match den.len() {
        0 => Ok(()),
        1 => write!(f, "/{}", render(&den)),
        _ => write!(f, "/({})", render(&den)),
    }
}

#[cfg(test)]
mod tests;
