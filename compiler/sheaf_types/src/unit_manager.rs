//! Registry of unit names.

use rustc_hash::FxHashMap;
use sheaf_diagnostic::suggest_similar;
use sheaf_ir::UnitExpr;

use crate::{Unit, UnitError, UnitTerm};

/// How a unit relates to other units.
#[derive(Clone, Debug, PartialEq)]
pub enum UnitDefinition {
    /// A unit with no definition in terms of others (`m`, `s`, `USD`).
    Base,
    /// `scale` of another unit, e.g. `km` is 1000 `m`.
    Scaled { scale: f64, of: Unit },
    /// Another name for an existing unit; resolved away before checking.
    Alias(String),
}

#[derive(Clone, Debug, PartialEq)]
pub struct UnitDeclaration {
    pub name: String,
    pub description: String,
    pub definition: UnitDefinition,
}

impl UnitDeclaration {
    pub fn base(name: &str, description: &str) -> Self {
        UnitDeclaration {
            name: name.to_owned(),
            description: description.to_owned(),
            definition: UnitDefinition::Base,
        }
    }

    pub fn scaled(name: &str, description: &str, scale: f64, of: Unit) -> Self {
        UnitDeclaration {
            name: name.to_owned(),
            description: description.to_owned(),
            definition: UnitDefinition::Scaled { scale, of },
        }
    }

    pub fn alias(name: &str, target: &str) -> Self {
        UnitDeclaration {
            name: name.to_owned(),
            description: format!("alias for {target}"),
            definition: UnitDefinition::Alias(target.to_owned()),
        }
    }
}

/// Known units. Passed explicitly to the checker and to unit-aware
/// functions; there is no global registry.
#[derive(Clone, Debug, Default)]
pub struct UnitManager {
    units: FxHashMap<String, UnitDeclaration>,
}

impl UnitManager {
    /// A manager with no units at all.
    pub fn empty() -> Self {
        Self::default()
    }

    /// SI base units, common derived units and a few currencies.
    pub fn with_builtin_units() -> Self {
        let mut manager = Self::empty();
        for decl in builtin_units() {
            // Built-in declarations are consistent, so this cannot fail.
            let _ = manager.declare(decl);
        }
        manager
    }

    /// Add a unit. Scaled units and aliases must refer to known units.
    pub fn declare(&mut self, decl: UnitDeclaration) -> Result<(), UnitError> {
        if self.units.contains_key(&decl.name) {
            return Err(UnitError::Duplicate(decl.name));
        }
        match &decl.definition {
            UnitDefinition::Base => {}
            UnitDefinition::Scaled { of, .. } => {
                for (name, _) in of.dims() {
                    self.lookup(name)?;
                }
            }
            UnitDefinition::Alias(target) => {
                self.lookup(target)?;
            }
        }
        self.units.insert(decl.name.clone(), decl);
        Ok(())
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.units.keys().map(String::as_str)
    }

    pub fn get(&self, name: &str) -> Option<&UnitDeclaration> {
        self.units.get(name)
    }

    fn lookup(&self, name: &str) -> Result<&UnitDeclaration, UnitError> {
        self.units.get(name).ok_or_else(|| UnitError::Unknown {
            name: name.to_owned(),
            suggestions: suggest_similar(name, self.names(), 3)
                .into_iter()
                .map(str::to_owned)
                .collect(),
        })
    }

    /// The name a unit is known by after following aliases.
    pub fn canonical_name<'a>(&'a self, name: &'a str) -> Result<&'a str, UnitError> {
        let mut current = name;
        // Aliases are declared after their targets, so chains are finite.
        while let UnitDefinition::Alias(target) = &self.lookup(current)?.definition {
            current = target.as_str();
        }
        Ok(current)
    }

    /// Resolve written unit syntax to a term over canonical unit names.
    pub fn resolve(&self, expr: &UnitExpr) -> Result<UnitTerm, UnitError> {
        Ok(match expr {
            UnitExpr::One => UnitTerm::Scalar,
            UnitExpr::Single(name) => UnitTerm::named(self.canonical_name(name)?),
            UnitExpr::Times(items) => {
                let mut out = UnitTerm::Scalar;
                for item in items {
                    out = out.times(self.resolve(item)?);
                }
                out
            }
            UnitExpr::Divide(num, den) => self.resolve(num)?.divided_by(self.resolve(den)?),
            UnitExpr::Raise(base, power) => self.resolve(base)?.raised_to(*power),
            UnitExpr::Invalid(text) => return Err(UnitError::Invalid(text.clone())),
        })
    }

    /// Resolve written unit syntax to a concrete unit.
    pub fn resolve_concrete(&self, expr: &UnitExpr) -> Result<Unit, UnitError> {
        let exps = self.resolve(expr)?.exponents();
        // Resolved syntax never contains unit variables.
        exps.to_unit()
            .ok_or_else(|| UnitError::Invalid(format!("{exps}")))
    }

    /// Express `unit` in base units: `km/h` is `(1000/3600, m/s)`.
    pub fn canonicalise(&self, unit: &Unit) -> Result<(f64, Unit), UnitError> {
        let mut scale = 1.0;
        let mut base = Unit::SCALAR;
        for (name, power) in unit.dims() {
            let (s, u) = self.canonicalise_name(name)?;
            scale *= s.powi(power);
            base = base.times(&u.raised_to(power));
        }
        Ok((scale, base))
    }

    fn canonicalise_name(&self, name: &str) -> Result<(f64, Unit), UnitError> {
        let decl = self.lookup(name)?;
        match &decl.definition {
            UnitDefinition::Base => Ok((1.0, Unit::named(name))),
            UnitDefinition::Scaled { scale, of } => {
                let (s, u) = self.canonicalise(of)?;
                Ok((scale * s, u))
            }
            UnitDefinition::Alias(target) => self.canonicalise_name(target),
        }
    }

    /// Factor to multiply a value in `from` by to get a value in `to`.
    pub fn conversion_factor(&self, from: &Unit, to: &Unit) -> Result<f64, UnitError> {
        let (from_scale, from_base) = self.canonicalise(from)?;
        let (to_scale, to_base) = self.canonicalise(to)?;
        if from_base != to_base {
            return Err(UnitError::Incompatible {
                from: from.clone(),
                to: to.clone(),
            });
        }
        Ok(from_scale / to_scale)
    }
}

fn builtin_units() -> Vec<UnitDeclaration> {
    let m = || Unit::named("m");
    let s = || Unit::named("s");
    let kg = || Unit::named("kg");
    vec![
        UnitDeclaration::base("m", "metre"),
        UnitDeclaration::base("s", "second"),
        UnitDeclaration::base("kg", "kilogram"),
        UnitDeclaration::base("A", "ampere"),
        UnitDeclaration::base("K", "kelvin"),
        UnitDeclaration::base("mol", "mole"),
        UnitDeclaration::base("cd", "candela"),
        UnitDeclaration::base("USD", "US dollar"),
        UnitDeclaration::base("EUR", "euro"),
        UnitDeclaration::base("GBP", "pound sterling"),
        UnitDeclaration::base("person", "person"),
        UnitDeclaration::scaled("km", "kilometre", 1000.0, m()),
        UnitDeclaration::scaled("cm", "centimetre", 0.01, m()),
        UnitDeclaration::scaled("mm", "millimetre", 0.001, m()),
        UnitDeclaration::scaled("inch", "inch", 0.0254, m()),
        UnitDeclaration::scaled("ft", "foot", 0.3048, m()),
        UnitDeclaration::scaled("mile", "mile", 1609.344, m()),
        UnitDeclaration::scaled("g", "gram", 0.001, kg()),
        UnitDeclaration::scaled("t", "tonne", 1000.0, kg()),
        UnitDeclaration::scaled("min", "minute", 60.0, s()),
        UnitDeclaration::scaled("h", "hour", 3600.0, s()),
        UnitDeclaration::scaled("day", "day", 86400.0, s()),
        UnitDeclaration::scaled("l", "litre", 0.001, m().raised_to(3)),
        UnitDeclaration::scaled("N", "newton", 1.0, kg().times(&m()).divided_by(&s().raised_to(2))),
        UnitDeclaration::scaled("J", "joule", 1.0, Unit::named("N").times(&m())),
        UnitDeclaration::scaled("W", "watt", 1.0, Unit::named("J").divided_by(&s())),
        UnitDeclaration::alias("metre", "m"),
        UnitDeclaration::alias("meter", "m"),
        UnitDeclaration::alias("second", "s"),
        UnitDeclaration::alias("hour", "h"),
        UnitDeclaration::alias("litre", "l"),
    ]
}
