//! Registry of tagged types.

use rustc_hash::FxHashMap;
use sheaf_diagnostic::suggest_similar;
use sheaf_ir::{TemporalKind, TypeArgExpr, TypeExpr};

use crate::{
    RecordTerm, TypeArg, TypeExprError, TypeTerm, TypeVarId, Unifier, UnitManager, UnitVarId,
};

/// Names of the tagged types every manager knows.
pub mod builtin {
    pub const OPTIONAL: &str = "Optional";
    /// Type of a type literal; has no values.
    pub const TYPE: &str = "Type";
    /// Type of a unit literal; has no values.
    pub const UNIT: &str = "Unit";

    pub const IS: &str = "Is";
    pub const NONE: &str = "None";

    /// Types that only exist to pass types and units to functions.
    pub fn is_phantom(name: &str) -> bool {
        name == TYPE || name == UNIT
    }
}

/// A parameter of a tagged type.
#[derive(Clone, Debug, Eq, PartialEq)]
pub enum TypeParam {
    Type(String),
    Unit(String),
}

/// One tag of a tagged type.
///
/// The payload is written against the type's parameters: parameter `i` is
/// `TypeVarId::from_raw(i)` or `UnitVarId::from_raw(i)`, depending on its kind.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct TagDefinition {
    pub name: String,
    pub payload: Option<TypeTerm>,
}

#[derive(Clone, Debug, Eq, PartialEq)]
pub struct TaggedTypeDefinition {
    pub name: String,
    pub params: Vec<TypeParam>,
    pub tags: Vec<TagDefinition>,
}

impl TaggedTypeDefinition {
    pub fn tag_index(&self, tag: &str) -> Option<usize> {
        self.tags.iter().position(|t| t.name == tag)
    }
}

/// A tag of a tagged type, with fresh variables for the type's parameters.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct TagInstance {
    /// The tagged type the tag belongs to.
    pub ty: TypeTerm,
    pub payload: Option<TypeTerm>,
    /// Position of the tag in its type's declaration.
    pub index: usize,
}

/// Known tagged types. Passed explicitly wherever types are resolved.
#[derive(Clone, Debug)]
pub struct TypeManager {
    types: FxHashMap<String, TaggedTypeDefinition>,
}

impl Default for TypeManager {
    fn default() -> Self {
        Self::new()
    }
}

const PRIMITIVE_NAMES: [&str; 3] = ["Number", "Text", "Boolean"];

impl TypeManager {
    /// A manager holding the built-in tagged types.
    pub fn new() -> Self {
        let mut types = FxHashMap::default();
        let optional = TaggedTypeDefinition {
            name: builtin::OPTIONAL.to_owned(),
            params: vec![TypeParam::Type("t".to_owned())],
            tags: vec![
                TagDefinition {
                    name: builtin::NONE.to_owned(),
                    payload: None,
                },
                TagDefinition {
                    name: builtin::IS.to_owned(),
                    payload: Some(TypeTerm::Var(TypeVarId::from_raw(0))),
                },
            ],
        };
        let type_of = TaggedTypeDefinition {
            name: builtin::TYPE.to_owned(),
            params: vec![TypeParam::Type("t".to_owned())],
            tags: Vec::new(),
        };
        let unit_of = TaggedTypeDefinition {
            name: builtin::UNIT.to_owned(),
            params: vec![TypeParam::Unit("u".to_owned())],
            tags: Vec::new(),
        };
        for def in [optional, type_of, unit_of] {
            types.insert(def.name.clone(), def);
        }
        TypeManager { types }
    }

    /// Add a tagged type. Names may not clash with built-in or existing types.
    pub fn register(&mut self, def: TaggedTypeDefinition) -> Result<(), TypeExprError> {
        let clashes_with_primitive = PRIMITIVE_NAMES.contains(&def.name.as_str())
            || TemporalKind::from_type_name(&def.name).is_some();
        if clashes_with_primitive || self.types.contains_key(&def.name) {
            return Err(TypeExprError::Duplicate(def.name));
        }
        tracing::debug!(name = %def.name, tags = def.tags.len(), "register tagged type");
        self.types.insert(def.name.clone(), def);
        Ok(())
    }

    pub fn get(&self, name: &str) -> Option<&TaggedTypeDefinition> {
        self.types.get(name)
    }

    /// Names of the types that have a tag called `tag`, sorted.
    pub fn types_with_tag(&self, tag: &str) -> Vec<&str> {
        let mut names: Vec<&str> = self
            .types
            .values()
            .filter(|def| def.tag_index(tag).is_some())
            .map(|def| def.name.as_str())
            .collect();
        names.sort_unstable();
        names
    }

    /// Every type name usable in type syntax, for suggestions.
    pub fn type_names(&self) -> Vec<&str> {
        let mut names: Vec<&str> = self.types.keys().map(String::as_str).collect();
        names.extend(PRIMITIVE_NAMES);
        names.extend(TemporalKind::ALL.into_iter().map(|kind| -> &str { kind.type_name() }));
        names.sort_unstable();
        names
    }

    /// Instantiate `type_name\tag` with fresh variables for the parameters.
    pub fn instantiate_tag(
        &self,
        type_name: &str,
        tag: &str,
        unifier: &mut Unifier,
    ) -> Option<TagInstance> {
        let def = self.types.get(type_name)?;
        let index = def.tag_index(tag)?;

        let mut types = FxHashMap::default();
        let mut units = FxHashMap::default();
        let mut args = Vec::with_capacity(def.params.len());
        for (i, param) in (0u32..).zip(&def.params) {
            match param {
                TypeParam::Type(_) => {
                    let fresh = unifier.fresh_type();
                    types.insert(TypeVarId::from_raw(i), fresh.clone());
                    args.push(TypeArg::Type(fresh));
                }
                TypeParam::Unit(_) => {
                    let fresh = unifier.fresh_unit();
                    units.insert(UnitVarId::from_raw(i), fresh.clone());
                    args.push(TypeArg::Unit(fresh));
                }
            }
        }

        let payload = def.tags[index]
            .payload
            .as_ref()
            .map(|p| p.substitute(&types, &units));
        Some(TagInstance {
            ty: TypeTerm::tagged(type_name, args),
            payload,
            index,
        })
    }

    /// Resolve written type syntax to a term.
    pub fn resolve_type_expr(
        &self,
        expr: &TypeExpr,
        units: &UnitManager,
    ) -> Result<TypeTerm, TypeExprError> {
        Ok(match expr {
            TypeExpr::Number(None) => TypeTerm::SCALAR,
            TypeExpr::Number(Some(unit)) => TypeTerm::Number(units.resolve(unit)?),
            TypeExpr::Text => TypeTerm::Text,
            TypeExpr::Boolean => TypeTerm::Boolean,
            TypeExpr::Temporal(kind) => TypeTerm::Temporal(*kind),
            TypeExpr::List(element) => TypeTerm::list(self.resolve_type_expr(element, units)?),
            TypeExpr::Tuple(items) => TypeTerm::Tuple(
                items
                    .iter()
                    .map(|t| self.resolve_type_expr(t, units))
                    .collect::<Result<_, _>>()?,
            ),
            TypeExpr::Record(fields) => {
                let mut out = Vec::with_capacity(fields.len());
                for (i, (name, ty)) in fields.iter().enumerate() {
                    if fields[..i].iter().any(|(other, _)| other == name) {
                        return Err(TypeExprError::Duplicate(name.clone()));
                    }
                    out.push((name.clone(), self.resolve_type_expr(ty, units)?));
                }
                TypeTerm::Record(RecordTerm::exact(out))
            }
            TypeExpr::Tagged { name, args } => self.resolve_tagged(name, args, units)?,
            TypeExpr::Invalid(text) => return Err(TypeExprError::Invalid(text.clone())),
        })
    }

    fn resolve_tagged(
        &self,
        name: &str,
        args: &[TypeArgExpr],
        units: &UnitManager,
    ) -> Result<TypeTerm, TypeExprError> {
        let Some(def) = self.types.get(name) else {
            let names = self.type_names();
            return Err(TypeExprError::UnknownType {
                name: name.to_owned(),
                suggestions: suggest_similar(name, names, 3)
                    .into_iter()
                    .map(str::to_owned)
                    .collect(),
            });
        };
        if def.params.len() != args.len() {
            return Err(TypeExprError::Arity {
                name: name.to_owned(),
                expected: def.params.len(),
                found: args.len(),
            });
        }
        let mut out = Vec::with_capacity(args.len());
        for (index, (param, arg)) in def.params.iter().zip(args).enumerate() {
            let resolved = match (param, arg) {
                (TypeParam::Type(_), TypeArgExpr::Type(t)) => {
                    TypeArg::Type(self.resolve_type_expr(t, units)?)
                }
                (TypeParam::Unit(_), TypeArgExpr::Unit(u)) => TypeArg::Unit(units.resolve(u)?),
                (TypeParam::Type(_), TypeArgExpr::Unit(_)) => {
                    return Err(TypeExprError::ArgKind {
                        name: name.to_owned(),
                        index,
                        expected: "type",
                    });
                }
                (TypeParam::Unit(_), TypeArgExpr::Type(_)) => {
                    return Err(TypeExprError::ArgKind {
                        name: name.to_owned(),
                        index,
                        expected: "unit",
                    });
                }
            };
            out.push(resolved);
        }
        Ok(TypeTerm::tagged(name, out))
    }
}

#[cfg(test)]
#[expect(clippy::unwrap_used, reason = "Tests use unwrap for brevity")]
mod tests;
