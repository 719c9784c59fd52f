//! Variable environment for type checking.

use std::rc::Rc;

use rustc_hash::FxHashMap;
use sheaf_ir::is_wildcard_name;

use crate::{DuplicateVariable, IntersectError, TypeTerm, Unifier};

/// Variables in scope and their candidate types.
///
/// A variable usually has one candidate. After the alternatives of a match
/// clause are merged it has one candidate per alternative that bound it;
/// those candidates have all been unified with each other.
///
/// The state is persistent: every operation returns a new state and shares
/// the untouched map with the old one until it is modified.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct TypeState {
    vars: Rc<FxHashMap<String, Vec<TypeTerm>>>,
}

impl TypeState {
    pub fn new() -> Self {
        Self::default()
    }

    /// Bind `name`. Fails if it is already bound, unless the name is a
    /// `_`-prefixed wildcard name, which is simply rebound.
    pub fn add(&self, name: &str, ty: TypeTerm) -> Result<TypeState, DuplicateVariable> {
        if self.vars.contains_key(name) && !is_wildcard_name(name) {
            return Err(DuplicateVariable(name.to_owned()));
        }
        let mut vars = (*self.vars).clone();
        vars.insert(name.to_owned(), vec![ty]);
        Ok(TypeState {
            vars: Rc::new(vars),
        })
    }

    /// Candidate types of `name`, if it is bound.
    pub fn find(&self, name: &str) -> Option<&[TypeTerm]> {
        self.vars.get(name).map(Vec::as_slice)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.vars.contains_key(name)
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.vars.keys().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.vars.len()
    }

    pub fn is_empty(&self) -> bool {
        self.vars.is_empty()
    }

    /// Names bound here but not in `original`.
    fn introduced_since<'a>(&'a self, original: &TypeState) -> Vec<&'a str> {
        let mut names: Vec<&str> = self
            .vars
            .keys()
            .filter(|k| !original.vars.contains_key(*k) || is_wildcard_name(k))
            .map(String::as_str)
            .collect();
        names.sort_unstable();
        names
    }

    /// Combine states from sibling patterns that all apply, such as the
    /// items of a tuple pattern. A name introduced by more than one branch
    /// is a duplicate.
    pub fn union(original: &TypeState, branches: &[TypeState]) -> Result<TypeState, DuplicateVariable> {
        let mut vars = (*original.vars).clone();
        for branch in branches {
            for name in branch.introduced_since(original) {
                let Some(candidates) = branch.vars.get(name) else {
                    continue;
                };
                let first_here = !vars.contains_key(name) || original.vars.contains_key(name);
                if !first_here && !is_wildcard_name(name) {
                    return Err(DuplicateVariable(name.to_owned()));
                }
                vars.insert(name.to_owned(), candidates.clone());
            }
        }
        Ok(TypeState {
            vars: Rc::new(vars),
        })
    }

    /// Combine states from alternative patterns, such as the `@case` and
    /// `@orcase` patterns of one clause. Every alternative must introduce the
    /// same names. The candidates for each name are kept together and
    /// unified now, so a conflict is reported at the clause rather than at a
    /// later use.
    pub fn intersect(
        original: &TypeState,
        branches: &[TypeState],
        unifier: &mut Unifier,
    ) -> Result<TypeState, IntersectError> {
        let Some((first, rest)) = branches.split_first() else {
            return Ok(original.clone());
        };
        let introduced = first.introduced_since(original);
        for branch in rest {
            let other = branch.introduced_since(original);
            let missing = introduced
                .iter()
                .find(|n| !other.contains(n))
                .or_else(|| other.iter().find(|n| !introduced.contains(n)));
            if let Some(name) = missing {
                return Err(IntersectError::OnlyInSome {
                    name: (*name).to_owned(),
                });
            }
        }

        let mut vars = (*original.vars).clone();
        for name in introduced {
            let candidates: Vec<TypeTerm> = branches
                .iter()
                .filter_map(|b| b.vars.get(name))
                .flatten()
                .cloned()
                .collect();
            if let Some((head, tail)) = candidates.split_first() {
                for ty in tail {
                    unifier
                        .unify(head, ty)
                        .map_err(|source| IntersectError::Mismatch {
                            name: name.to_owned(),
                            source,
                        })?;
                }
            }
            vars.insert(name.to_owned(), candidates);
        }
        Ok(TypeState {
            vars: Rc::new(vars),
        })
    }
}

#[cfg(test)]
#[expect(clippy::unwrap_used, reason = "Tests use unwrap for brevity")]
mod tests;
