//! Types and units for sheaf formulas.
//!
//! # Terms and concrete types
//!
//! During checking every node gets a [`TypeTerm`], which may contain type,
//! row and unit variables. A [`Unifier`] holds the substitution for those
//! variables. Once checking is done, terms are converted to variable-free
//! [`DataType`]s; a term that still has variables at that point is an error.
//!
//! # Units
//!
//! Units form an abelian group: [`UnitTerm`]s are normalized to
//! [`UnitExponents`] (names and variables to integer powers) before they are
//! compared, so `m*s` and `s*m` are the same unit. Unit variables are solved
//! by integer elimination, which gives most general solutions such as
//! `?u = m^(1/2)` being rejected but `?u^2 = m^2` giving `?u = m`.
//!
//! # Environments
//!
//! [`TypeState`] maps variable names to their candidate types. It is
//! persistent: extending it returns a new state and leaves the old one
//! untouched, so sibling patterns can each start from the same state.

mod data_type;
mod error;
mod scheme;
mod state;
mod term;
mod type_manager;
mod unify;
mod unit;
mod unit_manager;

pub use data_type::{DataType, DataTypeArg};
pub use error::{
    ArityKind, ConcreteError, DuplicateVariable, IntersectError, TypeError, TypeExprError,
    UnitError, UnitMismatch,
};
pub use scheme::{SchemeBuilder, TypeScheme};
pub use state::TypeState;
pub use term::{RecordTerm, RowVarId, TypeArg, TypeClasses, TypeTerm, TypeVarId};
pub use type_manager::{
    builtin, TagDefinition, TagInstance, TaggedTypeDefinition, TypeManager, TypeParam,
};
pub use unify::{Snapshot, Unifier};
pub use unit::{Unit, UnitExponents, UnitTerm, UnitVarId};
pub use unit_manager::{UnitDeclaration, UnitDefinition, UnitManager};
