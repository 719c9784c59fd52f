//! Runtime side of the sheaf expression engine.
//!
//! - [`Value`]: what a formula evaluates to
//! - [`EvaluateState`]: variables bound while evaluating one row
//! - [`EvalError`]: user errors versus internal errors
//! - [`ColumnLookup`] and [`FunctionLookup`]: what callers supply

mod error;
mod lookup;
mod number;
mod state;
mod temporal;
mod value;

pub use error::{EvalError, EvalResult, InternalError, InternalErrorPolicy, UserError};
pub use lookup::{
    CallSite, ColumnAccessor, ColumnInfo, ColumnLookup, FunctionDefinition, FunctionLookup,
    InstantiateError, NoColumns, TableInfo,
};
pub use number::Number;
pub use state::EvaluateState;
pub use temporal::{Temporal, TemporalError};
pub use value::{ElementFn, FunctionValue, ListValue, NativeFn, TaggedValue, Value};
