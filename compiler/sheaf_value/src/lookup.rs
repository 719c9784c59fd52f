//! Interfaces to the table layer and the function registry.
//!
//! The engine never owns table data or function implementations. Callers
//! supply them through these traits, and the checker resolves every name
//! once so the evaluator only reads settled results.

use std::fmt;
use std::sync::Arc;

use sheaf_types::{DataType, TypeScheme, UnitManager};

use crate::{EvalError, FunctionValue, ListValue, Value};

/// Row-indexed read access to one column.
pub trait ColumnAccessor: Send + Sync {
    fn len(&self) -> usize;

    fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Value of the cell at `row`.
    fn get(&self, row: usize) -> Result<Value, EvalError>;
}

/// A resolved column.
#[derive(Clone)]
pub struct ColumnInfo {
    /// Table the column was found in.
    pub table: String,
    pub name: String,
    pub ty: DataType,
    pub accessor: Arc<dyn ColumnAccessor>,
    /// Shown to the user as information, e.g. "column is computed later".
    pub advisory: Option<String>,
}

impl ColumnInfo {
    pub fn cell(&self, row: usize) -> Result<Value, EvalError> {
        self.accessor.get(row)
    }

    /// Every cell of the column, read on demand.
    pub fn whole(&self) -> ListValue {
        let accessor = Arc::clone(&self.accessor);
        ListValue::lazy(accessor.len(), move |row| accessor.get(row))
    }
}

impl fmt::Debug for ColumnInfo {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ColumnInfo")
            .field("table", &self.table)
            .field("name", &self.name)
            .field("ty", &self.ty)
            .field("advisory", &self.advisory)
            .finish_non_exhaustive()
    }
}

/// A resolved table.
#[derive(Clone, Debug)]
pub struct TableInfo {
    pub name: String,
    pub columns: Vec<ColumnInfo>,
    pub row_count: usize,
}

impl TableInfo {
    /// Type of one row: a record of the column types.
    pub fn row_type(&self) -> DataType {
        DataType::Record(
            self.columns
                .iter()
                .map(|c| (c.name.clone(), c.ty.clone()))
                .collect(),
        )
    }

    /// All rows as records, read on demand.
    pub fn rows(&self) -> ListValue {
        let columns = Arc::new(self.columns.clone());
        ListValue::lazy(self.row_count, move |row| {
            let mut fields = Vec::with_capacity(columns.len());
            for column in columns.iter() {
                fields.push((column.name.clone(), column.cell(row)?));
            }
            Ok(Value::record(fields))
        })
    }
}

/// Resolves column and table names for the checker.
pub trait ColumnLookup: Send + Sync {
    /// Find `column`, in `table` if given, otherwise in the source table.
    fn column(&self, table: Option<&str>, column: &str) -> Option<ColumnInfo>;

    fn table(&self, table: &str) -> Option<TableInfo>;
}

/// A lookup with no tables, for formulas that use no columns.
#[derive(Copy, Clone, Debug, Default)]
pub struct NoColumns;

impl ColumnLookup for NoColumns {
    fn column(&self, _table: Option<&str>, _column: &str) -> Option<ColumnInfo> {
        None
    }

    fn table(&self, _table: &str) -> Option<TableInfo> {
        None
    }
}

// ========================================
// Functions
// ========================================

/// The settled types at one call site of a function.
///
/// Parameter types that stayed polymorphic are `None`.
#[derive(Clone, Copy, Debug)]
pub struct CallSite<'a> {
    pub params: &'a [Option<DataType>],
    pub ret: Option<&'a DataType>,
    pub units: &'a UnitManager,
}

impl CallSite<'_> {
    pub fn param(&self, index: usize) -> Option<&DataType> {
        self.params.get(index).and_then(Option::as_ref)
    }
}

#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
#[error("{0}")]
pub struct InstantiateError(pub String);

/// A function callable from formulas.
pub trait FunctionDefinition: Send + Sync {
    fn name(&self) -> &str;

    /// Signature, with fresh variables taken at every call site.
    fn scheme(&self) -> &TypeScheme;

    /// Build the callable for one call site once its types are known.
    /// Only called after the call site checked successfully.
    fn instantiate(&self, site: &CallSite<'_>) -> Result<FunctionValue, InstantiateError>;
}

/// Resolves function names for the checker.
pub trait FunctionLookup: Send + Sync {
    fn lookup(&self, name: &str) -> Option<Arc<dyn FunctionDefinition>>;

    /// Every function name, for suggestions.
    fn names(&self) -> Vec<&str>;
}
