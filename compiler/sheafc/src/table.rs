//! In-memory tables and the column lookup over them.
//!
//! A [`TableSet`] is what the checker sees as the table layer. Its first
//! table is the source table: unqualified `@column name` references look
//! there.
//!
//! Tables load from tab-separated text whose header cells are
//! `name:type`, e.g. `price:Number{USD}`.

use std::sync::Arc;

use sheaf_ir::TypeExpr;
use sheaf_types::{DataType, DataTypeArg, TypeExprError, TypeManager, Unifier, UnitManager};
use sheaf_value::{
    ColumnAccessor, ColumnInfo, ColumnLookup, EvalError, Number, TableInfo, Temporal, Value,
};

/// Error loading a table.
#[derive(Debug, thiserror::Error)]
pub enum TableError {
    #[error("the table has no header row")]
    MissingHeader,

    #[error("header cell `{cell}` must be written `name:type`")]
    BadHeader { cell: String },

    #[error("column `{column}` appears twice")]
    DuplicateColumn { column: String },

    #[error("type of column `{column}`: {message}")]
    BadType { column: String, message: String },

    #[error("column `{column}` has type {ty}, which cells cannot be read as")]
    UnsupportedType { column: String, ty: DataType },

    #[error("row {row} has {found} cells but the header has {expected}")]
    RowLength {
        row: usize,
        expected: usize,
        found: usize,
    },

    #[error("row {row}, column `{column}`: `{cell}` is not a {ty}")]
    BadCell {
        row: usize,
        column: String,
        cell: String,
        ty: DataType,
    },
}

/// One column's cells.
#[derive(Clone, Debug)]
pub struct TableColumn {
    pub name: String,
    pub ty: DataType,
    cells: Arc<[Value]>,
}

impl TableColumn {
    pub fn new(name: impl Into<String>, ty: DataType, cells: Vec<Value>) -> Self {
        TableColumn {
            name: name.into(),
            ty,
            cells: cells.into(),
        }
    }

    pub fn cells(&self) -> &[Value] {
        &self.cells
    }
}

struct Cells(Arc<[Value]>);

impl ColumnAccessor for Cells {
    fn len(&self) -> usize {
        self.0.len()
    }

    fn get(&self, row: usize) -> Result<Value, EvalError> {
        self.0.get(row).cloned().ok_or_else(|| {
            EvalError::internal(format!("row {row} is past the end of the column"))
        })
    }
}

/// A named table of equally long columns.
#[derive(Clone, Debug)]
pub struct Table {
    pub name: String,
    columns: Vec<TableColumn>,
    row_count: usize,
}

impl Table {
    /// An empty table with `row_count` rows and no columns yet.
    pub fn new(name: impl Into<String>, row_count: usize) -> Self {
        Table {
            name: name.into(),
            columns: Vec::new(),
            row_count,
        }
    }

    /// Add a column.
    ///
    /// # Errors
    ///
    /// When the name is taken or the column has the wrong number of cells.
    pub fn add_column(&mut self, column: TableColumn) -> Result<(), TableError> {
        if self.column(&column.name).is_some() {
            return Err(TableError::DuplicateColumn {
                column: column.name,
            });
        }
        if column.cells.len() != self.row_count {
            return Err(TableError::RowLength {
                row: column.cells.len().min(self.row_count) + 1,
                expected: self.row_count,
                found: column.cells.len(),
            });
        }
        self.columns.push(column);
        Ok(())
    }

    /// [`Table::add_column`] in builder form.
    ///
    /// # Errors
    ///
    /// As for [`Table::add_column`].
    pub fn with_column(
        mut self,
        name: &str,
        ty: DataType,
        cells: Vec<Value>,
    ) -> Result<Self, TableError> {
        self.add_column(TableColumn::new(name, ty, cells))?;
        Ok(self)
    }

    pub fn row_count(&self) -> usize {
        self.row_count
    }

    pub fn columns(&self) -> &[TableColumn] {
        &self.columns
    }

    pub fn column(&self, name: &str) -> Option<&TableColumn> {
        self.columns.iter().find(|c| c.name == name)
    }

    /// Read a table from tab-separated text.
    ///
    /// # Errors
    ///
    /// On a malformed header, an unknown type, or a cell that does not
    /// read as its column's type.
    pub fn from_tsv(
        name: &str,
        text: &str,
        types: &TypeManager,
        units: &UnitManager,
    ) -> Result<Table, TableError> {
        let mut lines = text.lines().filter(|line| !line.trim().is_empty());
        let header = lines.next().ok_or(TableError::MissingHeader)?;
        let headers = header
            .split('\t')
            .map(|cell| read_header(cell, types, units))
            .collect::<Result<Vec<_>, _>>()?;

        let mut cells: Vec<Vec<Value>> = vec![Vec::new(); headers.len()];
        let mut row_count = 0;
        for (index, line) in lines.enumerate() {
            let row = index + 1;
            let fields: Vec<&str> = line.split('\t').collect();
            if fields.len() != headers.len() {
                return Err(TableError::RowLength {
                    row,
                    expected: headers.len(),
                    found: fields.len(),
                });
            }
            for ((column, ty), (field, out)) in headers.iter().zip(fields.iter().zip(&mut cells)) {
                let value = read_cell(field, ty).ok_or_else(|| TableError::BadCell {
                    row,
                    column: column.clone(),
                    cell: (*field).to_owned(),
                    ty: ty.clone(),
                })?;
                out.push(value);
            }
            row_count += 1;
        }

        let mut table = Table::new(name, row_count);
        for ((column, ty), cells) in headers.into_iter().zip(cells) {
            table.add_column(TableColumn::new(column, ty, cells))?;
        }
        tracing::debug!(table = name, rows = row_count, columns = table.columns.len(), "loaded table");
        Ok(table)
    }

    fn column_info(&self, column: &TableColumn) -> ColumnInfo {
        ColumnInfo {
            table: self.name.clone(),
            name: column.name.clone(),
            ty: column.ty.clone(),
            accessor: Arc::new(Cells(Arc::clone(&column.cells))),
            advisory: None,
        }
    }

    fn info(&self) -> TableInfo {
        TableInfo {
            name: self.name.clone(),
            columns: self.columns.iter().map(|c| self.column_info(c)).collect(),
            row_count: self.row_count,
        }
    }
}

fn read_header(
    cell: &str,
    types: &TypeManager,
    units: &UnitManager,
) -> Result<(String, DataType), TableError> {
    let Some((name, ty)) = cell.split_once(':') else {
        return Err(TableError::BadHeader {
            cell: cell.to_owned(),
        });
    };
    let name = name.split_whitespace().collect::<Vec<_>>().join(" ");
    if name.is_empty() {
        return Err(TableError::BadHeader {
            cell: cell.to_owned(),
        });
    }
    let bad_type = |message: String| TableError::BadType {
        column: name.clone(),
        message,
    };
    let expr = sheaf_parse::parse_type(ty).map_err(|err| bad_type(err.message))?;
    let ty = resolve_type(&expr, types, units).map_err(|err| bad_type(err.to_string()))?;
    if !readable(&ty) {
        return Err(TableError::UnsupportedType { column: name, ty });
    }
    Ok((name, ty))
}

/// Resolve written type syntax to a concrete type.
pub fn resolve_type(
    expr: &TypeExpr,
    types: &TypeManager,
    units: &UnitManager,
) -> Result<DataType, TypeExprError> {
    let term = types.resolve_type_expr(expr, units)?;
    Unifier::new()
        .to_concrete(&term)
        .map_err(|err| TypeExprError::Invalid(err.to_string()))
}

fn readable(ty: &DataType) -> bool {
    match ty {
        DataType::Number(_) | DataType::Text | DataType::Boolean | DataType::Temporal(_) => true,
        DataType::Tagged { name, args } if name == "Optional" => {
            matches!(args.as_slice(), [DataTypeArg::Type(inner)] if readable(inner))
        }
        _ => false,
    }
}

/// A cell as a value of `ty`. An empty cell of an optional column is
/// `None`.
fn read_cell(field: &str, ty: &DataType) -> Option<Value> {
    match ty {
        DataType::Number(_) => Number::parse(field).map(Value::Number),
        DataType::Text => Some(Value::text(field)),
        DataType::Boolean => match field.trim() {
            "true" => Some(Value::Boolean(true)),
            "false" => Some(Value::Boolean(false)),
            _ => None,
        },
        DataType::Temporal(kind) => Temporal::parse(*kind, field).ok().map(Value::Temporal),
        DataType::Tagged { args, .. } => {
            let [DataTypeArg::Type(inner)] = args.as_slice() else {
                return None;
            };
            if field.trim().is_empty() {
                return Some(Value::none());
            }
            read_cell(field, inner).map(Value::some)
        }
        _ => None,
    }
}

/// The tables a formula can reference.
#[derive(Clone, Debug, Default)]
pub struct TableSet {
    tables: Vec<Table>,
}

impl TableSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// A set whose source table is `table`.
    pub fn single(table: Table) -> Self {
        TableSet {
            tables: vec![table],
        }
    }

    /// Add a table; the first one added is the source table.
    pub fn add(&mut self, table: Table) {
        self.tables.push(table);
    }

    pub fn source(&self) -> Option<&Table> {
        self.tables.first()
    }

    pub fn is_empty(&self) -> bool {
        self.tables.is_empty()
    }

    pub fn get(&self, name: &str) -> Option<&Table> {
        self.tables.iter().find(|t| t.name == name)
    }

    /// Rows of the source table, zero without one.
    pub fn row_count(&self) -> usize {
        self.source().map_or(0, Table::row_count)
    }
}

impl ColumnLookup for TableSet {
    fn column(&self, table: Option<&str>, column: &str) -> Option<ColumnInfo> {
        let table = match table {
            Some(name) => self.get(name)?,
            None => self.source()?,
        };
        table.column(column).map(|c| table.column_info(c))
    }

    fn table(&self, table: &str) -> Option<TableInfo> {
        self.get(table).map(Table::info)
    }
}

#[cfg(test)]
#[expect(clippy::unwrap_used, reason = "Tests use unwrap for brevity")]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use sheaf_types::Unit;

    fn load(text: &str) -> Result<Table, TableError> {
        Table::from_tsv(
            "Orders",
            text,
            &TypeManager::new(),
            &UnitManager::with_builtin_units(),
        )
    }

    #[test]
    fn reads_typed_columns() {
        let table = load(
            "price:Number{USD}\tname:Text\tpaid:Boolean\tnote:Optional(Text)\n\
             10\tpen\ttrue\t\n\
             2.5\tink\tfalse\tblue\n",
        )
        .unwrap();
        assert_eq!(table.row_count(), 2);
        let price = table.column("price").unwrap();
        assert_eq!(price.ty, DataType::Number(Unit::named("USD")));
        assert_eq!(price.cells()[1].to_string(), "2.5");
        let note = table.column("note").unwrap();
        assert_eq!(note.cells()[0].to_string(), "None");
        assert_eq!(note.cells()[1].to_string(), "Is(\"blue\")");
    }

    #[test]
    fn header_names_may_contain_spaces() {
        let table = load("unit price:Number\n3\n").unwrap();
        assert!(table.column("unit price").is_some());
    }

    #[test]
    fn rejects_malformed_tables() {
        assert!(matches!(load(""), Err(TableError::MissingHeader)));
        assert!(matches!(load("price\n1\n"), Err(TableError::BadHeader { .. })));
        assert!(matches!(load("a:Nmber\n1\n"), Err(TableError::BadType { .. })));
        assert!(matches!(
            load("a:[Number]\n1\n"),
            Err(TableError::UnsupportedType { .. })
        ));
        assert!(matches!(
            load("a:Number\tb:Number\n1\n"),
            Err(TableError::RowLength { row: 1, .. })
        ));
        assert!(matches!(
            load("a:Number\nten\n"),
            Err(TableError::BadCell { row: 1, .. })
        ));
    }

    #[test]
    fn source_table_answers_unqualified_columns() {
        let orders = Table::new("Orders", 1)
            .with_column("id", DataType::SCALAR, vec![Value::number(7)])
            .unwrap();
        let items = Table::new("Items", 1)
            .with_column("id", DataType::Text, vec![Value::text("x")])
            .unwrap();
        let mut set = TableSet::new();
        assert!(set.is_empty());
        set.add(orders);
        set.add(items);
        assert!(!set.is_empty());

        let id = set.column(None, "id").unwrap();
        assert_eq!(id.table, "Orders");
        assert_eq!(set.column(Some("Items"), "id").unwrap().ty, DataType::Text);
        assert!(set.column(Some("Nowhere"), "id").is_none());
        assert_eq!(set.table("Items").unwrap().row_count, 1);
        assert_eq!(set.row_count(), 1);
    }

    #[test]
    fn built_columns_must_fit_the_table() {
        let table = Table::new("Orders", 2)
            .with_column("id", DataType::SCALAR, vec![Value::number(1), Value::number(2)])
            .unwrap();
        let duplicate = table
            .clone()
            .with_column("id", DataType::Text, vec![Value::text("a"), Value::text("b")]);
        assert!(matches!(duplicate, Err(TableError::DuplicateColumn { .. })));
        let short = table.with_column("name", DataType::Text, vec![Value::text("a")]);
        assert!(matches!(
            short,
            Err(TableError::RowLength {
                expected: 2,
                found: 1,
                ..
            })
        ));
    }
}
