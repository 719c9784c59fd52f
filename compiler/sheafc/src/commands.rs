//! Command handlers for the `sheaf` CLI.
//!
//! Each handler returns a [`CommandOutput`] instead of printing, so the
//! binary decides where text goes and tests can inspect it.

use std::path::Path;

use sheaf_value::NoColumns;

use crate::engine::Engine;
use crate::report::{render_diagnostics, render_eval_error};
use crate::table::{Table, TableError, TableSet};

/// Name the formula has in rendered diagnostics.
const FORMULA_NAME: &str = "formula";

#[derive(Debug, Default, PartialEq, Eq)]
pub struct CommandOutput {
    pub stdout: String,
    pub stderr: String,
    pub success: bool,
}

impl CommandOutput {
    fn ok(stdout: String) -> Self {
        CommandOutput {
            stdout,
            stderr: String::new(),
            success: true,
        }
    }

    fn failed(stderr: String) -> Self {
        CommandOutput {
            stdout: String::new(),
            stderr,
            success: false,
        }
    }

    pub fn exit_code(&self) -> i32 {
        i32::from(!self.success)
    }
}

/// Error reading a table file.
#[derive(Debug, thiserror::Error)]
pub enum LoadError {
    #[error("could not read {path}: {source}")]
    Io {
        path: String,
        source: std::io::Error,
    },
    #[error("{path}: {source}")]
    Table { path: String, source: TableError },
}

/// Load a TSV table; its name is the file stem.
pub fn load_table(engine: &Engine, path: &str) -> Result<Table, LoadError> {
    let text = std::fs::read_to_string(path).map_err(|source| LoadError::Io {
        path: path.to_owned(),
        source,
    })?;
    let name = Path::new(path)
        .file_stem()
        .map_or_else(|| path.to_owned(), |stem| stem.to_string_lossy().into_owned());
    Table::from_tsv(&name, &text, engine.types(), engine.units()).map_err(|source| {
        LoadError::Table {
            path: path.to_owned(),
            source,
        }
    })
}

/// `sheaf check`: print the formula's type, or its diagnostics.
pub fn check_formula(
    engine: &Engine,
    formula: &str,
    tables: Option<&TableSet>,
    color: bool,
) -> CommandOutput {
    let checked = match tables {
        Some(tables) => engine.check_text(formula, tables),
        None => engine.check_text(formula, &NoColumns),
    };
    match checked {
        Ok(checked) => {
            let mut stdout = format!("{}\n", checked.ty());
            if !checked.notes().is_empty() {
                let notes = render_diagnostics(checked.notes(), formula, FORMULA_NAME, color);
                stdout.push_str(&notes);
            }
            CommandOutput::ok(stdout)
        }
        Err(diagnostics) => CommandOutput::failed(render_diagnostics(
            &diagnostics,
            formula,
            FORMULA_NAME,
            color,
        )),
    }
}

/// `sheaf eval`: print one value per row of the source table.
///
/// Failing rows print their error to stderr and make the command fail,
/// but every row is still evaluated.
pub fn eval_formula(
    engine: &Engine,
    formula: &str,
    tables: &TableSet,
    color: bool,
) -> CommandOutput {
    let checked = match engine.check_text(formula, tables) {
        Ok(checked) => checked,
        Err(diagnostics) => {
            return CommandOutput::failed(render_diagnostics(
                &diagnostics,
                formula,
                FORMULA_NAME,
                color,
            ))
        }
    };
    let mut output = CommandOutput::ok(String::new());
    for (row, result) in engine
        .evaluate_column(&checked, tables.row_count())
        .into_iter()
        .enumerate()
    {
        match result {
            Ok(value) => {
                output.stdout.push_str(&value.to_string());
                output.stdout.push('\n');
            }
            Err(err) => {
                output.stdout.push('\n');
                output.stderr.push_str(&render_eval_error(row, &err));
                output.stderr.push('\n');
                output.success = false;
            }
        }
    }
    output
}

/// `sheaf fmt`: print the formula in canonical form.
pub fn format_formula(formula: &str, color: bool) -> CommandOutput {
    match sheaf_parse::parse(formula) {
        Ok(expr) => CommandOutput::ok(format!("{}\n", sheaf_fmt::save(&expr))),
        Err(err) => CommandOutput::failed(render_diagnostics(
            &[err.to_diagnostic()],
            formula,
            FORMULA_NAME,
            color,
        )),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::EngineConfig;
    use pretty_assertions::assert_eq;
    use sheaf_types::{DataType, Unit};
    use sheaf_value::{Number, Value};

    #[expect(clippy::unwrap_used, reason = "Tests use unwrap for brevity")]
    fn engine() -> Engine {
        Engine::new(EngineConfig::default()).unwrap()
    }

    #[expect(clippy::unwrap_used, reason = "Tests use unwrap for brevity")]
    fn lengths() -> TableSet {
        let cells = [4_i64, 0, 2]
            .into_iter()
            .map(|n| Value::Number(Number::from(n)))
            .collect();
        let walls = Table::new("Walls", 3)
            .with_column("length", DataType::Number(Unit::named("m")), cells)
            .unwrap();
        TableSet::single(walls)
    }

    #[test]
    fn check_prints_the_type() {
        let output = check_formula(&engine(), "1{m} + 2{m}", None, false);
        assert!(output.success);
        assert_eq!(output.stdout.lines().next(), Some("Number{m}"));
    }

    #[test]
    fn check_renders_errors() {
        let output = check_formula(&engine(), "1{m} + 2{s}", None, false);
        assert!(!output.success);
        assert_eq!(output.exit_code(), 1);
        assert!(output.stderr.contains("E2002"), "{}", output.stderr);
    }

    #[test]
    fn eval_prints_each_row() {
        let output = eval_formula(&engine(), "@column length * 2", &lengths(), false);
        assert!(output.success, "{}", output.stderr);
        assert_eq!(output.stdout, "8\n0\n4\n");
    }

    #[test]
    fn eval_reports_failing_rows() {
        let output = eval_formula(&engine(), "12{m} / @column length", &lengths(), false);
        assert!(!output.success);
        assert_eq!(output.stdout, "3\n\n6\n");
        assert_eq!(output.stderr, "row 2: error: division by zero\n");
    }

    #[test]
    fn fmt_prints_canonical_text() {
        let output = format_formula("(1+2)*3", false);
        assert_eq!(output.stdout, "(1 + 2) * 3\n");
        assert!(!format_formula("1 +", false).success);
    }
}
