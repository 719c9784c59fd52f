//! Sheaf CLI
//!
//! Check, evaluate and format formulas from the command line.

use std::io::IsTerminal;

use sheafc::commands::{check_formula, eval_formula, format_formula, load_table, CommandOutput};
use sheafc::{init_tracing, Engine, EngineConfig, TableSet};

fn main() {
    init_tracing();
    let args: Vec<String> = std::env::args().collect();

    if args.len() < 2 {
        print_usage();
        return;
    }

    let command = &args[1];
    let color = std::io::stderr().is_terminal();

    match command.as_str() {
        "check" => {
            let Some((formula, tables)) = formula_and_tables(&args[2..]) else {
                eprintln!("Usage: sheaf check <formula> [--table <file.tsv>]...");
                std::process::exit(1);
            };
            let engine = engine();
            let tables = load_tables(&engine, &tables);
            let tables = (!tables.is_empty()).then_some(&tables);
            finish(&check_formula(&engine, &formula, tables, color));
        }
        "eval" => {
            let Some((formula, tables)) = formula_and_tables(&args[2..]) else {
                eprintln!("Usage: sheaf eval <formula> --table <file.tsv> [--table <file.tsv>]...");
                eprintln!();
                eprintln!("Prints one value per row of the first table.");
                std::process::exit(1);
            };
            if tables.is_empty() {
                eprintln!("error: eval needs at least one --table");
                std::process::exit(1);
            }
            let engine = engine();
            let tables = load_tables(&engine, &tables);
            finish(&eval_formula(&engine, &formula, &tables, color));
        }
        "fmt" => {
            if args.len() < 3 {
                eprintln!("Usage: sheaf fmt <formula>");
                std::process::exit(1);
            }
            finish(&format_formula(&args[2], color));
        }
        "help" | "--help" | "-h" => {
            print_usage();
        }
        "version" | "--version" | "-v" => {
            println!("sheaf {}", env!("CARGO_PKG_VERSION"));
        }
        _ => {
            eprintln!("Unknown command: {command}");
            eprintln!();
            print_usage();
            std::process::exit(1);
        }
    }
}

/// Split `<formula> [--table <path>]...` in any order.
fn formula_and_tables(args: &[String]) -> Option<(String, Vec<String>)> {
    let mut formula = None;
    let mut tables = Vec::new();
    let mut i = 0;
    while i < args.len() {
        if args[i] == "--table" || args[i] == "-t" {
            tables.push(args.get(i + 1)?.clone());
            i += 2;
        } else if let Some(path) = args[i].strip_prefix("--table=") {
            tables.push(path.to_owned());
            i += 1;
        } else if formula.is_none() {
            formula = Some(args[i].clone());
            i += 1;
        } else {
            eprintln!("error: unexpected argument '{}'", args[i]);
            return None;
        }
    }
    formula.map(|formula| (formula, tables))
}

fn engine() -> Engine {
    match Engine::new(EngineConfig::from_env()) {
        Ok(engine) => engine,
        Err(err) => {
            eprintln!("error: {err}");
            std::process::exit(1);
        }
    }
}

fn load_tables(engine: &Engine, paths: &[String]) -> TableSet {
    let mut tables = TableSet::new();
    for path in paths {
        match load_table(engine, path) {
            Ok(table) => tables.add(table),
            Err(err) => {
                eprintln!("error: {err}");
                std::process::exit(1);
            }
        }
    }
    tables
}

fn finish(output: &CommandOutput) {
    print!("{}", output.stdout);
    eprint!("{}", output.stderr);
    if !output.success {
        std::process::exit(output.exit_code());
    }
}

fn print_usage() {
    println!("Sheaf formula engine");
    println!();
    println!("Usage: sheaf <command> [options]");
    println!();
    println!("Commands:");
    println!("  check <formula>      Type check a formula and print its type");
    println!("  eval <formula>       Evaluate a formula for every row of a table");
    println!("  fmt <formula>        Print a formula in canonical form");
    println!("  help                 Show this help message");
    println!("  version              Show version information");
    println!();
    println!("Options:");
    println!("  --table <file.tsv>   Make a table available; the first one is the source");
    println!("                       table. Header cells are written name:type.");
    println!();
    println!("Environment:");
    println!("  SHEAF_LOG            Log filter, e.g. sheaf_check=debug");
    println!("  SHEAF_LOG_TREE=1     Show logs as a span tree");
    println!("  SHEAF_THREADS        Evaluation threads (0 for the default)");
    println!("  SHEAF_EXPLAIN=1      Record operand results while evaluating");
    println!("  SHEAF_MAX_ERRORS     Maximum diagnostics per check (0 for no limit)");
    println!("  SHEAF_INTERNAL_ERRORS  panic or report");
}
