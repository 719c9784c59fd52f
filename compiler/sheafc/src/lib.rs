//! Sheaf formula engine.
//!
//! Ties the workspace together: an [`Engine`] parses, checks and evaluates
//! formulas against a [`TableSet`], evaluating whole columns in parallel.
//! The `sheaf` binary is a thin driver over [`commands`].
//!
//! ```text
//! text ──parse──▶ Expr ──check──▶ CheckedExpression ──evaluate──▶ Value per row
//! ```

pub mod commands;
mod config;
mod engine;
pub mod report;
mod table;

pub use config::{
    EngineConfig, EXPLAIN_VAR, INTERNAL_ERRORS_VAR, MAX_ERRORS_VAR, THREADS_VAR,
};
pub use engine::{Engine, EngineError};
pub use table::{resolve_type, Table, TableColumn, TableError, TableSet};

pub use sheaf_check::CheckedExpression;
pub use sheaf_diagnostic::{Diagnostic, ErrorCode, QuickFix, Severity};
pub use sheaf_eval::ValueResult;
pub use sheaf_value::{EvalError, InternalErrorPolicy, UserError, Value};

use std::sync::Once;

/// Filter directives for log output, e.g. `sheaf_check=debug`.
pub const LOG_VAR: &str = "SHEAF_LOG";
/// `1` to render log output as an indented span tree.
pub const LOG_TREE_VAR: &str = "SHEAF_LOG_TREE";

static TRACING_INIT: Once = Once::new();

/// Install the global subscriber.
///
/// Reads filter directives from `SHEAF_LOG`, falling back to `RUST_LOG`;
/// installs nothing when neither is set. Safe to call more than once.
pub fn init_tracing() {
    TRACING_INIT.call_once(|| {
        use tracing_subscriber::{fmt, prelude::*, EnvFilter};

        let directives = std::env::var(LOG_VAR).or_else(|_| std::env::var("RUST_LOG"));
        let Ok(directives) = directives else {
            return;
        };
        let filter = EnvFilter::new(directives);
        let tree = std::env::var(LOG_TREE_VAR).is_ok_and(|v| v == "1");
        let registry = tracing_subscriber::registry().with(filter);
        if tree {
            registry
                .with(tracing_tree::HierarchicalLayer::new(2).with_targets(true))
                .init();
        } else {
            registry
                .with(fmt::layer().with_target(true).with_level(true))
                .init();
        }
    });
}
