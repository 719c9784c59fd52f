//! Evaluation of each node kind, grouped by category:
//!
//! - `operators`: arithmetic, text, boolean, equality and comparison chains
//! - `pattern`: matching values against patterns
//! - `control`: `@if`, `@match` and `@define`
//! - `call`: calls, lambdas and structured values
//!
//! Each module adds methods to [`Evaluator`](crate::Evaluator), which
//! dispatches to them by node kind.

mod call;
mod control;
mod operators;
mod pattern;
