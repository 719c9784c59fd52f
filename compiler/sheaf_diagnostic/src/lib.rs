//! Diagnostics for formula checking.
//!
//! Every problem the checker finds becomes a [`Diagnostic`] attached to the
//! [`NodeId`](sheaf_ir::NodeId) that caused it, together with zero or more
//! [`QuickFix`]es. Diagnostics are collected in a [`DiagnosticBag`]; the only
//! way to obtain an [`ErrorGuaranteed`] is to put an error into a bag, so a
//! failed check always has something to show the user.

mod bag;
mod diagnostic;
mod error_code;
mod fix;
mod guarantee;
mod suggest;

pub use bag::DiagnosticBag;
pub use diagnostic::{Diagnostic, Severity};
pub use error_code::ErrorCode;
pub use fix::QuickFix;
pub use guarantee::ErrorGuaranteed;
pub use suggest::suggest_similar;
