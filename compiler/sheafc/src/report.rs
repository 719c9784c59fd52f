//! Terminal rendering of diagnostics and evaluation errors.

use ariadne::{Color, Config, Label, Report, ReportKind, Source};
use sheaf_diagnostic::{Diagnostic, Severity};
use sheaf_value::EvalError;

/// Render `diagnostics` against `source`, which is named `name` in the
/// output.
///
/// Diagnostics without a source location (built from trees with no text)
/// are reported at the start of the formula.
pub fn render_diagnostics(
    diagnostics: &[Diagnostic],
    source: &str,
    name: &str,
    color: bool,
) -> String {
    let mut output = Vec::new();
    for diagnostic in diagnostics {
        let range = clamp(diagnostic.span.to_range(), source.len());
        let kind = match diagnostic.severity {
            Severity::Error => ReportKind::Error,
            Severity::Note => ReportKind::Advice,
        };
        let mut report = Report::build(kind, name, range.start)
            .with_config(Config::default().with_color(color))
            .with_code(diagnostic.code.as_str())
            .with_message(&diagnostic.message)
            .with_label(
                Label::new((name, range))
                    .with_message(&diagnostic.message)
                    .with_color(Color::Red),
            );
        for note in &diagnostic.notes {
            report = report.with_note(note);
        }
        for fix in &diagnostic.fixes {
            report = report.with_help(fix.title());
        }
        if let Err(err) = report
            .finish()
            .write((name, Source::from(source)), &mut output)
        {
            tracing::warn!("could not render diagnostic: {err}");
            output.extend_from_slice(format!("{diagnostic}\n").as_bytes());
        }
    }
    String::from_utf8_lossy(&output).into_owned()
}

/// One line describing a failed cell.
pub fn render_eval_error(row: usize, err: &EvalError) -> String {
    match err {
        EvalError::User(err) => format!("row {}: error: {err}", row + 1),
        EvalError::Internal(err) => format!("row {}: {err}", row + 1),
    }
}

fn clamp(range: std::ops::Range<usize>, len: usize) -> std::ops::Range<usize> {
    let start = range.start.min(len);
    start..range.end.clamp(start, len)
}

#[cfg(test)]
mod tests {
    use super::*;
    use sheaf_diagnostic::{ErrorCode, QuickFix};
    use sheaf_ir::{Expr, ExprKind, NodeId, Span};
    use sheaf_value::UserError;

    #[test]
    fn renders_message_notes_and_fixes() {
        let mut diagnostic =
            Diagnostic::error(ErrorCode::E2002, NodeId::from_raw(0), Span::new(9, 13))
                .with_message("units do not match")
                .with_note("left side is in m");
        diagnostic.fixes.push(QuickFix::new("change the unit to {m}", NodeId::from_raw(0), || {
            Expr::synthetic(ExprKind::Missing)
        }));
        let text = render_diagnostics(&[diagnostic], "1{m} + 2{s}", "formula", false);
        assert!(text.contains("units do not match"), "{text}");
        assert!(text.contains("left side is in m"), "{text}");
        assert!(text.contains("change the unit to {m}"), "{text}");
    }

    #[test]
    fn spans_past_the_source_are_clamped() {
        assert_eq!(clamp(4..20, 10), 4..10);
        assert_eq!(clamp(12..20, 10), 10..10);
        assert_eq!(clamp(0..0, 10), 0..0);
    }

    #[test]
    fn eval_errors_count_rows_from_one() {
        let err = EvalError::User(UserError::DivisionByZero);
        assert_eq!(render_eval_error(0, &err), "row 1: error: division by zero");
    }
}
