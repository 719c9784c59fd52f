//! Units, types and literal escapes.

use sheaf_ir::{TypeArgExpr, TypeExpr, UnitExpr};

use crate::Saver;

impl Saver {
    /// `"text"` with `"`, `\`, newlines and tabs escaped.
    pub(crate) fn text(&mut self, text: &str) {
        self.emit_char('"');
        for c in text.chars() {
            match c {
                '\\' => self.emit("\\\\"),
                '"' => self.emit("\\\""),
                '\n' => self.emit("\\n"),
                '\t' => self.emit("\\t"),
                _ => self.emit_char(c),
            }
        }
        self.emit_char('"');
    }

    pub(crate) fn braced_unit(&mut self, unit: &UnitExpr) {
        self.emit_char('{');
        self.unit(unit);
        self.emit_char('}');
    }

    /// `^` binds tightest, then `*`, then a left-associative `/`.
    pub fn unit(&mut self, unit: &UnitExpr) {
        match unit {
            UnitExpr::One => self.emit_char('1'),
            UnitExpr::Single(name) => self.emit(name),
            UnitExpr::Times(factors) => {
                for (i, factor) in factors.iter().enumerate() {
                    if i > 0 {
                        self.emit_char('*');
                    }
                    let bracket = matches!(factor, UnitExpr::Times(_) | UnitExpr::Divide(..));
                    self.unit_operand(factor, bracket);
                }
            }
            UnitExpr::Divide(numerator, denominator) => {
                self.unit(numerator);
                self.emit_char('/');
                let bracket = matches!(**denominator, UnitExpr::Times(_) | UnitExpr::Divide(..));
                self.unit_operand(denominator, bracket);
            }
            UnitExpr::Raise(base, power) => {
                self.unit_operand(base, base.is_compound());
                self.emit_char('^');
                self.emit(&power.to_string());
            }
            UnitExpr::Invalid(text) => self.emit(text),
        }
    }

    fn unit_operand(&mut self, unit: &UnitExpr, bracket: bool) {
        if bracket {
            self.emit_char('(');
            self.unit(unit);
            self.emit_char(')');
        } else {
            self.unit(unit);
        }
    }

    pub fn type_expr(&mut self, ty: &TypeExpr) {
        match ty {
            TypeExpr::Number(None) => self.emit("Number"),
            TypeExpr::Number(Some(unit)) => {
                self.emit("Number");
                self.braced_unit(unit);
            }
            TypeExpr::Text => self.emit("Text"),
            TypeExpr::Boolean => self.emit("Boolean"),
            TypeExpr::Temporal(kind) => self.emit(kind.type_name()),
            TypeExpr::List(element) => {
                self.emit_char('[');
                self.type_expr(element);
                self.emit_char(']');
            }
            TypeExpr::Tuple(items) => {
                self.emit_char('(');
                for (i, item) in items.iter().enumerate() {
                    if i > 0 {
                        self.emit(", ");
                    }
                    self.type_expr(item);
                }
                if items.len() == 1 {
                    self.emit_char(',');
                }
                self.emit_char(')');
            }
            TypeExpr::Record(fields) => {
                self.emit_char('(');
                for (i, (name, field)) in fields.iter().enumerate() {
                    if i > 0 {
                        self.emit(", ");
                    }
                    self.emit(name);
                    self.emit(": ");
                    self.type_expr(field);
                }
                self.emit_char(')');
            }
            TypeExpr::Tagged { name, args } => {
                self.emit(name);
                if !args.is_empty() {
                    self.emit_char('(');
                    for (i, arg) in args.iter().enumerate() {
                        if i > 0 {
                            self.emit(", ");
                        }
                        match arg {
                            TypeArgExpr::Type(t) => self.type_expr(t),
                            TypeArgExpr::Unit(u) => self.braced_unit(u),
                        }
                    }
                    self.emit_char(')');
                }
            }
            TypeExpr::Invalid(text) => self.emit(text),
        }
    }
}
