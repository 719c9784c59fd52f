//! Expression nodes.

use crate::{AddOp, CompareOp, NodeId, Span, TemporalKind, TypeExpr, UnitExpr};

/// One node of a formula tree.
#[derive(Clone, Eq, PartialEq, Hash, Debug)]
pub struct Expr {
    pub id: NodeId,
    pub span: Span,
    pub kind: ExprKind,
}

/// `@column name` / `@column Table\name` target.
#[derive(Clone, Eq, PartialEq, Hash, Debug)]
pub struct ColumnRef {
    pub table: Option<String>,
    pub column: String,
}

impl ColumnRef {
    pub fn new(table: Option<&str>, column: impl Into<String>) -> Self {
        ColumnRef {
            table: table.map(str::to_owned),
            column: column.into(),
        }
    }
}

/// One `@case ... @then ...` clause of a match.
#[derive(Clone, Eq, PartialEq, Hash, Debug)]
pub struct MatchClause {
    /// The `@case` pattern followed by any `@orcase` alternatives.
    pub patterns: Vec<ClausePattern>,
    pub outcome: Expr,
}

/// A pattern with its optional `@given` guard.
#[derive(Clone, Eq, PartialEq, Hash, Debug)]
pub struct ClausePattern {
    pub pattern: Expr,
    pub guard: Option<Expr>,
}

/// One comma-separated item of `@define`.
#[derive(Clone, Eq, PartialEq, Hash, Debug)]
pub enum Definition {
    /// `pattern = value`; the value must match or evaluation fails.
    Equal { pattern: Expr, value: Expr },
    /// `name :: type{...}`; constrains a later definition of `name`.
    Annotation { variable: Expr, ty: Expr },
}

/// Every kind of formula node.
///
/// The checker and evaluator match on this exhaustively, so adding a kind
/// forces every pass to handle it.
#[derive(Clone, Eq, PartialEq, Hash, Debug)]
pub enum ExprKind {
    // Literals
    Boolean(bool),
    /// Number literal, kept as written so saving reproduces it exactly.
    Number {
        text: String,
        unit: Option<UnitExpr>,
    },
    Text(String),
    Temporal {
        kind: TemporalKind,
        content: String,
    },
    /// `{m/s}` on its own, used to pass a unit to a function.
    UnitLiteral(UnitExpr),
    /// `type{...}`, used to pass a type to a function.
    TypeLiteral(TypeExpr),

    // References
    /// A variable, tag or standard function name.
    Ident(String),
    /// `_`, matches anything.
    Wildcard,
    /// `?`, parameter of an implicit lambda.
    ImplicitArg,
    /// The current row's cell of a column.
    Column(ColumnRef),
    /// Every cell of a column, as a list.
    EntireColumn(ColumnRef),
    /// Every row of a table, as a list of records.
    Table(String),
    /// `@tag Type\Tag`.
    Constructor {
        type_name: String,
        tag: String,
    },

    // Operators
    AddSubtract {
        operands: Vec<Expr>,
        ops: Vec<AddOp>,
    },
    Times(Vec<Expr>),
    Divide {
        numerator: Box<Expr>,
        denominator: Box<Expr>,
    },
    Raise {
        base: Box<Expr>,
        exponent: Box<Expr>,
    },
    /// `a ; b`, text concatenation.
    Concat(Vec<Expr>),
    And(Vec<Expr>),
    Or(Vec<Expr>),
    Equal(Vec<Expr>),
    NotEqual {
        left: Box<Expr>,
        right: Box<Expr>,
    },
    Comparison {
        operands: Vec<Expr>,
        ops: Vec<CompareOp>,
    },
    /// `value ~ pattern`.
    Matches {
        value: Box<Expr>,
        pattern: Box<Expr>,
    },
    /// `value ± tolerance`, only meaningful as a pattern.
    PlusMinus {
        value: Box<Expr>,
        tolerance: Box<Expr>,
    },

    // Structure
    Call {
        function: Box<Expr>,
        args: Vec<Expr>,
    },
    /// `record#field`.
    FieldAccess {
        record: Box<Expr>,
        field: String,
    },
    Tuple(Vec<Expr>),
    Record(Vec<(String, Expr)>),
    Array(Vec<Expr>),
    Lambda {
        params: Vec<Expr>,
        body: Box<Expr>,
    },
    If {
        condition: Box<Expr>,
        then_branch: Box<Expr>,
        else_branch: Box<Expr>,
    },
    Match {
        scrutinee: Box<Expr>,
        clauses: Vec<MatchClause>,
    },
    Define {
        definitions: Vec<Definition>,
        body: Box<Expr>,
    },

    // Placeholders left by the editor or parser
    /// Operators that may not be mixed at one bracket level, e.g. `1 + 2 * 3`.
    InvalidOperators {
        operands: Vec<Expr>,
        operators: Vec<String>,
    },
    /// Text that is not a valid identifier or token.
    InvalidIdent(String),
    /// A sequence that could not be read as one expression.
    Invalid(Vec<Expr>),
    /// An empty slot.
    Missing,
}

impl Expr {
    #[inline]
    pub fn new(id: NodeId, span: Span, kind: ExprKind) -> Self {
        Expr { id, span, kind }
    }

    /// A node built outside any tree, e.g. a quick-fix replacement.
    #[inline]
    pub fn synthetic(kind: ExprKind) -> Self {
        Expr {
            id: NodeId::PLACEHOLDER,
            span: Span::DUMMY,
            kind,
        }
    }

    /// Whether this is one of the operator nodes that must be bracketed when
    /// it appears directly inside another operator node.
    pub fn is_operator(&self) -> bool {
        matches!(
            self.kind,
            ExprKind::AddSubtract { .. }
                | ExprKind::Times(_)
                | ExprKind::Divide { .. }
                | ExprKind::Raise { .. }
                | ExprKind::Concat(_)
                | ExprKind::And(_)
                | ExprKind::Or(_)
                | ExprKind::Equal(_)
                | ExprKind::NotEqual { .. }
                | ExprKind::Comparison { .. }
                | ExprKind::Matches { .. }
                | ExprKind::PlusMinus { .. }
                | ExprKind::InvalidOperators { .. }
        )
    }

    /// Whether the node is an editor/parser placeholder for broken input.
    pub fn is_placeholder(&self) -> bool {
        matches!(
            self.kind,
            ExprKind::InvalidOperators { .. }
                | ExprKind::InvalidIdent(_)
                | ExprKind::Invalid(_)
                | ExprKind::Missing
        )
    }

    /// Short description used in diagnostics.
    pub fn describe(&self) -> &'static str {
        match &self.kind {
            ExprKind::Boolean(_) => "boolean",
            ExprKind::Number { .. } => "number",
            ExprKind::Text(_) => "text",
            ExprKind::Temporal { .. } => "date/time",
            ExprKind::UnitLiteral(_) => "unit",
            ExprKind::TypeLiteral(_) => "type",
            ExprKind::Ident(_) => "identifier",
            ExprKind::Wildcard => "wildcard",
            ExprKind::ImplicitArg => "implicit argument",
            ExprKind::Column(_) => "column reference",
            ExprKind::EntireColumn(_) => "whole-column reference",
            ExprKind::Table(_) => "table reference",
            ExprKind::Constructor { .. } => "tag",
            ExprKind::AddSubtract { .. } => "addition",
            ExprKind::Times(_) => "multiplication",
            ExprKind::Divide { .. } => "division",
            ExprKind::Raise { .. } => "power",
            ExprKind::Concat(_) => "text concatenation",
            ExprKind::And(_) => "and",
            ExprKind::Or(_) => "or",
            ExprKind::Equal(_) => "equality",
            ExprKind::NotEqual { .. } => "inequality",
            ExprKind::Comparison { .. } => "comparison",
            ExprKind::Matches { .. } => "pattern test",
            ExprKind::PlusMinus { .. } => "tolerance pattern",
            ExprKind::Call { .. } => "function call",
            ExprKind::FieldAccess { .. } => "field access",
            ExprKind::Tuple(_) => "tuple",
            ExprKind::Record(_) => "record",
            ExprKind::Array(_) => "list",
            ExprKind::Lambda { .. } => "function",
            ExprKind::If { .. } => "if",
            ExprKind::Match { .. } => "match",
            ExprKind::Define { .. } => "define",
            ExprKind::InvalidOperators { .. } => "mixed operators",
            ExprKind::InvalidIdent(_) => "invalid name",
            ExprKind::Invalid(_) => "invalid expression",
            ExprKind::Missing => "missing expression",
        }
    }
}
