//! Operator enums for the n-ary operator nodes.
//!
//! Only operators that may be mixed at one bracket level get an enum; the
//! others (`*`, `;`, `&`, `|`, `=`) are implied by their node kind.

/// `+` or `-` inside an add/subtract chain.
#[derive(Copy, Clone, Eq, PartialEq, Hash, Debug)]
pub enum AddOp {
    Add,
    Subtract,
}

impl AddOp {
    pub const fn as_symbol(self) -> &'static str {
        match self {
            AddOp::Add => "+",
            AddOp::Subtract => "-",
        }
    }
}

/// One comparison in a chain such as `a < b <= c`.
#[derive(Copy, Clone, Eq, PartialEq, Hash, Debug)]
pub enum CompareOp {
    Less,
    LessEqual,
    Greater,
    GreaterEqual,
}

/// Chains may only mix comparisons that point the same way.
#[derive(Copy, Clone, Eq, PartialEq, Hash, Debug)]
pub enum CompareDirection {
    Ascending,
    Descending,
}

impl CompareOp {
    pub const fn as_symbol(self) -> &'static str {
        match self {
            CompareOp::Less => "<",
            CompareOp::LessEqual => "<=",
            CompareOp::Greater => ">",
            CompareOp::GreaterEqual => ">=",
        }
    }

    pub const fn direction(self) -> CompareDirection {
        match self {
            CompareOp::Less | CompareOp::LessEqual => CompareDirection::Ascending,
            CompareOp::Greater | CompareOp::GreaterEqual => CompareDirection::Descending,
        }
    }

    /// Apply the comparison to an ordering of `left` relative to `right`.
    pub fn holds(self, ordering: std::cmp::Ordering) -> bool {
        use std::cmp::Ordering;
        match self {
            CompareOp::Less => ordering == Ordering::Less,
            CompareOp::LessEqual => ordering != Ordering::Greater,
            CompareOp::Greater => ordering == Ordering::Greater,
            CompareOp::GreaterEqual => ordering != Ordering::Less,
        }
    }
}
