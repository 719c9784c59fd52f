use std::fmt;

/// Codes for every diagnostic the engine produces.
///
/// Format: a letter and four digits, where the first digit is the phase:
/// - E1xxx: Parse errors
/// - E2xxx: Type errors
/// - E3xxx: Pattern and variable errors
/// - E4xxx: Unresolved references
/// - E9xxx: Internal errors
/// - I0xxx: Information (not errors)
#[derive(Copy, Clone, Eq, PartialEq, Hash, Debug)]
pub enum ErrorCode {
    // Parse Errors (E1xxx)
    /// Unexpected token
    E1001,
    /// Expected expression
    E1002,
    /// Unclosed bracket or missing closing keyword
    E1003,
    /// Invalid number literal
    E1004,
    /// Invalid unit syntax
    E1005,
    /// Invalid type syntax
    E1006,
    /// Unterminated text literal
    E1007,

    // Type Errors (E2xxx)
    /// Type mismatch
    E2001,
    /// Unit mismatch
    E2002,
    /// Ambiguous type
    E2003,
    /// Type could not be inferred
    E2004,
    /// Wrong number of arguments or elements
    E2005,
    /// Type lacks a required capability (equality, ordering, arithmetic)
    E2006,
    /// Operators mixed at one bracket level
    E2007,
    /// Incomplete expression
    E2008,
    /// Invalid date/time literal
    E2009,
    /// Record has no such field
    E2010,
    /// Units cannot be converted
    E2011,

    // Pattern Errors (E3xxx)
    /// Pattern used where a value is needed
    E3001,
    /// Variable defined twice
    E3002,
    /// Variable defined in only some alternatives
    E3003,
    /// Type annotation for a variable that is never defined
    E3004,

    // Reference Errors (E4xxx)
    /// Unknown column
    E4001,
    /// Unknown table
    E4002,
    /// Unknown identifier
    E4003,
    /// Unknown unit
    E4004,
    /// Unknown type or tag
    E4005,
    /// Tag name shared by several types
    E4006,

    // Internal Errors (E9xxx)
    /// Internal error
    E9001,

    // Information (I0xxx)
    /// Inferred unit of a unitless literal
    I0001,
    /// Advisory message from the column source
    I0002,
}

impl ErrorCode {
    /// Get the code as a string (e.g., "E2002").
    pub fn as_str(&self) -> &'static str {
        match self {
            // Parse
            ErrorCode::E1001 => "E1001",
            ErrorCode::E1002 => "E1002",
            ErrorCode::E1003 => "E1003",
            ErrorCode::E1004 => "E1004",
            ErrorCode::E1005 => "E1005",
            ErrorCode::E1006 => "E1006",
            ErrorCode::E1007 => "E1007",
            // Type
            ErrorCode::E2001 => "E2001",
            ErrorCode::E2002 => "E2002",
            ErrorCode::E2003 => "E2003",
            ErrorCode::E2004 => "E2004",
            ErrorCode::E2005 => "E2005",
            ErrorCode::E2006 => "E2006",
            ErrorCode::E2007 => "E2007",
            ErrorCode::E2008 => "E2008",
            ErrorCode::E2009 => "E2009",
            ErrorCode::E2010 => "E2010",
            ErrorCode::E2011 => "E2011",
            // Pattern
            ErrorCode::E3001 => "E3001",
            ErrorCode::E3002 => "E3002",
            ErrorCode::E3003 => "E3003",
            ErrorCode::E3004 => "E3004",
            // Reference
            ErrorCode::E4001 => "E4001",
            ErrorCode::E4002 => "E4002",
            ErrorCode::E4003 => "E4003",
            ErrorCode::E4004 => "E4004",
            ErrorCode::E4005 => "E4005",
            ErrorCode::E4006 => "E4006",
            // Internal
            ErrorCode::E9001 => "E9001",
            // Information
            ErrorCode::I0001 => "I0001",
            ErrorCode::I0002 => "I0002",
        }
    }
}

impl fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_code_display() {
        assert_eq!(ErrorCode::E4001.to_string(), "E4001");
        assert_eq!(ErrorCode::E2002.as_str(), "E2002");
    }
}
