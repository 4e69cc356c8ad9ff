//! Error codes for compile errors.
//!
//! The first digit names the phase that detected the fault:
//! - E1xxx: expression syntax
//! - E2xxx: name, member and type resolution
//! - E3xxx: binding targets
//! - E4xxx: compilation session (cross-file tasks)

use std::fmt;

#[derive(Copy, Clone, Eq, PartialEq, Hash, Debug)]
pub enum ErrorCode {
    // Syntax (E1xxx)
    /// Unexpected token in expression text
    E1001,
    /// Unterminated string literal
    E1002,
    /// Malformed or out-of-range number literal
    E1003,

    // Resolution (E2xxx)
    /// Identifier is neither in scope nor a known type
    E2001,
    /// Type name could not be resolved
    E2002,
    /// Operand types are incompatible with the operator
    E2003,
    /// More than one overload matches equally well
    E2004,
    /// No method, property or constructor matches
    E2005,
    /// Index expression is not a valid index
    E2006,
    /// Compile-time index is past the end of the receiver
    E2007,
    /// No conversion rule between two types
    E2008,

    // Binding targets (E3xxx)
    /// Dynamic binding on a read-only target
    E3001,
    /// Emitted routine failed to assemble (unplaced or duplicate label)
    E3002,

    // Session (E4xxx)
    /// Compilation unit includes itself, directly or indirectly
    E4001,
    /// Compilation unit could not be found
    E4002,
}

impl ErrorCode {
    pub const fn as_str(self) -> &'static str {
        match self {
            ErrorCode::E1001 => "E1001",
            ErrorCode::E1002 => "E1002",
            ErrorCode::E1003 => "E1003",
            ErrorCode::E2001 => "E2001",
            ErrorCode::E2002 => "E2002",
            ErrorCode::E2003 => "E2003",
            ErrorCode::E2004 => "E2004",
            ErrorCode::E2005 => "E2005",
            ErrorCode::E2006 => "E2006",
            ErrorCode::E2007 => "E2007",
            ErrorCode::E2008 => "E2008",
            ErrorCode::E3001 => "E3001",
            ErrorCode::E3002 => "E3002",
            ErrorCode::E4001 => "E4001",
            ErrorCode::E4002 => "E4002",
        }
    }

    pub const fn is_syntax_error(self) -> bool {
        matches!(self, ErrorCode::E1001 | ErrorCode::E1002 | ErrorCode::E1003)
    }
}

impl fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
