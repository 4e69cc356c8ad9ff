//! The single compile error type and its constructors.

use std::fmt;

use vela_ir::Span;

use crate::ErrorCode;

/// Result alias used throughout the compiler.
pub type CompileResult<T> = Result<T, CompileError>;

/// Kind of member a failed lookup was looking for.
#[derive(Copy, Clone, Eq, PartialEq, Hash, Debug)]
pub enum MemberKind {
    Method,
    StaticMethod,
    Property,
    StaticField,
    Constructor,
    Indexer,
}

impl MemberKind {
    pub const fn describe(self) -> &'static str {
        match self {
            MemberKind::Method => "method",
            MemberKind::StaticMethod => "static method",
            MemberKind::Property => "property",
            MemberKind::StaticField => "static field",
            MemberKind::Constructor => "constructor",
            MemberKind::Indexer => "indexer",
        }
    }
}

/// Structured category of a compile error.
///
/// Types are carried as display strings: the diagnostic crate sits below
/// the type model and never needs to inspect them.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum CompileErrorKind {
    // Syntax
    UnexpectedToken {
        found: String,
        expected: String,
    },
    UnterminatedString,
    InvalidNumber {
        text: String,
    },

    // Resolution
    UnknownIdentifier {
        name: String,
    },
    TypeNotFound {
        name: String,
    },
    IncompatibleOperands {
        op: &'static str,
        left: String,
        right: String,
    },
    AmbiguousCall {
        name: String,
        owner: String,
        candidates: Vec<String>,
    },
    NoApplicableMember {
        kind: MemberKind,
        name: String,
        owner: String,
    },
    IllegalIndex {
        index: String,
    },
    IndexOutOfRange {
        index: i64,
        length: usize,
    },
    Unconvertible {
        from: String,
        to: String,
    },

    // Binding targets
    ReadOnlyTarget {
        property: String,
    },
    Assembly {
        message: String,
    },

    // Session
    IncludeCycle {
        chain: Vec<String>,
    },
    UnitNotFound {
        location: String,
    },
}

impl CompileErrorKind {
    pub const fn code(&self) -> ErrorCode {
        match self {
            CompileErrorKind::UnexpectedToken { .. } => ErrorCode::E1001,
            CompileErrorKind::UnterminatedString => ErrorCode::E1002,
            CompileErrorKind::InvalidNumber { .. } => ErrorCode::E1003,
            CompileErrorKind::UnknownIdentifier { .. } => ErrorCode::E2001,
            CompileErrorKind::TypeNotFound { .. } => ErrorCode::E2002,
            CompileErrorKind::IncompatibleOperands { .. } => ErrorCode::E2003,
            CompileErrorKind::AmbiguousCall { .. } => ErrorCode::E2004,
            CompileErrorKind::NoApplicableMember { .. } => ErrorCode::E2005,
            CompileErrorKind::IllegalIndex { .. } => ErrorCode::E2006,
            CompileErrorKind::IndexOutOfRange { .. } => ErrorCode::E2007,
            CompileErrorKind::Unconvertible { .. } => ErrorCode::E2008,
            CompileErrorKind::ReadOnlyTarget { .. } => ErrorCode::E3001,
            CompileErrorKind::Assembly { .. } => ErrorCode::E3002,
            CompileErrorKind::IncludeCycle { .. } => ErrorCode::E4001,
            CompileErrorKind::UnitNotFound { .. } => ErrorCode::E4002,
        }
    }
}

impl fmt::Display for CompileErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CompileErrorKind::UnexpectedToken { found, expected } => {
                write!(f, "unexpected {found}, expected {expected}")
            }
            CompileErrorKind::UnterminatedString => write!(f, "unterminated string literal"),
            CompileErrorKind::InvalidNumber { text } => {
                write!(f, "invalid number literal `{text}`")
            }
            CompileErrorKind::UnknownIdentifier { name } => {
                write!(f, "unknown identifier `{name}`")
            }
            CompileErrorKind::TypeNotFound { name } => write!(f, "type `{name}` not found"),
            CompileErrorKind::IncompatibleOperands { op, left, right } => write!(
                f,
                "operator `{op}` cannot be applied to `{left}` and `{right}`"
            ),
            CompileErrorKind::AmbiguousCall {
                name,
                owner,
                candidates,
            } => write!(
                f,
                "ambiguous call to `{owner}.{name}`: candidates are {}",
                candidates.join(", ")
            ),
            CompileErrorKind::NoApplicableMember { kind, name, owner } => write!(
                f,
                "no applicable {} `{name}` on `{owner}`",
                kind.describe()
            ),
            CompileErrorKind::IllegalIndex { index } => write!(f, "illegal index `{index}`"),
            CompileErrorKind::IndexOutOfRange { index, length } => write!(
                f,
                "index {index} is out of range for length {length}"
            ),
            CompileErrorKind::Unconvertible { from, to } => {
                write!(f, "cannot convert `{from}` to `{to}`")
            }
            CompileErrorKind::ReadOnlyTarget { property } => write!(
                f,
                "property `{property}` is read-only and cannot be bound"
            ),
            CompileErrorKind::Assembly { message } => {
                write!(f, "binding routine failed to assemble: {message}")
            }
            CompileErrorKind::IncludeCycle { chain } => {
                write!(f, "include cycle detected: {}", chain.join(" -> "))
            }
            CompileErrorKind::UnitNotFound { location } => {
                write!(f, "compilation unit `{location}` not found")
            }
        }
    }
}

/// A compile error.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct CompileError {
    pub kind: CompileErrorKind,
    /// Human-readable message; equals `kind.to_string()`.
    pub message: String,
    /// Span into the attribute text, when the error is tied to one.
    pub span: Option<Span>,
    /// The markup element the failing expression belongs to.
    pub element: Option<String>,
}

impl CompileError {
    fn from_kind(kind: CompileErrorKind) -> Self {
        let message = kind.to_string();
        CompileError {
            kind,
            message,
            span: None,
            element: None,
        }
    }

    #[must_use]
    pub fn with_span(mut self, span: Span) -> Self {
        self.span = Some(span);
        self
    }

    /// Attach a span unless one is already present.
    ///
    /// Inner resolution steps know the exact node; outer callers only fill
    /// in a span when nothing more precise was recorded.
    #[must_use]
    pub fn or_span(mut self, span: Span) -> Self {
        if self.span.is_none() {
            self.span = Some(span);
        }
        self
    }

    #[must_use]
    pub fn with_element(mut self, element: impl Into<String>) -> Self {
        self.element = Some(element.into());
        self
    }

    #[inline]
    pub const fn code(&self) -> ErrorCode {
        self.kind.code()
    }
}

impl fmt::Display for CompileError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "error[{}]: {}", self.code(), self.message)?;
        if let Some(element) = &self.element {
            write!(f, " (in <{element}>)")?;
        }
        Ok(())
    }
}

impl std::error::Error for CompileError {}

// Syntax

#[cold]
pub fn unexpected_token(found: impl Into<String>, expected: impl Into<String>) -> CompileError {
    CompileError::from_kind(CompileErrorKind::UnexpectedToken {
        found: found.into(),
        expected: expected.into(),
    })
}

#[cold]
pub fn unterminated_string() -> CompileError {
    CompileError::from_kind(CompileErrorKind::UnterminatedString)
}

#[cold]
pub fn invalid_number(text: &str) -> CompileError {
    CompileError::from_kind(CompileErrorKind::InvalidNumber {
        text: text.to_owned(),
    })
}

// Resolution

#[cold]
pub fn unknown_identifier(name: &str) -> CompileError {
    CompileError::from_kind(CompileErrorKind::UnknownIdentifier {
        name: name.to_owned(),
    })
}

#[cold]
pub fn type_not_found(name: &str) -> CompileError {
    CompileError::from_kind(CompileErrorKind::TypeNotFound {
        name: name.to_owned(),
    })
}

#[cold]
pub fn incompatible_operands(op: &'static str, left: String, right: String) -> CompileError {
    CompileError::from_kind(CompileErrorKind::IncompatibleOperands { op, left, right })
}

#[cold]
pub fn ambiguous_call(name: &str, owner: String, candidates: Vec<String>) -> CompileError {
    CompileError::from_kind(CompileErrorKind::AmbiguousCall {
        name: name.to_owned(),
        owner,
        candidates,
    })
}

#[cold]
pub fn no_applicable_member(kind: MemberKind, name: &str, owner: String) -> CompileError {
    CompileError::from_kind(CompileErrorKind::NoApplicableMember {
        kind,
        name: name.to_owned(),
        owner,
    })
}

#[cold]
pub fn illegal_index(index: impl Into<String>) -> CompileError {
    CompileError::from_kind(CompileErrorKind::IllegalIndex {
        index: index.into(),
    })
}

#[cold]
pub fn index_out_of_range(index: i64, length: usize) -> CompileError {
    CompileError::from_kind(CompileErrorKind::IndexOutOfRange { index, length })
}

#[cold]
pub fn unconvertible(from: String, to: String) -> CompileError {
    CompileError::from_kind(CompileErrorKind::Unconvertible { from, to })
}

// Binding targets

#[cold]
pub fn read_only_target(property: &str) -> CompileError {
    CompileError::from_kind(CompileErrorKind::ReadOnlyTarget {
        property: property.to_owned(),
    })
}

#[cold]
pub fn assembly_failed(message: impl Into<String>) -> CompileError {
    CompileError::from_kind(CompileErrorKind::Assembly {
        message: message.into(),
    })
}

// Session

#[cold]
pub fn include_cycle(chain: Vec<String>) -> CompileError {
    CompileError::from_kind(CompileErrorKind::IncludeCycle { chain })
}

#[cold]
pub fn unit_not_found(location: &str) -> CompileError {
    CompileError::from_kind(CompileErrorKind::UnitNotFound {
        location: location.to_owned(),
    })
}
