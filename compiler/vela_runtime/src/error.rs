//! Runtime errors raised while executing routines.

use std::fmt;

/// Result alias for runtime operations.
pub type RuntimeResult<T> = Result<T, RuntimeError>;

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum RuntimeErrorKind {
    /// Member access or unboxing on `null`.
    NullReference { operation: String },
    /// Integral division or remainder by zero.
    ArithmeticFault,
    /// Text that does not parse as the requested primitive.
    NumberFormat { text: String, target: &'static str },
    /// Enum lookup by a name no constant matches.
    NoSuchConstant { name: String, enum_name: String },
    IndexOutOfBounds { index: i64, length: usize },
    /// A value of the wrong shape reached an instruction.
    TypeMismatch { expected: &'static str, found: String },
    /// A member id or name the registry does not know.
    NoSuchMember { name: String },
    /// A binding-state instruction ran outside a binding instance.
    MissingInstance,
    /// Internal consistency fault emitted by the compiler.
    Fault { message: String },
}

impl fmt::Display for RuntimeErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RuntimeErrorKind::NullReference { operation } => {
                write!(f, "null reference in {operation}")
            }
            RuntimeErrorKind::ArithmeticFault => f.write_str("division by zero"),
            RuntimeErrorKind::NumberFormat { text, target } => {
                write!(f, "cannot parse {text:?} as {target}")
            }
            RuntimeErrorKind::NoSuchConstant { name, enum_name } => {
                write!(f, "no constant {name:?} in enum {enum_name}")
            }
            RuntimeErrorKind::IndexOutOfBounds { index, length } => {
                write!(f, "index {index} out of bounds for length {length}")
            }
            RuntimeErrorKind::TypeMismatch { expected, found } => {
                write!(f, "expected {expected}, found {found}")
            }
            RuntimeErrorKind::NoSuchMember { name } => write!(f, "no such member `{name}`"),
            RuntimeErrorKind::MissingInstance => {
                f.write_str("binding state accessed outside a binding instance")
            }
            RuntimeErrorKind::Fault { message } => write!(f, "internal fault: {message}"),
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct RuntimeError {
    pub kind: RuntimeErrorKind,
    pub message: String,
}

impl RuntimeError {
    fn from_kind(kind: RuntimeErrorKind) -> Self {
        let message = kind.to_string();
        RuntimeError { kind, message }
    }
}

impl fmt::Display for RuntimeError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.message)
    }
}

impl std::error::Error for RuntimeError {}

#[cold]
pub fn null_reference(operation: impl Into<String>) -> RuntimeError {
    RuntimeError::from_kind(RuntimeErrorKind::NullReference {
        operation: operation.into(),
    })
}

#[cold]
pub fn arithmetic_fault() -> RuntimeError {
    RuntimeError::from_kind(RuntimeErrorKind::ArithmeticFault)
}

#[cold]
pub fn number_format(text: &str, target: &'static str) -> RuntimeError {
    RuntimeError::from_kind(RuntimeErrorKind::NumberFormat {
        text: text.to_owned(),
        target,
    })
}

#[cold]
pub fn no_such_constant(name: &str, enum_name: &str) -> RuntimeError {
    RuntimeError::from_kind(RuntimeErrorKind::NoSuchConstant {
        name: name.to_owned(),
        enum_name: enum_name.to_owned(),
    })
}

#[cold]
pub fn index_out_of_bounds(index: i64, length: usize) -> RuntimeError {
    RuntimeError::from_kind(RuntimeErrorKind::IndexOutOfBounds { index, length })
}

#[cold]
pub fn type_mismatch(expected: &'static str, found: impl Into<String>) -> RuntimeError {
    RuntimeError::from_kind(RuntimeErrorKind::TypeMismatch {
        expected,
        found: found.into(),
    })
}

#[cold]
pub fn no_such_member(name: impl Into<String>) -> RuntimeError {
    RuntimeError::from_kind(RuntimeErrorKind::NoSuchMember { name: name.into() })
}

#[cold]
pub fn missing_instance() -> RuntimeError {
    RuntimeError::from_kind(RuntimeErrorKind::MissingInstance)
}

#[cold]
pub fn fault(message: &str) -> RuntimeError {
    RuntimeError::from_kind(RuntimeErrorKind::Fault {
        message: message.to_owned(),
    })
}
