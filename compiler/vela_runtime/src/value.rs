//! Runtime values.

use std::fmt;
use std::rc::Rc;

use vela_ir::literal::{format_double, format_float, narrow};
use vela_ir::Literal;
use vela_types::{ClassId, Prim};

use crate::error::{type_mismatch, RuntimeResult};
use crate::{HostObject, ObservableValue};

/// An enum constant.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct EnumValue {
    pub class: ClassId,
    pub name: Rc<str>,
}

/// A value on the machine stack or in a slot.
///
/// Boxed primitives share the primitive variants; the difference only
/// matters to the compiler, which guards unboxing against `Null`.
#[derive(Clone)]
pub enum Value {
    Null,
    Bool(bool),
    Char(char),
    Byte(i8),
    Short(i16),
    Int(i32),
    Long(i64),
    Float(f32),
    Double(f64),
    Str(Rc<str>),
    Enum(EnumValue),
    Object(Rc<HostObject>),
    /// An observable property cell.
    Cell(Rc<ObservableValue>),
}

impl Value {
    pub fn string(text: impl Into<Rc<str>>) -> Self {
        Value::Str(text.into())
    }

    /// Runtime form of a compile-time literal.
    pub fn from_literal(literal: &Literal) -> Self {
        match literal {
            Literal::Null => Value::Null,
            Literal::String(text) => Value::Str(Rc::clone(text)),
            Literal::Integer { value, long: true } => Value::Long(*value),
            Literal::Integer { value, long: false } => {
                Value::Int(i32::try_from(*value).unwrap_or_default())
            }
            Literal::FloatingPoint {
                value,
                double: true,
            } => Value::Double(*value),
            Literal::FloatingPoint {
                value,
                double: false,
            } => Value::Float(narrow(*value)),
            Literal::Boolean(b) => Value::Bool(*b),
        }
    }

    /// The default of a primitive: `false`, `0` or `'\0'`.
    pub const fn zero(prim: Prim) -> Self {
        match prim {
            Prim::Boolean => Value::Bool(false),
            Prim::Char => Value::Char('\0'),
            Prim::Byte => Value::Byte(0),
            Prim::Short => Value::Short(0),
            Prim::Int => Value::Int(0),
            Prim::Long => Value::Long(0),
            Prim::Float => Value::Float(0.0),
            Prim::Double => Value::Double(0.0),
        }
    }

    pub const fn kind_name(&self) -> &'static str {
        match self {
            Value::Null => "null",
            Value::Bool(_) => "boolean",
            Value::Char(_) => "char",
            Value::Byte(_) => "byte",
            Value::Short(_) => "short",
            Value::Int(_) => "int",
            Value::Long(_) => "long",
            Value::Float(_) => "float",
            Value::Double(_) => "double",
            Value::Str(_) => "String",
            Value::Enum(_) => "enum",
            Value::Object(_) => "object",
            Value::Cell(_) => "observable",
        }
    }

    #[inline]
    pub const fn is_null(&self) -> bool {
        matches!(self, Value::Null)
    }

    /// Identity comparison: objects and cells by pointer, everything else
    /// by value.
    pub fn same(&self, other: &Value) -> bool {
        match (self, other) {
            (Value::Object(a), Value::Object(b)) => Rc::ptr_eq(a, b),
            (Value::Cell(a), Value::Cell(b)) => Rc::ptr_eq(a, b),
            _ => self == other,
        }
    }

    pub fn as_bool(&self) -> RuntimeResult<bool> {
        match self {
            Value::Bool(b) => Ok(*b),
            other => Err(type_mismatch("boolean", other.kind_name())),
        }
    }

    pub fn as_str(&self) -> RuntimeResult<&Rc<str>> {
        match self {
            Value::Str(s) => Ok(s),
            other => Err(type_mismatch("String", other.kind_name())),
        }
    }

    /// Integral value widened to `i64`; `char` yields its code point.
    pub fn as_i64(&self) -> RuntimeResult<i64> {
        match self {
            Value::Char(c) => Ok(i64::from(u32::from(*c))),
            Value::Byte(v) => Ok(i64::from(*v)),
            Value::Short(v) => Ok(i64::from(*v)),
            Value::Int(v) => Ok(i64::from(*v)),
            Value::Long(v) => Ok(*v),
            other => Err(type_mismatch("integral value", other.kind_name())),
        }
    }

    #[expect(
        clippy::cast_precision_loss,
        reason = "long-to-double follows the host conversion"
    )]
    pub fn as_f64(&self) -> RuntimeResult<f64> {
        match self {
            Value::Float(v) => Ok(f64::from(*v)),
            Value::Double(v) => Ok(*v),
            other => other.as_i64().map(|v| v as f64),
        }
    }
}

impl PartialEq for Value {
    /// Value equality as the `==` operator sees references: strings by
    /// content, objects and cells by identity, boxed numbers only when the
    /// kinds match.
    fn eq(&self, other: &Value) -> bool {
        match (self, other) {
            (Value::Null, Value::Null) => true,
            (Value::Bool(a), Value::Bool(b)) => a == b,
            (Value::Char(a), Value::Char(b)) => a == b,
            (Value::Byte(a), Value::Byte(b)) => a == b,
            (Value::Short(a), Value::Short(b)) => a == b,
            (Value::Int(a), Value::Int(b)) => a == b,
            (Value::Long(a), Value::Long(b)) => a == b,
            (Value::Float(a), Value::Float(b)) => a.to_bits() == b.to_bits() || a == b,
            (Value::Double(a), Value::Double(b)) => a.to_bits() == b.to_bits() || a == b,
            (Value::Str(a), Value::Str(b)) => a == b,
            (Value::Enum(a), Value::Enum(b)) => a == b,
            (Value::Object(a), Value::Object(b)) => Rc::ptr_eq(a, b),
            (Value::Cell(a), Value::Cell(b)) => Rc::ptr_eq(a, b),
            _ => false,
        }
    }
}

impl fmt::Debug for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Null => f.write_str("Null"),
            Value::Bool(b) => write!(f, "Bool({b})"),
            Value::Char(c) => write!(f, "Char({c:?})"),
            Value::Byte(v) => write!(f, "Byte({v})"),
            Value::Short(v) => write!(f, "Short({v})"),
            Value::Int(v) => write!(f, "Int({v})"),
            Value::Long(v) => write!(f, "Long({v})"),
            Value::Float(v) => write!(f, "Float({})", format_float(*v)),
            Value::Double(v) => write!(f, "Double({})", format_double(*v)),
            Value::Str(s) => write!(f, "Str({s:?})"),
            Value::Enum(e) => write!(f, "Enum({})", e.name),
            Value::Object(o) => write!(f, "Object({:?})", o.class()),
            Value::Cell(cell) => write!(f, "Cell({:?})", cell.get()),
        }
    }
}

#[cfg(test)]
mod tests;
