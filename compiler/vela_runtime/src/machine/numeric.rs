//! Primitive arithmetic, comparison, casts and parsing.
//!
//! Integral arithmetic wraps at the operand width. Floating-point `float`
//! arithmetic is carried out in `f32`. Casts follow the host rules:
//! float-to-integral saturates and maps NaN to zero, integral narrowing
//! truncates.

use vela_ir::BinaryOp;
use vela_types::Prim;

use crate::error::{arithmetic_fault, number_format, type_mismatch, RuntimeResult};
use crate::Value;

#[expect(
    clippy::cast_possible_truncation,
    reason = "integral narrowing truncates like the host"
)]
fn to_i32(value: &Value) -> RuntimeResult<i32> {
    match value {
        Value::Float(v) => Ok(*v as i32),
        Value::Double(v) => Ok(*v as i32),
        other => other.as_i64().map(|v| v as i32),
    }
}

#[expect(
    clippy::cast_possible_truncation,
    reason = "float-to-long saturates like the host"
)]
fn to_i64(value: &Value) -> RuntimeResult<i64> {
    match value {
        Value::Float(v) => Ok(*v as i64),
        Value::Double(v) => Ok(*v as i64),
        other => other.as_i64(),
    }
}

#[expect(
    clippy::cast_possible_truncation,
    clippy::cast_precision_loss,
    reason = "conversions to float round like the host"
)]
fn to_f32(value: &Value) -> RuntimeResult<f32> {
    match value {
        Value::Float(v) => Ok(*v),
        Value::Double(v) => Ok(*v as f32),
        other => other.as_i64().map(|v| v as f32),
    }
}

pub(super) fn arith(op: BinaryOp, kind: Prim, a: &Value, b: &Value) -> RuntimeResult<Value> {
    match kind {
        Prim::Long => {
            let (x, y) = (to_i64(a)?, to_i64(b)?);
            let value = match op {
                BinaryOp::Add => x.wrapping_add(y),
                BinaryOp::Sub => x.wrapping_sub(y),
                BinaryOp::Mul => x.wrapping_mul(y),
                BinaryOp::Div if y == 0 => return Err(arithmetic_fault()),
                BinaryOp::Div => x.wrapping_div(y),
                BinaryOp::Rem if y == 0 => return Err(arithmetic_fault()),
                BinaryOp::Rem => x.wrapping_rem(y),
                _ => return Err(type_mismatch("arithmetic operator", op.as_symbol())),
            };
            Ok(Value::Long(value))
        }
        Prim::Float => {
            let (x, y) = (to_f32(a)?, to_f32(b)?);
            Ok(Value::Float(float_op(op, x, y)?))
        }
        Prim::Double => {
            let (x, y) = (a.as_f64()?, b.as_f64()?);
            Ok(Value::Double(float_op(op, x, y)?))
        }
        Prim::Int | Prim::Char | Prim::Byte | Prim::Short => {
            let (x, y) = (to_i32(a)?, to_i32(b)?);
            let value = match op {
                BinaryOp::Add => x.wrapping_add(y),
                BinaryOp::Sub => x.wrapping_sub(y),
                BinaryOp::Mul => x.wrapping_mul(y),
                BinaryOp::Div if y == 0 => return Err(arithmetic_fault()),
                BinaryOp::Div => x.wrapping_div(y),
                BinaryOp::Rem if y == 0 => return Err(arithmetic_fault()),
                BinaryOp::Rem => x.wrapping_rem(y),
                _ => return Err(type_mismatch("arithmetic operator", op.as_symbol())),
            };
            Ok(Value::Int(value))
        }
        Prim::Boolean => Err(type_mismatch("numeric operands", "boolean")),
    }
}

fn float_op<F>(op: BinaryOp, x: F, y: F) -> RuntimeResult<F>
where
    F: std::ops::Add<Output = F>
        + std::ops::Sub<Output = F>
        + std::ops::Mul<Output = F>
        + std::ops::Div<Output = F>
        + std::ops::Rem<Output = F>,
{
    match op {
        BinaryOp::Add => Ok(x + y),
        BinaryOp::Sub => Ok(x - y),
        BinaryOp::Mul => Ok(x * y),
        BinaryOp::Div => Ok(x / y),
        BinaryOp::Rem => Ok(x % y),
        _ => Err(type_mismatch("arithmetic operator", op.as_symbol())),
    }
}

pub(super) fn negate(kind: Prim, a: &Value) -> RuntimeResult<Value> {
    match kind {
        Prim::Long => Ok(Value::Long(to_i64(a)?.wrapping_neg())),
        Prim::Float => Ok(Value::Float(-to_f32(a)?)),
        Prim::Double => Ok(Value::Double(-a.as_f64()?)),
        Prim::Int | Prim::Char | Prim::Byte | Prim::Short => {
            Ok(Value::Int(to_i32(a)?.wrapping_neg()))
        }
        Prim::Boolean => Err(type_mismatch("numeric operand", "boolean")),
    }
}

pub(super) fn compare(op: BinaryOp, kind: Prim, a: &Value, b: &Value) -> RuntimeResult<bool> {
    match kind {
        Prim::Boolean => {
            let (x, y) = (a.as_bool()?, b.as_bool()?);
            match op {
                BinaryOp::Eq => Ok(x == y),
                BinaryOp::NotEq => Ok(x != y),
                _ => Err(type_mismatch("numeric operands", "boolean")),
            }
        }
        Prim::Float => ordered(op, to_f32(a)?, to_f32(b)?),
        Prim::Double => ordered(op, a.as_f64()?, b.as_f64()?),
        Prim::Long => ordered(op, to_i64(a)?, to_i64(b)?),
        Prim::Int | Prim::Char | Prim::Byte | Prim::Short => ordered(op, to_i32(a)?, to_i32(b)?),
    }
}

fn ordered<T: PartialOrd>(op: BinaryOp, x: T, y: T) -> RuntimeResult<bool> {
    match op {
        BinaryOp::Lt => Ok(x < y),
        BinaryOp::LtEq => Ok(x <= y),
        BinaryOp::Gt => Ok(x > y),
        BinaryOp::GtEq => Ok(x >= y),
        BinaryOp::Eq => Ok(x == y),
        BinaryOp::NotEq => Ok(x != y),
        _ => Err(type_mismatch("comparison operator", op.as_symbol())),
    }
}

/// Primitive cast of `value` to `to`.
#[expect(
    clippy::cast_possible_truncation,
    clippy::cast_sign_loss,
    reason = "narrowing casts truncate like the host"
)]
pub(super) fn convert(value: &Value, to: Prim) -> RuntimeResult<Value> {
    match to {
        Prim::Boolean => value.as_bool().map(Value::Bool),
        Prim::Int => to_i32(value).map(Value::Int),
        Prim::Long => to_i64(value).map(Value::Long),
        Prim::Float => to_f32(value).map(Value::Float),
        Prim::Double => value.as_f64().map(Value::Double),
        Prim::Byte => to_i32(value).map(|v| Value::Byte(v as i8)),
        Prim::Short => to_i32(value).map(|v| Value::Short(v as i16)),
        Prim::Char => to_i32(value).map(|v| {
            Value::Char(char::from_u32(u32::from(v as u16)).unwrap_or(char::REPLACEMENT_CHARACTER))
        }),
    }
}

/// Parse text as a primitive number.
///
/// Integral text must be plain decimal. Floating-point text may carry
/// surrounding whitespace and spells infinities `Infinity`.
pub(super) fn parse(text: &str, prim: Prim) -> RuntimeResult<Value> {
    let fail = || number_format(text, prim.name());
    match prim {
        Prim::Int => text.parse::<i32>().map(Value::Int).map_err(|_| fail()),
        Prim::Long => text.parse::<i64>().map(Value::Long).map_err(|_| fail()),
        Prim::Short => text.parse::<i16>().map(Value::Short).map_err(|_| fail()),
        Prim::Byte => text.parse::<i8>().map(Value::Byte).map_err(|_| fail()),
        Prim::Double => parse_floating(text).map(Value::Double).ok_or_else(fail),
        Prim::Float => parse_floating(text)
            .map(|v| Value::Float(vela_ir::literal::narrow(v)))
            .ok_or_else(fail),
        Prim::Boolean | Prim::Char => Err(fail()),
    }
}

fn parse_floating(text: &str) -> Option<f64> {
    let text = text.trim();
    match text {
        "Infinity" | "+Infinity" => Some(f64::INFINITY),
        "-Infinity" => Some(f64::NEG_INFINITY),
        "NaN" => Some(f64::NAN),
        _ if text.chars().any(char::is_alphabetic) && !text.contains(['e', 'E']) => None,
        _ => text.parse().ok(),
    }
}
